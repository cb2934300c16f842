// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session id derivation and request-content fingerprints.

use sha2::{Digest, Sha256};

/// Hex characters kept from each SHA-256 digest.
const ID_HEX_LEN: usize = 16;

/// User text beyond this many characters does not affect the fingerprint.
const FINGERPRINT_MAX_CHARS: usize = 500;

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(ID_HEX_LEN);
    hex
}

/// Derive a session id from the first user message of a conversation.
///
/// Every turn of one conversation resends the same opening message, so the
/// id is stable without any client cooperation.
pub fn derive_session_id(first_user_message: &str) -> String {
    short_hash(first_user_message.trim())
}

/// Fingerprint of one request's user content plus the names of tools it
/// carries.
///
/// Whitespace runs collapse to a single space so that trivially reformatted
/// retries still count as repeats. Tool names are sorted before hashing.
pub fn request_fingerprint<S: AsRef<str>>(user_text: &str, tool_names: &[S]) -> String {
    let normalized: String = user_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(FINGERPRINT_MAX_CHARS)
        .collect();

    let mut input = normalized;
    if !tool_names.is_empty() {
        let mut names: Vec<&str> = tool_names.iter().map(AsRef::as_ref).collect();
        names.sort_unstable();
        input.push_str("|tools:");
        input.push_str(&names.join(","));
    }
    short_hash(&input)
}
