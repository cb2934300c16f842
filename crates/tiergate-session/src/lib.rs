// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session persistence for the tiergate router.
//!
//! A session pins a conversation to a model and tier so follow-up turns do not
//! oscillate between tiers. The store holds the pinned model, detects
//! repeated requests with a short fingerprint window, and escalates a stuck
//! session exactly once between evictions.
//!
//! The store is an explicitly owned object. Its background sweep starts with
//! [`SessionStore::start`] and stops on [`SessionStore::close`] or drop.

pub mod fingerprint;
pub mod store;

pub use fingerprint::{derive_session_id, request_fingerprint};
pub use store::{Escalation, SessionEntry, SessionGuard, SessionStats, SessionStore};
