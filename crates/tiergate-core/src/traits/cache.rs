// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache of fallback-classifier results keyed by prompt fingerprint.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::Tier;

/// Key -> tier cache with per-entry expiry.
///
/// Lost updates are acceptable: the worst case is a redundant upstream call.
#[async_trait]
pub trait ClassificationCache: Send + Sync {
    /// Returns the cached tier if present and not expired.
    async fn get(&self, key: &str) -> Option<Tier>;

    /// Stores a tier that expires after `ttl`.
    async fn set(&self, key: String, tier: Tier, ttl: Duration);

    /// Drops expired entries, then enforces any size bound the backend has.
    async fn prune(&self);

    /// Number of stored entries, expired or not.
    async fn len(&self) -> usize;
}
