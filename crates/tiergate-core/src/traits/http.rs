// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal HTTP capability used by the fallback classifier.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RouterError;

/// Status and decoded JSON body of an upstream response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON body to a URL and returns the JSON response.
///
/// Implementations must honor `timeout` and must not retry. Authentication and
/// payment belong to the implementation, not to the engine.
#[async_trait]
pub trait HttpCaller: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, RouterError>;
}
