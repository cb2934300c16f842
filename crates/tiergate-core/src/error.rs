// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the tiergate routing engine.
//!
//! The routing pipeline itself never surfaces these to its caller; they are
//! produced by collaborators (HTTP, config) and mapped to degraded behavior.

use thiserror::Error;

/// The primary error type used across tiergate crates.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Configuration errors (invalid values, missing tier tables).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to an upstream endpoint.
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The fallback classifier received a response it could not use.
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
