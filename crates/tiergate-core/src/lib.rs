// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the tiergate routing engine.
//!
//! This crate provides the domain types, error type, and collaborator traits
//! shared by the classifier, selector, and session crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RouterError;
pub use traits::{ClassificationCache, HttpCaller, HttpResponse, ModelCatalog};
pub use types::{
    DimensionScore, ModelCapabilities, ModelPricing, RoutingDecision, RoutingMethod,
    ScoringResult, Tier,
};
