// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model catalog and cost accounting for the tiergate routing engine.
//!
//! This crate provides:
//! - **Catalog**: A built-in [`StaticCatalog`] of pricing, tool-calling support,
//!   and context windows implementing [`tiergate_core::ModelCatalog`]
//! - **Pricing**: Per-request cost estimates, baseline pricing with a hardcoded
//!   fallback, and savings arithmetic

pub mod catalog;
pub mod pricing;

pub use catalog::StaticCatalog;
pub use pricing::{baseline_pricing, request_cost, savings, CostEstimate};
