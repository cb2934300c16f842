// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the routing engine.
//!
//! The engine owns none of these concerns; it only depends on these narrow
//! contracts so the proxy layer can plug in its own transport, catalog,
//! and cache backends.

pub mod cache;
pub mod catalog;
pub mod http;

pub use cache::ClassificationCache;
pub use catalog::ModelCatalog;
pub use http::{HttpCaller, HttpResponse};
