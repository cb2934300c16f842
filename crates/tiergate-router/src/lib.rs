// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request routing for tiergate.
//!
//! Scores the user prompt across independent dimensions, maps the weighted
//! score to a tier with a calibrated confidence, resolves ambiguous cases with
//! a cheap upstream classifier, and picks a concrete model and fallback chain
//! for the tier. Session pinning comes from `tiergate-session`.

pub mod classifier;
pub mod dimensions;
pub mod fallback;
pub mod http;
pub mod router;
pub mod selector;

pub use classifier::{RuleClassifier, calibrate_confidence};
pub use fallback::{FallbackClassifier, FallbackOutcome, MemoryClassificationCache, parse_tier};
pub use http::ReqwestCaller;
pub use router::{RouteOutcome, RouteRequest, Router, TierProfile};
pub use selector::{FilteredChain, ModelSelector};
