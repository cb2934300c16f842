// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the classifier, selector, session store, and callers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Cost/capability class a request is routed into.
///
/// Declaration order is the rank order: `Simple < Medium < Complex < Reasoning`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Simple,
    Medium,
    Complex,
    Reasoning,
}

impl Tier {
    /// All tiers in ascending rank order.
    pub const ALL: [Tier; 4] = [Tier::Simple, Tier::Medium, Tier::Complex, Tier::Reasoning];

    /// Zero-based rank of this tier.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// The next tier up, or `None` at the ceiling.
    pub fn next(self) -> Option<Tier> {
        Tier::ALL.get(self.rank() + 1).copied()
    }
}

/// How the final tier was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum RoutingMethod {
    #[strum(serialize = "rules")]
    #[serde(rename = "rules")]
    Rules,
    #[strum(serialize = "fallback-classifier")]
    #[serde(rename = "fallback-classifier")]
    FallbackClassifier,
}

/// One dimension's bounded contribution to the aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    /// Stable dimension name (e.g. `codePresence`).
    pub name: &'static str,
    /// Raw score in `[-1, 1]` before weighting.
    pub score: f64,
    /// Human-readable signal when the dimension fired.
    pub signal: Option<String>,
}

/// Output of the rule classifier. Produced per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResult {
    /// Weighted aggregate score.
    pub score: f64,
    /// Classified tier; `None` means ambiguous.
    pub tier: Option<Tier>,
    /// Calibrated confidence in `[0, 1]`.
    pub confidence: f64,
    /// Signals of every dimension that fired, in dimension order.
    pub signals: Vec<String>,
    /// Agentic-intent score in `[0, 1]`, from user text only.
    pub agentic_score: f64,
    /// Browser-automation intent score in `[0, 1]`, from user text only.
    pub browser_score: f64,
    /// Full per-dimension breakdown.
    pub dimensions: Vec<DimensionScore>,
}

/// Final routing output for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    /// Concrete model id to call first.
    pub model: String,
    pub tier: Tier,
    pub confidence: f64,
    pub method: RoutingMethod,
    /// Trace of how the decision was reached.
    pub reasoning: String,
    /// Estimated USD cost of this request on `model`.
    pub cost_estimate: f64,
    /// Estimated USD cost of this request on the baseline model.
    pub baseline_cost: f64,
    /// `1 - cost/baseline`, floored at 0.
    pub savings: f64,
}

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

/// Capability flags declared by the model catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelCapabilities {
    /// Model accepts tool/function schemas.
    pub tool_calling: bool,
    /// Maximum context window in tokens, when known.
    pub context_window: Option<u64>,
}
