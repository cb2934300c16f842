// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weighted rule classification with logistic confidence calibration.
//!
//! Zero network, sub-millisecond. Ambiguous results (confidence under the
//! configured threshold) come back with `tier: None` for the fallback
//! classifier to resolve.

use tiergate_config::model::{ScoringConfig, TierBoundaries};
use tiergate_core::{ScoringResult, Tier};
use tracing::debug;

use crate::dimensions::{estimate_tokens, score_dimensions};

/// Logistic confidence for a distance from the nearest tier boundary.
///
/// 0.5 at the boundary, approaching 1.0 as the distance grows.
pub fn calibrate_confidence(distance: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-steepness * distance).exp())
}

/// Tier for `score` and its distance to the nearest boundary.
pub fn tier_for_score(score: f64, boundaries: &TierBoundaries) -> (Tier, f64) {
    let TierBoundaries {
        simple_medium,
        medium_complex,
        complex_reasoning,
    } = *boundaries;

    if score < simple_medium {
        (Tier::Simple, simple_medium - score)
    } else if score < medium_complex {
        (
            Tier::Medium,
            (score - simple_medium).min(medium_complex - score),
        )
    } else if score < complex_reasoning {
        (
            Tier::Complex,
            (score - medium_complex).min(complex_reasoning - score),
        )
    } else {
        (Tier::Reasoning, score - complex_reasoning)
    }
}

/// Rule-based classifier over the configured dimensions and weights.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    config: ScoringConfig,
}

impl RuleClassifier {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Classify one request.
    ///
    /// Only `prompt` is keyword-scored. `system_prompt` contributes to the
    /// token estimate and nothing else.
    pub fn classify(&self, prompt: &str, system_prompt: Option<&str>) -> ScoringResult {
        let tokens = estimate_tokens(prompt) + system_prompt.map_or(0, estimate_tokens);
        let user_lower = prompt.to_lowercase();
        let report = score_dimensions(
            &user_lower,
            tokens,
            &self.config.token_thresholds,
            &self.config.keywords,
        );

        let weights = self.config.weights.as_pairs();
        let score: f64 = report
            .dimensions
            .iter()
            .map(|dim| {
                let weight = weights
                    .iter()
                    .find(|(name, _)| *name == dim.name)
                    .map_or(0.0, |(_, w)| *w);
                dim.score * weight
            })
            .sum();

        let mut signals: Vec<String> = report
            .dimensions
            .iter()
            .filter_map(|dim| dim.signal.clone())
            .collect();

        let steepness = self.config.confidence_steepness;

        if report.reasoning_matches >= self.config.reasoning_override_min_matches {
            let confidence = calibrate_confidence(score.max(0.3), steepness)
                .max(self.config.reasoning_override_confidence);
            signals.push(format!(
                "reasoning override ({} markers)",
                report.reasoning_matches
            ));
            debug!(score, confidence, "reasoning override");
            return ScoringResult {
                score,
                tier: Some(Tier::Reasoning),
                confidence,
                signals,
                agentic_score: report.agentic_score,
                browser_score: report.browser_score,
                dimensions: report.dimensions,
            };
        }

        let (tier, distance) = tier_for_score(score, &self.config.boundaries);
        let confidence = calibrate_confidence(distance, steepness);
        let tier = (confidence >= self.config.confidence_threshold).then_some(tier);

        debug!(score, confidence, tier = ?tier, "rule classification");

        ScoringResult {
            score,
            tier,
            confidence,
            signals,
            agentic_score: report.agentic_score,
            browser_score: report.browser_score,
            dimensions: report.dimensions,
        }
    }
}
