// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request cost estimation and savings against a baseline model.
//!
//! Formula: `input_tokens / 1M * input_price + output_tokens / 1M * output_price`.
//! Output is priced at the requested max output tokens, so estimates are an
//! upper bound on the real charge.

use tiergate_config::model::CostConfig;
use tiergate_core::{ModelCatalog, ModelPricing};
use tracing::debug;

/// Estimated cost of one request on a model, next to the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub cost: f64,
    pub baseline_cost: f64,
    /// `1 - cost/baseline_cost`, clamped to `[0, 1]`.
    pub savings: f64,
}

impl CostEstimate {
    /// Price a request on `model` and on the configured baseline.
    ///
    /// Models missing from the catalog cost 0; the baseline never does.
    pub fn compute(
        catalog: &dyn ModelCatalog,
        cost_config: &CostConfig,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> Self {
        let cost = match catalog.pricing(model) {
            Some(pricing) => request_cost(&pricing, input_tokens, output_tokens),
            None => {
                debug!(model, "no pricing for model, estimating zero cost");
                0.0
            }
        };
        let baseline = baseline_pricing(catalog, cost_config);
        let baseline_cost = request_cost(&baseline, input_tokens, output_tokens);
        Self {
            cost,
            baseline_cost,
            savings: savings(cost, baseline_cost),
        }
    }
}

/// Cost in USD of `input_tokens` in and `output_tokens` out at `pricing`.
pub fn request_cost(pricing: &ModelPricing, input_tokens: u64, output_tokens: u64) -> f64 {
    let input = (input_tokens as f64 / 1_000_000.0) * pricing.input_per_mtok;
    let output = (output_tokens as f64 / 1_000_000.0) * pricing.output_per_mtok;
    input + output
}

/// Baseline model pricing, falling back to the configured price pair when the
/// catalog lacks the baseline model or lists it at zero.
pub fn baseline_pricing(catalog: &dyn ModelCatalog, config: &CostConfig) -> ModelPricing {
    match catalog.pricing(&config.baseline_model) {
        Some(p) if p.input_per_mtok > 0.0 && p.output_per_mtok > 0.0 => p,
        _ => {
            debug!(
                model = config.baseline_model.as_str(),
                "baseline model not priced in catalog, using fallback price pair"
            );
            ModelPricing {
                input_per_mtok: config.baseline_input_per_mtok,
                output_per_mtok: config.baseline_output_per_mtok,
            }
        }
    }
}

/// Fraction saved relative to the baseline, clamped to `[0, 1]`.
pub fn savings(cost: f64, baseline_cost: f64) -> f64 {
    if baseline_cost > 0.0 {
        (1.0 - cost / baseline_cost).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
