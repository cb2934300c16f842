// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier -> model resolution, capability filtering, and cost accounting.

use std::sync::Arc;

use tiergate_config::TierConfig;
use tiergate_config::model::CostConfig;
use tiergate_core::{ModelCatalog, RoutingDecision, RoutingMethod, Tier};
use tiergate_cost::CostEstimate;
use tracing::warn;

/// Headroom required between the input estimate and a model's context window.
const CONTEXT_HEADROOM: f64 = 1.1;

/// A filtered candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredChain {
    pub models: Vec<String>,
    /// The filter would have emptied the list, so it was left unchanged.
    pub refused: bool,
}

impl FilteredChain {
    fn unchanged(chain: &[String]) -> Self {
        Self {
            models: chain.to_vec(),
            refused: false,
        }
    }
}

fn keep_or_refuse(chain: &[String], kept: Vec<String>, filter: &str) -> FilteredChain {
    if kept.is_empty() && !chain.is_empty() {
        warn!(filter, chain = ?chain, "filter would empty the fallback chain, keeping it unfiltered");
        FilteredChain {
            models: chain.to_vec(),
            refused: true,
        }
    } else {
        FilteredChain {
            models: kept,
            refused: false,
        }
    }
}

/// Wraps the model catalog and baseline pricing.
pub struct ModelSelector {
    catalog: Arc<dyn ModelCatalog>,
    cost: CostConfig,
}

impl ModelSelector {
    pub fn new(catalog: Arc<dyn ModelCatalog>, cost: CostConfig) -> Self {
        Self { catalog, cost }
    }

    pub fn catalog(&self) -> &dyn ModelCatalog {
        self.catalog.as_ref()
    }

    /// Primary followed by ordered fallbacks.
    pub fn fallback_chain(tier_config: &TierConfig) -> Vec<String> {
        tier_config.chain()
    }

    /// Decision for the tier's primary model.
    #[allow(clippy::too_many_arguments)]
    pub fn select(
        &self,
        tier: Tier,
        tier_config: &TierConfig,
        confidence: f64,
        method: RoutingMethod,
        reasoning: String,
        input_tokens: u64,
        max_output_tokens: u64,
    ) -> RoutingDecision {
        self.decide(
            &tier_config.primary,
            tier,
            confidence,
            method,
            reasoning,
            input_tokens,
            max_output_tokens,
        )
    }

    /// Decision for an explicit model, typically the head of a filtered chain.
    #[allow(clippy::too_many_arguments)]
    pub fn decide(
        &self,
        model: &str,
        tier: Tier,
        confidence: f64,
        method: RoutingMethod,
        reasoning: String,
        input_tokens: u64,
        max_output_tokens: u64,
    ) -> RoutingDecision {
        let estimate = self.cost_for_model(model, input_tokens, max_output_tokens);
        RoutingDecision {
            model: model.to_string(),
            tier,
            confidence,
            method,
            reasoning,
            cost_estimate: estimate.cost,
            baseline_cost: estimate.baseline_cost,
            savings: estimate.savings,
        }
    }

    /// Price the request on any model, e.g. the fallback that actually served.
    pub fn cost_for_model(&self, model: &str, input_tokens: u64, output_tokens: u64) -> CostEstimate {
        CostEstimate::compute(
            self.catalog.as_ref(),
            &self.cost,
            model,
            input_tokens,
            output_tokens,
        )
    }

    /// Drop models without tool calling when the request carries tools.
    pub fn filter_by_tool_calling(&self, chain: &[String], has_tools: bool) -> FilteredChain {
        if !has_tools {
            return FilteredChain::unchanged(chain);
        }
        let kept = chain
            .iter()
            .filter(|m| self.catalog.supports_tool_calling(m))
            .cloned()
            .collect();
        keep_or_refuse(chain, kept, "tool_calling")
    }

    /// Drop models whose declared context window cannot hold the input with
    /// headroom. Models without a declared window are kept.
    pub fn filter_by_context_window(&self, chain: &[String], input_tokens: u64) -> FilteredChain {
        let required = (input_tokens as f64 * CONTEXT_HEADROOM).ceil() as u64;
        let kept = chain
            .iter()
            .filter(|m| {
                self.catalog
                    .capabilities(m)
                    .and_then(|c| c.context_window)
                    .is_none_or(|window| window >= required)
            })
            .cloned()
            .collect();
        keep_or_refuse(chain, kept, "context_window")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiergate_config::TiergateConfig;
    use tiergate_core::{ModelCapabilities, ModelPricing};
    use tiergate_cost::StaticCatalog;

    fn selector() -> ModelSelector {
        ModelSelector::new(Arc::new(StaticCatalog::builtin()), CostConfig::default())
    }

    fn chain(models: &[&str]) -> Vec<String> {
        models.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn select_uses_primary_and_prices_it() {
        let config = TiergateConfig::default();
        let decision = selector().select(
            Tier::Simple,
            config.tiers.get(Tier::Simple),
            0.9,
            RoutingMethod::Rules,
            "test".into(),
            1_000,
            4_096,
        );
        assert_eq!(decision.model, "google/gemini-2.5-flash");
        assert!(decision.cost_estimate > 0.0);
        assert!(decision.cost_estimate < decision.baseline_cost);
        assert!(decision.savings > 0.9);
    }

    #[test]
    fn tool_filter_removes_incapable_models() {
        let filtered = selector().filter_by_tool_calling(
            &chain(&["deepseek/deepseek-reasoner", "openai/o3-mini"]),
            true,
        );
        assert_eq!(filtered.models, chain(&["openai/o3-mini"]));
        assert!(!filtered.refused);
    }

    #[test]
    fn tool_filter_is_noop_without_tools() {
        let input = chain(&["deepseek/deepseek-reasoner"]);
        let filtered = selector().filter_by_tool_calling(&input, false);
        assert_eq!(filtered.models, input);
    }

    #[test]
    fn tool_filter_is_idempotent_on_capable_chain() {
        let input = chain(&["openai/gpt-4o-mini", "anthropic/claude-sonnet-4"]);
        let once = selector().filter_by_tool_calling(&input, true);
        let twice = selector().filter_by_tool_calling(&once.models, true);
        assert_eq!(once.models, input);
        assert_eq!(twice, once);
    }

    #[test]
    fn tool_filter_refuses_to_empty_chain() {
        let input = chain(&["deepseek/deepseek-reasoner", "acme/unknown"]);
        let filtered = selector().filter_by_tool_calling(&input, true);
        assert_eq!(filtered.models, input);
        assert!(filtered.refused);
    }

    #[test]
    fn context_filter_respects_headroom_and_unknowns() {
        let catalog = StaticCatalog::new()
            .with_model(
                "small",
                ModelPricing {
                    input_per_mtok: 1.0,
                    output_per_mtok: 1.0,
                },
                ModelCapabilities {
                    tool_calling: true,
                    context_window: Some(1_000),
                },
            )
            .with_model(
                "large",
                ModelPricing {
                    input_per_mtok: 1.0,
                    output_per_mtok: 1.0,
                },
                ModelCapabilities {
                    tool_calling: true,
                    context_window: Some(10_000),
                },
            );
        let selector = ModelSelector::new(Arc::new(catalog), CostConfig::default());
        let input = chain(&["small", "unlisted", "large"]);

        // 950 * 1.1 > 1000
        let filtered = selector.filter_by_context_window(&input, 950);
        assert_eq!(filtered.models, chain(&["unlisted", "large"]));

        let filtered = selector.filter_by_context_window(&input, 900);
        assert_eq!(filtered.models, input);
    }

    #[test]
    fn cost_for_model_prices_fallbacks() {
        let s = selector();
        let primary = s.cost_for_model("openai/gpt-4o-mini", 2_000, 1_000);
        let fallback = s.cost_for_model("anthropic/claude-sonnet-4", 2_000, 1_000);
        assert!(fallback.cost > primary.cost);
        assert_eq!(primary.baseline_cost, fallback.baseline_cost);
    }

    #[test]
    fn fallback_chain_starts_with_primary() {
        let config = TiergateConfig::default();
        let tier = config.tiers.get(Tier::Complex);
        let chain = ModelSelector::fallback_chain(tier);
        assert_eq!(chain[0], tier.primary);
        assert_eq!(chain.len(), 1 + tier.fallback.len());
    }
}
