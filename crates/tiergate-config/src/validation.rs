// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as monotonic tier boundaries, weight totals, and positive timeouts.

use tiergate_core::Tier;

use crate::diagnostic::ConfigError;
use crate::model::{TierTable, TiergateConfig};

/// Allowed distance of the weight total from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 0.05;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TiergateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_scoring(config, &mut errors);

    validate_tier_table("tiers", &config.tiers, &mut errors);
    if let Some(table) = &config.agentic_tiers {
        validate_tier_table("agentic_tiers", table, &mut errors);
    }
    if let Some(table) = &config.browser_tiers {
        validate_tier_table("browser_tiers", table, &mut errors);
    }

    let overrides = &config.overrides;
    if overrides.max_tokens_force_complex == 0 {
        errors.push(validation("overrides.max_tokens_force_complex must be positive"));
    }
    for (name, value) in [
        ("agentic_profile_threshold", overrides.agentic_profile_threshold),
        ("browser_profile_threshold", overrides.browser_profile_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(validation(format!(
                "overrides.{name} must be within [0, 1], got {value}"
            )));
        }
    }

    let classifier = &config.classifier;
    if classifier.enabled {
        if classifier.model.trim().is_empty() {
            errors.push(validation("classifier.model must not be empty"));
        }
        if classifier.api_base.trim().is_empty() {
            errors.push(validation("classifier.api_base must not be empty"));
        }
        if classifier.truncation_chars == 0 {
            errors.push(validation("classifier.truncation_chars must be positive"));
        }
        if classifier.timeout_ms == 0 {
            errors.push(validation("classifier.timeout_ms must be positive"));
        }
        if classifier.cache_ttl_secs == 0 {
            errors.push(validation("classifier.cache_ttl_secs must be positive"));
        }
    }

    if config.session.enabled {
        if config.session.idle_timeout_secs == 0 {
            errors.push(validation("session.idle_timeout_secs must be positive"));
        }
        if config.session.sweep_interval_secs == 0 {
            errors.push(validation("session.sweep_interval_secs must be positive"));
        }
    }

    if config.cost.baseline_model.trim().is_empty() {
        errors.push(validation("cost.baseline_model must not be empty"));
    }
    if config.cost.baseline_input_per_mtok <= 0.0 || config.cost.baseline_output_per_mtok <= 0.0 {
        errors.push(validation(
            "cost.baseline_input_per_mtok and cost.baseline_output_per_mtok must be positive",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_scoring(config: &TiergateConfig, errors: &mut Vec<ConfigError>) {
    let scoring = &config.scoring;

    for (name, weight) in scoring.weights.as_pairs() {
        if weight < 0.0 {
            errors.push(validation(format!(
                "scoring.weights.{name} must be non-negative, got {weight}"
            )));
        }
    }
    let total = scoring.weights.total();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(validation(format!(
            "scoring.weights must sum to approximately 1.0, got {total:.3}"
        )));
    }

    let b = scoring.boundaries;
    if !(b.simple_medium < b.medium_complex && b.medium_complex < b.complex_reasoning) {
        errors.push(validation(format!(
            "scoring.boundaries must be strictly increasing, got {} / {} / {}",
            b.simple_medium, b.medium_complex, b.complex_reasoning
        )));
    }

    if scoring.token_thresholds.simple >= scoring.token_thresholds.complex {
        errors.push(validation(
            "scoring.token_thresholds.simple must be below scoring.token_thresholds.complex",
        ));
    }

    if scoring.confidence_steepness <= 0.0 {
        errors.push(validation(format!(
            "scoring.confidence_steepness must be positive, got {}",
            scoring.confidence_steepness
        )));
    }

    for (name, value) in [
        ("confidence_threshold", scoring.confidence_threshold),
        (
            "reasoning_override_confidence",
            scoring.reasoning_override_confidence,
        ),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(validation(format!(
                "scoring.{name} must be within [0, 1], got {value}"
            )));
        }
    }

    if scoring.reasoning_override_min_matches == 0 {
        errors.push(validation(
            "scoring.reasoning_override_min_matches must be at least 1",
        ));
    }
}

fn validate_tier_table(section: &str, table: &TierTable, errors: &mut Vec<ConfigError>) {
    for tier in Tier::ALL {
        let cfg = table.get(tier);
        let key = tier.to_string().to_lowercase();
        if cfg.primary.trim().is_empty() {
            errors.push(validation(format!(
                "{section}.{key}.primary must not be empty"
            )));
        }
        if cfg.fallback.iter().any(|m| m.trim().is_empty()) {
            errors.push(validation(format!(
                "{section}.{key}.fallback must not contain empty model ids"
            )));
        }
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
