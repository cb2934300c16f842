// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the tiergate routing engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tiergate_core::Tier;

use crate::keywords;

/// Top-level tiergate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiergateConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Rule classifier weights, keywords, and boundaries.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Standard tier -> model table.
    #[serde(default = "default_standard_tiers")]
    pub tiers: TierTable,

    /// Tier table used for agentic requests. Switched off by `overrides.agentic_profile`.
    #[serde(default = "default_agentic_tiers")]
    pub agentic_tiers: Option<TierTable>,

    /// Tier table used for browser-automation requests. Switched off by `overrides.browser_profile`.
    #[serde(default = "default_browser_tiers")]
    pub browser_tiers: Option<TierTable>,

    /// Hard overrides applied around classification.
    #[serde(default)]
    pub overrides: OverridesConfig,

    /// LLM fallback classifier for ambiguous requests.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Session pinning and escalation settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Baseline pricing used for savings accounting.
    #[serde(default)]
    pub cost: CostConfig,
}

impl Default for TiergateConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            scoring: ScoringConfig::default(),
            tiers: default_standard_tiers(),
            agentic_tiers: default_agentic_tiers(),
            browser_tiers: default_browser_tiers(),
            overrides: OverridesConfig::default(),
            classifier: ClassifierConfig::default(),
            session: SessionConfig::default(),
            cost: CostConfig::default(),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// --- Scoring ---

/// Rule classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Logistic steepness `k` used for confidence calibration.
    #[serde(default = "default_confidence_steepness")]
    pub confidence_steepness: f64,

    /// Results below this confidence are reported as ambiguous.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Distinct reasoning keywords needed to force the REASONING tier.
    #[serde(default = "default_reasoning_override_min_matches")]
    pub reasoning_override_min_matches: usize,

    /// Confidence floor applied when the reasoning override fires.
    #[serde(default = "default_reasoning_override_confidence")]
    pub reasoning_override_confidence: f64,

    #[serde(default)]
    pub token_thresholds: TokenThresholds,

    #[serde(default)]
    pub boundaries: TierBoundaries,

    #[serde(default)]
    pub weights: DimensionWeights,

    #[serde(default)]
    pub keywords: KeywordSets,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            token_thresholds: TokenThresholds::default(),
            weights: DimensionWeights::default(),
            keywords: KeywordSets::default(),
            boundaries: TierBoundaries::default(),
            confidence_steepness: default_confidence_steepness(),
            confidence_threshold: default_confidence_threshold(),
            reasoning_override_min_matches: default_reasoning_override_min_matches(),
            reasoning_override_confidence: default_reasoning_override_confidence(),
        }
    }
}

fn default_confidence_steepness() -> f64 {
    12.0
}

fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_reasoning_override_min_matches() -> usize {
    2
}

fn default_reasoning_override_confidence() -> f64 {
    0.85
}

/// Token-count extremes for the token-count dimension.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenThresholds {
    /// Below this many tokens the request counts as short.
    #[serde(default = "default_simple_tokens")]
    pub simple: u64,
    /// Above this many tokens the request counts as long.
    #[serde(default = "default_complex_tokens")]
    pub complex: u64,
}

impl Default for TokenThresholds {
    fn default() -> Self {
        Self {
            simple: default_simple_tokens(),
            complex: default_complex_tokens(),
        }
    }
}

fn default_simple_tokens() -> u64 {
    50
}

fn default_complex_tokens() -> u64 {
    500
}

/// Per-dimension weights of the aggregate score. Should sum to ~1.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DimensionWeights {
    pub token_count: f64,
    pub code_presence: f64,
    pub reasoning_markers: f64,
    pub technical_terms: f64,
    pub creative_markers: f64,
    pub simple_indicators: f64,
    pub multi_step_patterns: f64,
    pub question_complexity: f64,
    pub imperative_verbs: f64,
    pub constraint_count: f64,
    pub output_format: f64,
    pub reference_complexity: f64,
    pub negation_complexity: f64,
    pub domain_specificity: f64,
    pub agentic_task: f64,
    pub browser_automation: f64,
}

impl DimensionWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.as_pairs().iter().map(|(_, w)| w).sum()
    }

    /// `(field name, weight)` pairs, in declaration order.
    pub fn as_pairs(&self) -> [(&'static str, f64); 16] {
        [
            ("token_count", self.token_count),
            ("code_presence", self.code_presence),
            ("reasoning_markers", self.reasoning_markers),
            ("technical_terms", self.technical_terms),
            ("creative_markers", self.creative_markers),
            ("simple_indicators", self.simple_indicators),
            ("multi_step_patterns", self.multi_step_patterns),
            ("question_complexity", self.question_complexity),
            ("imperative_verbs", self.imperative_verbs),
            ("constraint_count", self.constraint_count),
            ("output_format", self.output_format),
            ("reference_complexity", self.reference_complexity),
            ("negation_complexity", self.negation_complexity),
            ("domain_specificity", self.domain_specificity),
            ("agentic_task", self.agentic_task),
            ("browser_automation", self.browser_automation),
        ]
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            token_count: 0.08,
            code_presence: 0.15,
            reasoning_markers: 0.18,
            technical_terms: 0.10,
            creative_markers: 0.05,
            simple_indicators: 0.08,
            multi_step_patterns: 0.12,
            question_complexity: 0.05,
            imperative_verbs: 0.03,
            constraint_count: 0.04,
            output_format: 0.03,
            reference_complexity: 0.02,
            negation_complexity: 0.01,
            domain_specificity: 0.02,
            agentic_task: 0.04,
            browser_automation: 0.0,
        }
    }
}

/// Keyword families matched case-insensitively as substrings of the user text.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct KeywordSets {
    pub code: Vec<String>,
    pub reasoning: Vec<String>,
    pub technical: Vec<String>,
    pub creative: Vec<String>,
    pub simple: Vec<String>,
    pub imperative: Vec<String>,
    pub constraint: Vec<String>,
    pub output_format: Vec<String>,
    pub reference: Vec<String>,
    pub negation: Vec<String>,
    pub domain: Vec<String>,
    pub agentic: Vec<String>,
    pub browser: Vec<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            code: keywords::owned(keywords::CODE),
            reasoning: keywords::owned(keywords::REASONING),
            technical: keywords::owned(keywords::TECHNICAL),
            creative: keywords::owned(keywords::CREATIVE),
            simple: keywords::owned(keywords::SIMPLE),
            imperative: keywords::owned(keywords::IMPERATIVE),
            constraint: keywords::owned(keywords::CONSTRAINT),
            output_format: keywords::owned(keywords::OUTPUT_FORMAT),
            reference: keywords::owned(keywords::REFERENCE),
            negation: keywords::owned(keywords::NEGATION),
            domain: keywords::owned(keywords::DOMAIN),
            agentic: keywords::owned(keywords::AGENTIC),
            browser: keywords::owned(keywords::BROWSER),
        }
    }
}

/// Score boundaries between adjacent tiers. Must be strictly increasing.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TierBoundaries {
    pub simple_medium: f64,
    pub medium_complex: f64,
    pub complex_reasoning: f64,
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            simple_medium: 0.0,
            medium_complex: 0.3,
            complex_reasoning: 0.5,
        }
    }
}

// --- Tier tables ---

/// Primary model plus ordered fallbacks for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub primary: String,
    #[serde(default)]
    pub fallback: Vec<String>,
}

impl TierConfig {
    fn new(primary: &str, fallback: &[&str]) -> Self {
        Self {
            primary: primary.to_string(),
            fallback: fallback.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Primary followed by fallbacks, duplicates removed.
    pub fn chain(&self) -> Vec<String> {
        let mut chain = vec![self.primary.clone()];
        for model in &self.fallback {
            if !chain.contains(model) {
                chain.push(model.clone());
            }
        }
        chain
    }
}

/// Tier configs for all four tiers of one profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierTable {
    pub simple: TierConfig,
    pub medium: TierConfig,
    pub complex: TierConfig,
    pub reasoning: TierConfig,
}

impl TierTable {
    /// The config for `tier`.
    pub fn get(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Simple => &self.simple,
            Tier::Medium => &self.medium,
            Tier::Complex => &self.complex,
            Tier::Reasoning => &self.reasoning,
        }
    }
}

fn default_standard_tiers() -> TierTable {
    TierTable {
        simple: TierConfig::new(
            "google/gemini-2.5-flash",
            &["deepseek/deepseek-chat", "openai/gpt-4o-mini"],
        ),
        medium: TierConfig::new(
            "openai/gpt-4o-mini",
            &["google/gemini-2.5-flash", "deepseek/deepseek-chat"],
        ),
        complex: TierConfig::new(
            "anthropic/claude-sonnet-4",
            &["google/gemini-2.5-pro", "openai/gpt-4o"],
        ),
        reasoning: TierConfig::new(
            "deepseek/deepseek-reasoner",
            &["openai/o3-mini", "anthropic/claude-sonnet-4"],
        ),
    }
}

fn default_agentic_tiers() -> Option<TierTable> {
    Some(TierTable {
        simple: TierConfig::new(
            "anthropic/claude-haiku-4.5",
            &["openai/gpt-4o-mini", "google/gemini-2.5-flash"],
        ),
        medium: TierConfig::new(
            "openai/gpt-4.1-mini",
            &["anthropic/claude-haiku-4.5", "openai/gpt-4o-mini"],
        ),
        complex: TierConfig::new(
            "anthropic/claude-sonnet-4",
            &["openai/gpt-4.1", "google/gemini-2.5-pro"],
        ),
        reasoning: TierConfig::new(
            "anthropic/claude-opus-4",
            &["anthropic/claude-sonnet-4", "openai/o3-mini"],
        ),
    })
}

fn default_browser_tiers() -> Option<TierTable> {
    Some(TierTable {
        simple: TierConfig::new("openai/gpt-4o-mini", &["google/gemini-2.5-flash"]),
        medium: TierConfig::new("openai/gpt-4.1-mini", &["google/gemini-2.5-flash"]),
        complex: TierConfig::new("anthropic/claude-sonnet-4", &["openai/gpt-4o"]),
        reasoning: TierConfig::new("anthropic/claude-opus-4", &["anthropic/claude-sonnet-4"]),
    })
}

// --- Overrides ---

/// Hard rules applied around the classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OverridesConfig {
    /// Requests estimated above this many tokens go straight to COMPLEX.
    #[serde(default = "default_max_tokens_force_complex")]
    pub max_tokens_force_complex: u64,

    /// Minimum tier when the system prompt asks for structured output.
    #[serde(default = "default_structured_output_min_tier")]
    pub structured_output_min_tier: Tier,

    /// System-prompt keywords that signal structured output.
    #[serde(default = "default_structured_output_keywords")]
    pub structured_output_keywords: Vec<String>,

    /// Tier used for ambiguous requests when the fallback classifier is off.
    #[serde(default = "default_ambiguous_default_tier")]
    pub ambiguous_default_tier: Tier,

    /// Allow the agentic tier table to be selected at all.
    #[serde(default = "default_profile_enabled")]
    pub agentic_profile: bool,

    /// Allow the browser tier table to be selected at all.
    #[serde(default = "default_profile_enabled")]
    pub browser_profile: bool,

    /// Always use the agentic tier table when the agentic profile is enabled.
    #[serde(default)]
    pub agentic_mode: bool,

    /// Agentic score at or above which the agentic profile is selected.
    #[serde(default = "default_profile_threshold")]
    pub agentic_profile_threshold: f64,

    /// Browser score at or above which the browser profile is selected.
    #[serde(default = "default_profile_threshold")]
    pub browser_profile_threshold: f64,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            max_tokens_force_complex: default_max_tokens_force_complex(),
            structured_output_min_tier: default_structured_output_min_tier(),
            structured_output_keywords: default_structured_output_keywords(),
            ambiguous_default_tier: default_ambiguous_default_tier(),
            agentic_profile: default_profile_enabled(),
            browser_profile: default_profile_enabled(),
            agentic_mode: false,
            agentic_profile_threshold: default_profile_threshold(),
            browser_profile_threshold: default_profile_threshold(),
        }
    }
}

fn default_max_tokens_force_complex() -> u64 {
    100_000
}

fn default_structured_output_min_tier() -> Tier {
    Tier::Medium
}

fn default_structured_output_keywords() -> Vec<String> {
    keywords::owned(keywords::STRUCTURED_OUTPUT)
}

fn default_ambiguous_default_tier() -> Tier {
    Tier::Medium
}

fn default_profile_enabled() -> bool {
    true
}

fn default_profile_threshold() -> f64 {
    0.5
}

// --- Fallback classifier ---

/// LLM fallback classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Call the upstream classifier for ambiguous requests.
    #[serde(default = "default_classifier_enabled")]
    pub enabled: bool,

    /// Cheap model used for classification.
    #[serde(default = "default_classifier_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible upstream API.
    #[serde(default = "default_classifier_api_base")]
    pub api_base: String,

    /// Output token cap for the classification call.
    #[serde(default = "default_classifier_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f64,

    /// Prompt characters sent upstream.
    #[serde(default = "default_truncation_chars")]
    pub truncation_chars: usize,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Cache size above which expired entries are pruned.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Upper bound on the upstream call.
    #[serde(default = "default_classifier_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_classifier_enabled(),
            model: default_classifier_model(),
            api_base: default_classifier_api_base(),
            max_tokens: default_classifier_max_tokens(),
            temperature: 0.0,
            truncation_chars: default_truncation_chars(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            timeout_ms: default_classifier_timeout_ms(),
        }
    }
}

fn default_classifier_enabled() -> bool {
    true
}

fn default_classifier_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_classifier_api_base() -> String {
    "http://127.0.0.1:8402".to_string()
}

fn default_classifier_max_tokens() -> u32 {
    10
}

fn default_truncation_chars() -> usize {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    1000
}

fn default_classifier_timeout_ms() -> u64 {
    5000
}

// --- Sessions ---

/// Session pinning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Pin conversations to their selected model.
    #[serde(default = "default_session_enabled")]
    pub enabled: bool,

    /// Sessions idle longer than this are evicted.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Interval of the background eviction sweep.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Request header carrying an explicit session id (read by the proxy layer).
    #[serde(default = "default_session_header")]
    pub header_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: default_session_enabled(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            header_name: default_session_header(),
        }
    }
}

fn default_session_enabled() -> bool {
    true
}

fn default_idle_timeout_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

fn default_session_header() -> String {
    "x-session-id".to_string()
}

// --- Cost ---

/// Baseline model used for savings accounting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    /// Reference model every request is also priced against.
    #[serde(default = "default_baseline_model")]
    pub baseline_model: String,

    /// Input price used when the catalog lacks the baseline model.
    #[serde(default = "default_baseline_input")]
    pub baseline_input_per_mtok: f64,

    /// Output price used when the catalog lacks the baseline model.
    #[serde(default = "default_baseline_output")]
    pub baseline_output_per_mtok: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            baseline_model: default_baseline_model(),
            baseline_input_per_mtok: default_baseline_input(),
            baseline_output_per_mtok: default_baseline_output(),
        }
    }
}

fn default_baseline_model() -> String {
    "anthropic/claude-opus-4".to_string()
}

fn default_baseline_input() -> f64 {
    15.0
}

fn default_baseline_output() -> f64 {
    75.0
}
