// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing orchestrator.
//!
//! Order per request: token ceiling or (rule classification > fallback
//! classifier > structured-output floor) > profile > session pinning
//! (never-downgrade, three-strike escalation) > capability filters > cost.
//! `route` never fails; every fault maps to a documented default.

use std::sync::Arc;

use serde::Serialize;
use strum::Display;
use tiergate_config::{TierTable, TiergateConfig};
use tiergate_core::{ModelCatalog, RoutingDecision, RoutingMethod, ScoringResult, Tier};
use tiergate_session::{SessionStore, derive_session_id, request_fingerprint};
use tracing::{debug, info};

use crate::classifier::RuleClassifier;
use crate::dimensions::estimate_tokens;
use crate::fallback::FallbackClassifier;
use crate::selector::ModelSelector;

/// Output tokens assumed when the caller does not say.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u64 = 4096;

/// Confidence reported when the token ceiling forces COMPLEX.
const OVERSIZED_CONFIDENCE: f64 = 0.95;

/// Which tier table served the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TierProfile {
    Standard,
    Agentic,
    Browser,
}

/// One inbound request as seen by the router.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub prompt: &'a str,
    pub system_prompt: Option<&'a str>,
    pub max_output_tokens: u64,
    /// Explicit session id, e.g. from the session header.
    pub session_id: Option<&'a str>,
    /// Opening user message, used to derive a session id when none is given.
    pub first_user_message: Option<&'a str>,
    pub has_tools: bool,
    pub tool_names: &'a [String],
}

impl<'a> RouteRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            system_prompt: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            session_id: None,
            first_user_message: None,
            has_tools: false,
            tool_names: &[],
        }
    }

    pub fn system_prompt(mut self, system_prompt: &'a str) -> Self {
        self.system_prompt = Some(system_prompt);
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: u64) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn session_id(mut self, session_id: &'a str) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn first_user_message(mut self, message: &'a str) -> Self {
        self.first_user_message = Some(message);
        self
    }

    /// Mark the request as carrying tool schemas.
    pub fn has_tools(mut self, has_tools: bool) -> Self {
        self.has_tools = has_tools;
        self
    }

    /// Tool names carried by the request. Implies `has_tools` when non-empty.
    pub fn tools(mut self, tool_names: &'a [String]) -> Self {
        self.tool_names = tool_names;
        self.has_tools |= !tool_names.is_empty();
        self
    }
}

/// Routing decision plus the math behind it.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOutcome {
    pub decision: RoutingDecision,
    /// Absent only when the token ceiling skipped classification.
    pub scoring: Option<ScoringResult>,
    pub session_id: Option<String>,
    /// Candidates in order, `decision.model` first.
    pub fallback_chain: Vec<String>,
    pub profile: TierProfile,
    pub agentic_score: f64,
}

/// Tier and trace before session handling.
struct Classified {
    tier: Tier,
    confidence: f64,
    method: RoutingMethod,
    reasoning: String,
    scoring: Option<ScoringResult>,
    profile: TierProfile,
}

/// Tier, model preference, and trace after session handling.
struct Resolved {
    tier: Tier,
    pinned_model: Option<String>,
    notes: Vec<String>,
}

/// The routing engine.
pub struct Router {
    config: Arc<TiergateConfig>,
    classifier: RuleClassifier,
    fallback: Option<FallbackClassifier>,
    selector: ModelSelector,
    sessions: Option<Arc<SessionStore>>,
}

impl Router {
    /// Router with rules only and no session store.
    pub fn new(config: Arc<TiergateConfig>, catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            classifier: RuleClassifier::new(config.scoring.clone()),
            selector: ModelSelector::new(catalog, config.cost.clone()),
            fallback: None,
            sessions: None,
            config,
        }
    }

    /// Resolve ambiguous results with `fallback` instead of the configured default tier.
    pub fn with_fallback(mut self, fallback: FallbackClassifier) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Pin sessions in `store`. Ignored when `session.enabled` is false.
    pub fn with_sessions(mut self, store: Arc<SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn config(&self) -> &TiergateConfig {
        &self.config
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn sessions(&self) -> Option<&SessionStore> {
        self.sessions
            .as_deref()
            .filter(|_| self.config.session.enabled)
    }

    /// Route one request.
    pub async fn route(&self, request: &RouteRequest<'_>) -> RouteOutcome {
        let input_tokens = estimate_tokens(request.prompt)
            + request.system_prompt.map_or(0, estimate_tokens);
        let session_id = self.sessions().map(|_| self.session_id_for(request));

        let classified = if input_tokens > self.config.overrides.max_tokens_force_complex {
            info!(input_tokens, "token ceiling forced COMPLEX");
            self.oversized(request)
        } else {
            self.classify(request).await
        };
        let Classified {
            tier,
            confidence,
            method,
            mut reasoning,
            scoring,
            profile,
        } = classified;
        let table = self.table_for(profile);

        let resolved = match (self.sessions(), session_id.as_deref()) {
            (Some(store), Some(id)) => apply_session(store, id, request, tier, table),
            _ => Resolved {
                tier,
                pinned_model: None,
                notes: Vec::new(),
            },
        };
        for note in &resolved.notes {
            reasoning.push_str(" | ");
            reasoning.push_str(note);
        }

        let agentic_score = scoring.as_ref().map_or(0.0, |s| s.agentic_score);
        self.finish(
            request,
            resolved.tier,
            confidence,
            method,
            reasoning,
            scoring,
            profile,
            resolved.pinned_model,
            session_id,
            input_tokens,
            agentic_score,
        )
    }

    /// COMPLEX without scoring; the session still pins and escalates.
    fn oversized(&self, request: &RouteRequest<'_>) -> Classified {
        let profile = self.pick_profile(None, request.has_tools);
        let reasoning = format!(
            "Input exceeds {} tokens{}",
            self.config.overrides.max_tokens_force_complex,
            profile_suffix(profile, request.has_tools)
        );
        Classified {
            tier: Tier::Complex,
            confidence: OVERSIZED_CONFIDENCE,
            method: RoutingMethod::Rules,
            reasoning,
            scoring: None,
            profile,
        }
    }

    /// Rules, then the fallback classifier, then the structured-output floor.
    async fn classify(&self, request: &RouteRequest<'_>) -> Classified {
        let overrides = &self.config.overrides;
        let structured = request.system_prompt.is_some_and(|system| {
            let lower = system.to_lowercase();
            overrides
                .structured_output_keywords
                .iter()
                .any(|kw| lower.contains(kw.to_lowercase().as_str()))
        });

        let scoring = self.classifier.classify(request.prompt, request.system_prompt);
        let mut reasoning = format!("score={:.2} | {}", scoring.score, scoring.signals.join(", "));

        let (mut tier, confidence, method) = match scoring.tier {
            Some(tier) => (tier, scoring.confidence, RoutingMethod::Rules),
            None => match &self.fallback {
                Some(fallback) if self.config.classifier.enabled => {
                    let outcome = fallback.classify(request.prompt).await;
                    reasoning.push_str(&format!(" | fallback classifier: {}", outcome.tier));
                    if outcome.cached {
                        reasoning.push_str(" (cached)");
                    } else if outcome.degraded {
                        reasoning.push_str(" (degraded)");
                    }
                    (
                        outcome.tier,
                        outcome.confidence,
                        RoutingMethod::FallbackClassifier,
                    )
                }
                _ => {
                    let tier = overrides.ambiguous_default_tier;
                    reasoning.push_str(&format!(" | ambiguous, defaulting to {tier}"));
                    (tier, scoring.confidence, RoutingMethod::Rules)
                }
            },
        };

        if structured && tier < overrides.structured_output_min_tier {
            tier = overrides.structured_output_min_tier;
            reasoning.push_str(&format!(" | upgraded to {tier} (structured output)"));
        }

        let profile = self.pick_profile(Some(&scoring), request.has_tools);
        reasoning.push_str(&profile_suffix(profile, request.has_tools));

        Classified {
            tier,
            confidence,
            method,
            reasoning,
            scoring: Some(scoring),
            profile,
        }
    }

    /// Build the chain, apply capability filters, and price the head.
    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        request: &RouteRequest<'_>,
        tier: Tier,
        confidence: f64,
        method: RoutingMethod,
        mut reasoning: String,
        scoring: Option<ScoringResult>,
        profile: TierProfile,
        pinned_model: Option<String>,
        session_id: Option<String>,
        input_tokens: u64,
        agentic_score: f64,
    ) -> RouteOutcome {
        let table = self.table_for(profile);
        let mut chain = ModelSelector::fallback_chain(table.get(tier));
        if let Some(pos) = pinned_model
            .as_ref()
            .and_then(|pinned| chain.iter().position(|m| m == pinned))
        {
            let model = chain.remove(pos);
            chain.insert(0, model);
        }

        let tools = self.selector.filter_by_tool_calling(&chain, request.has_tools);
        if tools.refused {
            reasoning.push_str(" | no tool-capable model in chain, unfiltered");
        }
        let window = self
            .selector
            .filter_by_context_window(&tools.models, input_tokens);
        if window.refused {
            reasoning.push_str(" | no model fits the context window, unfiltered");
        }
        let chain = window.models;

        // Tier chains are never empty; the primary is always present.
        let model = chain
            .first()
            .cloned()
            .unwrap_or_else(|| table.get(tier).primary.clone());

        let decision = self.selector.decide(
            &model,
            tier,
            confidence,
            method,
            reasoning,
            input_tokens,
            request.max_output_tokens,
        );
        debug!(
            model = decision.model.as_str(),
            tier = %decision.tier,
            confidence = decision.confidence,
            method = %decision.method,
            session_id = session_id.as_deref(),
            "routed request"
        );

        RouteOutcome {
            decision,
            scoring,
            session_id,
            fallback_chain: chain,
            profile,
            agentic_score,
        }
    }

    fn session_id_for(&self, request: &RouteRequest<'_>) -> String {
        match request.session_id {
            Some(id) => id.to_string(),
            None => derive_session_id(request.first_user_message.unwrap_or(request.prompt)),
        }
    }

    fn pick_profile(&self, scoring: Option<&ScoringResult>, has_tools: bool) -> TierProfile {
        let overrides = &self.config.overrides;
        let browser_score = scoring.map_or(0.0, |s| s.browser_score);
        let agentic_score = scoring.map_or(0.0, |s| s.agentic_score);

        if self.browser_table().is_some() && browser_score >= overrides.browser_profile_threshold {
            TierProfile::Browser
        } else if self.agentic_table().is_some()
            && (has_tools
                || overrides.agentic_mode
                || agentic_score >= overrides.agentic_profile_threshold)
        {
            TierProfile::Agentic
        } else {
            TierProfile::Standard
        }
    }

    fn agentic_table(&self) -> Option<&TierTable> {
        self.config
            .agentic_tiers
            .as_ref()
            .filter(|_| self.config.overrides.agentic_profile)
    }

    fn browser_table(&self) -> Option<&TierTable> {
        self.config
            .browser_tiers
            .as_ref()
            .filter(|_| self.config.overrides.browser_profile)
    }

    fn table_for(&self, profile: TierProfile) -> &TierTable {
        let table = match profile {
            TierProfile::Standard => None,
            TierProfile::Agentic => self.agentic_table(),
            TierProfile::Browser => self.browser_table(),
        };
        table.unwrap_or(&self.config.tiers)
    }
}

fn profile_suffix(profile: TierProfile, has_tools: bool) -> String {
    match profile {
        TierProfile::Standard => String::new(),
        TierProfile::Agentic if has_tools => " | agentic (tools)".to_string(),
        other => format!(" | {other}"),
    }
}

/// Never-downgrade and three-strike escalation under one lock.
fn apply_session(
    store: &SessionStore,
    session_id: &str,
    request: &RouteRequest<'_>,
    tier: Tier,
    table: &TierTable,
) -> Resolved {
    let mut guard = store.lock();
    let mut notes = Vec::new();

    let (mut tier, mut pinned_model) = match guard.get_session(session_id).cloned() {
        Some(entry) if tier > entry.tier => {
            let model = table.get(tier).primary.clone();
            guard.set_session(session_id, &model, tier);
            info!(session_id, from = %entry.tier, to = %tier, "session upgraded");
            notes.push(format!("session upgraded from {}", entry.tier));
            (tier, Some(model))
        }
        Some(entry) => {
            guard.touch_session(session_id);
            notes.push(format!("session pinned at {}", entry.tier));
            (entry.tier, Some(entry.model))
        }
        None => {
            let model = table.get(tier).primary.clone();
            guard.set_session(session_id, &model, tier);
            (tier, Some(model))
        }
    };

    let fingerprint = request_fingerprint(request.prompt, request.tool_names);
    let escalation = guard
        .record_request_hash(session_id, &fingerprint)
        .then(|| guard.escalate_session(session_id, table))
        .flatten();
    if let Some(escalation) = escalation {
        notes.push(format!(
            "escalated {} -> {} after repeated requests",
            escalation.from, escalation.to
        ));
        tier = escalation.to;
        pinned_model = Some(escalation.model);
    }

    Resolved {
        tier,
        pinned_model,
        notes,
    }
}
