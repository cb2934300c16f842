// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing scenarios through the full orchestrator.

use tiergate_core::{RoutingMethod, Tier};
use tiergate_router::{RouteOutcome, RouteRequest, TierProfile};
use tiergate_session::derive_session_id;
use tiergate_test_utils::TestHarness;

fn assert_model_heads_chain(outcome: &RouteOutcome) {
    assert_eq!(
        outcome.fallback_chain.first(),
        Some(&outcome.decision.model),
        "model must lead its fallback chain"
    );
}

#[tokio::test]
async fn capital_of_france_routes_simple_by_rules() {
    let harness = TestHarness::new();
    let outcome = harness.route("What is the capital of France?").await;

    assert_eq!(outcome.decision.tier, Tier::Simple);
    assert_eq!(outcome.decision.method, RoutingMethod::Rules);
    assert!(outcome.decision.confidence > 0.8);
    assert_eq!(outcome.decision.model, "google/gemini-2.5-flash");
    assert_eq!(outcome.profile, TierProfile::Standard);
    assert!(outcome.decision.savings > 0.0 && outcome.decision.savings <= 1.0);
    assert!(outcome.decision.reasoning.starts_with("score=-0.16"));
    assert_model_heads_chain(&outcome);
    assert_eq!(harness.http.call_count().await, 0);
}

#[tokio::test]
async fn reasoning_markers_route_reasoning() {
    let harness = TestHarness::new();
    let outcome = harness
        .route("Can you prove this theorem step by step?")
        .await;

    assert_eq!(outcome.decision.tier, Tier::Reasoning);
    assert_eq!(outcome.decision.method, RoutingMethod::Rules);
    assert!(outcome.decision.confidence >= 0.85);
    assert_eq!(outcome.decision.model, "deepseek/deepseek-reasoner");
}

#[tokio::test]
async fn repeated_request_escalates_once() {
    let harness = TestHarness::new();
    let prompt = "What is the capital of France?";

    let first = harness.route_in_session("loop", prompt).await;
    let second = harness.route_in_session("loop", prompt).await;
    let third = harness.route_in_session("loop", prompt).await;
    let fourth = harness.route_in_session("loop", prompt).await;
    let fifth = harness.route_in_session("loop", prompt).await;

    assert_eq!(first.decision.tier, Tier::Simple);
    assert_eq!(second.decision.tier, Tier::Simple);
    assert_eq!(third.decision.tier.rank(), first.decision.tier.rank() + 1);
    assert_eq!(third.decision.model, "openai/gpt-4o-mini");
    assert!(third.decision.reasoning.contains("escalated SIMPLE -> MEDIUM"));
    assert_eq!(fourth.decision.tier, Tier::Medium);
    assert_eq!(fifth.decision.tier, Tier::Medium);

    let entry = harness.sessions.get_session("loop").unwrap();
    assert!(entry.escalated);
    assert_eq!(entry.tier, Tier::Medium);
}

#[tokio::test]
async fn whitespace_variants_count_as_repeats() {
    let harness = TestHarness::new();
    harness.route_in_session("ws", "What is the capital of France?").await;
    harness.route_in_session("ws", "What  is the capital\nof France?").await;
    let third = harness
        .route_in_session("ws", "  What is the capital of France?  ")
        .await;
    assert_eq!(third.decision.tier, Tier::Medium);
}

#[tokio::test]
async fn oversized_input_forces_complex() {
    let harness = TestHarness::new();
    let huge = "a ".repeat(200_001);
    let outcome = harness.route(&huge).await;

    assert_eq!(outcome.decision.tier, Tier::Complex);
    assert_eq!(outcome.decision.method, RoutingMethod::Rules);
    assert!(outcome.decision.reasoning.contains("Input exceeds 100000 tokens"));
    assert!(outcome.scoring.is_none());
    assert_eq!(outcome.decision.model, "anthropic/claude-sonnet-4");
    assert_model_heads_chain(&outcome);
}

#[tokio::test]
async fn system_prompt_counts_toward_ceiling() {
    let harness = TestHarness::new();
    let system = "x".repeat(400_100);
    let outcome = harness
        .router
        .route(&RouteRequest::new("hi").system_prompt(&system))
        .await;
    assert_eq!(outcome.decision.tier, Tier::Complex);
    assert!(outcome.scoring.is_none());
}

#[tokio::test]
async fn oversized_input_keeps_reasoning_pin() {
    let harness = TestHarness::new();
    let hard = harness
        .route_in_session("big", "Prove the theorem step by step")
        .await;
    assert_eq!(hard.decision.tier, Tier::Reasoning);

    let huge = "a ".repeat(200_001);
    let outcome = harness.route_in_session("big", &huge).await;
    assert_eq!(outcome.decision.tier, Tier::Reasoning);
    // The pinned reasoner's window is too small; the next REASONING model serves.
    assert_eq!(outcome.decision.model, "openai/o3-mini");
    assert!(!outcome.fallback_chain.contains(&hard.decision.model));
    assert_model_heads_chain(&outcome);
    assert!(outcome.scoring.is_none());
    assert!(outcome.decision.reasoning.starts_with("Input exceeds 100000 tokens"));
    assert!(outcome.decision.reasoning.contains("session pinned at REASONING"));
    assert_eq!(
        harness.sessions.get_session("big").unwrap().tier,
        Tier::Reasoning
    );
}

#[tokio::test]
async fn oversized_input_upgrades_simple_session() {
    let harness = TestHarness::new();
    let easy = harness.route_in_session("grow", "thanks").await;
    assert_eq!(easy.decision.tier, Tier::Simple);

    let huge = "a ".repeat(200_001);
    let outcome = harness.route_in_session("grow", &huge).await;
    assert_eq!(outcome.decision.tier, Tier::Complex);
    assert!(outcome.decision.reasoning.contains("session upgraded from SIMPLE"));

    let entry = harness.sessions.get_session("grow").unwrap();
    assert_eq!(entry.tier, Tier::Complex);
    assert_eq!(entry.model, "anthropic/claude-sonnet-4");

    let after = harness.route_in_session("grow", "thanks").await;
    assert_eq!(after.decision.tier, Tier::Complex);
}

#[tokio::test]
async fn repeated_oversized_input_escalates() {
    let harness = TestHarness::new();
    let huge = "a ".repeat(200_001);

    let first = harness.route_in_session("flood", &huge).await;
    let second = harness.route_in_session("flood", &huge).await;
    let third = harness.route_in_session("flood", &huge).await;

    assert_eq!(first.decision.tier, Tier::Complex);
    assert_eq!(second.decision.tier, Tier::Complex);
    assert_eq!(third.decision.tier, Tier::Reasoning);
    assert!(third.decision.reasoning.contains("escalated COMPLEX -> REASONING"));
    assert!(harness.sessions.get_session("flood").unwrap().escalated);
}

#[tokio::test]
async fn session_never_downgrades() {
    let harness = TestHarness::new();
    let hard = harness
        .route_in_session("nd", "Prove the theorem step by step")
        .await;
    assert_eq!(hard.decision.tier, Tier::Reasoning);

    let easy = harness.route_in_session("nd", "thanks").await;
    assert_eq!(easy.scoring.as_ref().unwrap().tier, Some(Tier::Simple));
    assert_eq!(easy.decision.tier, Tier::Reasoning);
    assert_eq!(easy.decision.model, hard.decision.model);
    assert!(easy.decision.reasoning.contains("session pinned at REASONING"));
}

#[tokio::test]
async fn session_upgrades_on_harder_request() {
    let harness = TestHarness::new();
    harness
        .route_in_session("up", "What is the capital of France?")
        .await;
    let outcome = harness
        .route_in_session("up", "Prove the theorem step by step")
        .await;

    assert_eq!(outcome.decision.tier, Tier::Reasoning);
    assert!(outcome.decision.reasoning.contains("session upgraded from SIMPLE"));
    let entry = harness.sessions.get_session("up").unwrap();
    assert_eq!(entry.tier, Tier::Reasoning);
    assert_eq!(entry.model, "deepseek/deepseek-reasoner");
}

#[tokio::test]
async fn pinned_fallback_model_leads_chain() {
    let harness = TestHarness::new();
    harness.route_in_session("pin", "hello there").await;
    // Proxy reports that the first fallback actually served.
    harness
        .sessions
        .set_session("pin", "deepseek/deepseek-chat", Tier::Simple);

    let outcome = harness.route_in_session("pin", "define entropy").await;
    assert_eq!(outcome.decision.tier, Tier::Simple);
    assert_eq!(outcome.decision.model, "deepseek/deepseek-chat");
    assert_model_heads_chain(&outcome);
    assert_eq!(outcome.fallback_chain.len(), 3);
}

#[tokio::test]
async fn session_id_derived_from_first_user_message() {
    let harness = TestHarness::new();
    let opener = "Help me plan a trip to Lisbon";

    let first = harness
        .router
        .route(&RouteRequest::new(opener).first_user_message(opener))
        .await;
    let later = harness
        .router
        .route(&RouteRequest::new("what about hotels?").first_user_message(opener))
        .await;

    let expected = derive_session_id(opener);
    assert_eq!(first.session_id.as_deref(), Some(expected.as_str()));
    assert_eq!(later.session_id, first.session_id);
    assert_eq!(harness.sessions.get_session(&expected).unwrap().request_count, 2);
}

#[tokio::test]
async fn disabled_sessions_report_no_id() {
    let harness = TestHarness::builder()
        .configure(|c| c.session.enabled = false)
        .build();
    let outcome = harness.route_in_session("ignored", "hello").await;
    assert!(outcome.session_id.is_none());
    assert_eq!(harness.sessions.stats().active, 0);
}

#[tokio::test]
async fn structured_output_raises_floor() {
    let harness = TestHarness::new();
    let outcome = harness
        .router
        .route(
            &RouteRequest::new("What is the capital of France?")
                .system_prompt("Reply as JSON."),
        )
        .await;

    assert_eq!(outcome.scoring.as_ref().unwrap().tier, Some(Tier::Simple));
    assert_eq!(outcome.decision.tier, Tier::Medium);
    assert!(outcome.decision.reasoning.contains("structured output"));
}

#[tokio::test]
async fn tools_drop_models_without_tool_calling() {
    let harness = TestHarness::builder()
        .configure(|c| c.overrides.agentic_profile = false)
        .build();
    let tools = vec!["read_file".to_string()];
    let outcome = harness
        .router
        .route(&RouteRequest::new("Prove the theorem step by step").tools(&tools))
        .await;

    assert_eq!(outcome.profile, TierProfile::Standard);
    assert_eq!(outcome.decision.tier, Tier::Reasoning);
    assert_eq!(outcome.decision.model, "openai/o3-mini");
    assert!(!outcome
        .fallback_chain
        .contains(&"deepseek/deepseek-reasoner".to_string()));
}

#[tokio::test]
async fn tools_select_agentic_profile() {
    let harness = TestHarness::new();
    let outcome = harness
        .router
        .route(&RouteRequest::new("What is the capital of France?").has_tools(true))
        .await;

    assert_eq!(outcome.profile, TierProfile::Agentic);
    assert_eq!(outcome.decision.model, "anthropic/claude-haiku-4.5");
    assert!(outcome.decision.reasoning.ends_with("| agentic (tools)"));
}

#[tokio::test]
async fn agentic_phrasing_selects_agentic_profile() {
    let harness = TestHarness::builder().without_fallback().build();
    let outcome = harness
        .route("Read the file, edit the config, verify the build and fix any errors")
        .await;

    assert!(outcome.agentic_score >= 0.6);
    assert_eq!(outcome.profile, TierProfile::Agentic);
    assert!(outcome.decision.reasoning.contains("| agentic"));
}

#[tokio::test]
async fn browser_phrasing_selects_browser_profile() {
    let harness = TestHarness::builder().without_fallback().build();
    let outcome = harness
        .route("Open the website, click login and take a screenshot")
        .await;

    assert_eq!(outcome.profile, TierProfile::Browser);
    let config = harness.router.config();
    let table = config.browser_tiers.as_ref().unwrap();
    assert!(table
        .get(outcome.decision.tier)
        .chain()
        .contains(&outcome.decision.model));
}

#[tokio::test]
async fn disabled_browser_profile_uses_another_table() {
    let harness = TestHarness::builder()
        .without_fallback()
        .configure(|c| c.overrides.browser_profile = false)
        .build();
    let outcome = harness
        .route("Open the website, click login and take a screenshot")
        .await;

    assert_ne!(outcome.profile, TierProfile::Browser);
    assert!(!outcome.decision.reasoning.contains("| browser"));
}

#[tokio::test]
async fn disabled_agentic_profile_ignores_forced_mode() {
    let harness = TestHarness::builder()
        .configure(|c| {
            c.overrides.agentic_mode = true;
            c.overrides.agentic_profile = false;
        })
        .build();
    let outcome = harness.route("What is the capital of France?").await;
    assert_eq!(outcome.profile, TierProfile::Standard);
    assert_eq!(outcome.decision.model, "google/gemini-2.5-flash");
}

#[tokio::test]
async fn forced_agentic_mode() {
    let harness = TestHarness::builder()
        .configure(|c| c.overrides.agentic_mode = true)
        .build();
    let outcome = harness.route("What is the capital of France?").await;
    assert_eq!(outcome.profile, TierProfile::Agentic);
}

#[tokio::test]
async fn outcome_serializes_for_diagnostics() {
    let harness = TestHarness::new();
    let outcome = harness.route_in_session("diag", "What is the capital of France?").await;
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["decision"]["tier"], "SIMPLE");
    assert_eq!(json["decision"]["method"], "rules");
    assert_eq!(json["profile"], "standard");
    assert_eq!(json["session_id"], "diag");
    assert_eq!(json["scoring"]["dimensions"].as_array().unwrap().len(), 16);
}
