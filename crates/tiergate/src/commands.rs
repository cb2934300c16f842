// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.

use std::sync::Arc;

use tiergate_config::TiergateConfig;
use tiergate_core::RouterError;
use tiergate_cost::StaticCatalog;
use tiergate_router::{FallbackClassifier, ReqwestCaller, RouteRequest, Router};
use tiergate_session::SessionStore;
use tracing::debug;

/// Environment variable holding the classifier endpoint's API key, if any.
pub const CLASSIFIER_API_KEY_VAR: &str = "TIERGATE_CLASSIFIER_API_KEY";

/// Inputs for one `route` invocation.
#[derive(Debug, Clone)]
pub struct RouteInput {
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: u64,
    pub session: Option<String>,
    pub tools: bool,
    pub tool_names: Vec<String>,
}

/// Assemble the router described by `config`.
pub fn build_router(config: Arc<TiergateConfig>) -> Result<(Router, Option<Arc<SessionStore>>), RouterError> {
    let mut router = Router::new(Arc::clone(&config), Arc::new(StaticCatalog::builtin()));

    if config.classifier.enabled {
        let http = match std::env::var(CLASSIFIER_API_KEY_VAR) {
            Ok(key) if !key.is_empty() => ReqwestCaller::with_api_key(&key)?,
            _ => ReqwestCaller::new()?,
        };
        router = router.with_fallback(FallbackClassifier::with_memory_cache(
            Arc::new(http),
            config.classifier.clone(),
        ));
        debug!(api_base = config.classifier.api_base.as_str(), "fallback classifier enabled");
    }

    let sessions = config.session.enabled.then(|| Arc::new(SessionStore::start(&config.session)));
    if let Some(store) = &sessions {
        router = router.with_sessions(Arc::clone(store));
    }
    Ok((router, sessions))
}

/// Route one prompt and render the outcome as pretty JSON.
pub async fn route(config: TiergateConfig, input: &RouteInput) -> Result<String, RouterError> {
    let (router, sessions) = build_router(Arc::new(config))?;

    let mut request = RouteRequest::new(&input.prompt)
        .max_output_tokens(input.max_tokens)
        .has_tools(input.tools)
        .tools(&input.tool_names);
    if let Some(system) = input.system.as_deref() {
        request = request.system_prompt(system);
    }
    if let Some(session) = input.session.as_deref() {
        request = request.session_id(session);
    }

    let outcome = router.route(&request).await;
    if let Some(store) = sessions {
        store.close();
    }

    serde_json::to_string_pretty(&outcome)
        .map_err(|e| RouterError::Internal(format!("failed to serialize routing outcome: {e}")))
}

/// Render the effective configuration as TOML.
pub fn show_config(config: &TiergateConfig) -> Result<String, RouterError> {
    toml::to_string_pretty(config)
        .map_err(|e| RouterError::Internal(format!("failed to serialize config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> TiergateConfig {
        let mut config = TiergateConfig::default();
        config.classifier.enabled = false;
        config
    }

    fn input(prompt: &str) -> RouteInput {
        RouteInput {
            prompt: prompt.to_string(),
            system: None,
            max_tokens: 4096,
            session: None,
            tools: false,
            tool_names: Vec::new(),
        }
    }

    #[tokio::test]
    async fn route_prints_decision_json() {
        let json = route(offline_config(), &input("What is the capital of France?"))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["decision"]["tier"], "SIMPLE");
        assert_eq!(value["decision"]["model"], "google/gemini-2.5-flash");
        assert!(value["session_id"].is_string());
    }

    #[tokio::test]
    async fn route_honors_explicit_session_and_tools() {
        let mut args = input("Prove the theorem step by step");
        args.session = Some("cli-session".into());
        args.tool_names = vec!["bash".into()];
        let json = route(offline_config(), &args).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["session_id"], "cli-session");
        assert_eq!(value["profile"], "agentic");
        assert_eq!(value["decision"]["tier"], "REASONING");
    }

    #[test]
    fn config_renders_as_toml() {
        let rendered = show_config(&TiergateConfig::default()).unwrap();
        assert!(rendered.contains("[scoring]"));
        assert!(rendered.contains("baseline_model = \"anthropic/claude-opus-4\""));
        let reparsed = tiergate_config::load_and_validate_str(&rendered);
        assert!(reparsed.is_ok(), "rendered config must load back");
    }
}
