// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing tests.
//!
//! `TestHarness` assembles a router over the built-in catalog with a mock
//! fallback caller and an in-memory session store.

use std::sync::Arc;

use tiergate_config::TiergateConfig;
use tiergate_cost::StaticCatalog;
use tiergate_router::{FallbackClassifier, RouteOutcome, RouteRequest, Router};
use tiergate_session::SessionStore;

use crate::mock_http::MockHttpCaller;

/// Builder for test routers.
pub struct TestHarnessBuilder {
    config: TiergateConfig,
    http: MockHttpCaller,
    fallback: bool,
    sessions: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: TiergateConfig::default(),
            http: MockHttpCaller::new(),
            fallback: true,
            sessions: true,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: TiergateConfig) -> Self {
        self.config = config;
        self
    }

    /// Edit the default configuration in place.
    pub fn configure(mut self, edit: impl FnOnce(&mut TiergateConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    /// Use a pre-scripted HTTP caller.
    pub fn with_http(mut self, http: MockHttpCaller) -> Self {
        self.http = http;
        self
    }

    /// Route ambiguous prompts to the configured default tier instead of the
    /// fallback classifier.
    pub fn without_fallback(mut self) -> Self {
        self.fallback = false;
        self
    }

    pub fn without_sessions(mut self) -> Self {
        self.sessions = false;
        self
    }

    /// Build the harness. The session store has no background sweep.
    pub fn build(self) -> TestHarness {
        let config = Arc::new(self.config);
        let sessions = Arc::new(SessionStore::new(&config.session));
        let http = Arc::new(self.http);

        let mut router = Router::new(Arc::clone(&config), Arc::new(StaticCatalog::builtin()));
        if self.fallback {
            router = router.with_fallback(FallbackClassifier::with_memory_cache(
                http.clone(),
                config.classifier.clone(),
            ));
        }
        if self.sessions {
            router = router.with_sessions(Arc::clone(&sessions));
        }

        TestHarness {
            router,
            http,
            sessions,
        }
    }
}

/// Router plus handles to its mocks.
pub struct TestHarness {
    pub router: Router,
    pub http: Arc<MockHttpCaller>,
    pub sessions: Arc<SessionStore>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default config, fallback classifier, and sessions.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Route a bare prompt.
    pub async fn route(&self, prompt: &str) -> RouteOutcome {
        self.router.route(&RouteRequest::new(prompt)).await
    }

    /// Route a bare prompt on an explicit session.
    pub async fn route_in_session(&self, session_id: &str, prompt: &str) -> RouteOutcome {
        self.router
            .route(&RouteRequest::new(prompt).session_id(session_id))
            .await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
