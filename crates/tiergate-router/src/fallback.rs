// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback classifier for prompts the rules leave ambiguous.
//!
//! Asks a cheap upstream model for a single tier name. Any failure degrades
//! to MEDIUM at confidence 0.5; classification never blocks a request.
//! Dropping the returned future cancels the upstream call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sha2::{Digest, Sha256};
use tiergate_config::model::ClassifierConfig;
use tiergate_core::{ClassificationCache, HttpCaller, RouterError, Tier};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Instruction sent ahead of the truncated prompt.
pub const CLASSIFIER_PROMPT: &str = "You route requests to language models by difficulty. \
Answer with exactly one word: SIMPLE, MEDIUM, COMPLEX, or REASONING.\n\
SIMPLE: greetings, factual lookups, definitions, translations.\n\
MEDIUM: explanations, summaries, routine code or writing tasks.\n\
COMPLEX: multi-part engineering, system design, long-form analysis.\n\
REASONING: proofs, formal derivations, multi-step math or logic.";

/// Confidence reported for a tier the upstream model produced.
pub const CLASSIFIED_CONFIDENCE: f64 = 0.75;

/// Confidence reported when classification degraded to the default tier.
pub const DEGRADED_CONFIDENCE: f64 = 0.5;

/// Tier reported when classification fails.
pub const DEGRADED_TIER: Tier = Tier::Medium;

/// Upper bound on how long a classification stays cached.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Match priority when a reply names more than one tier.
const PARSE_ORDER: [Tier; 4] = [Tier::Reasoning, Tier::Complex, Tier::Medium, Tier::Simple];

/// Find a tier name in a free-text reply, highest tier first.
pub fn parse_tier(reply: &str) -> Option<Tier> {
    let upper = reply.to_uppercase();
    PARSE_ORDER
        .into_iter()
        .find(|tier| upper.contains(tier.to_string().as_str()))
}

/// Outcome of one fallback classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackOutcome {
    pub tier: Tier,
    pub confidence: f64,
    /// Served from the cache without an upstream call.
    pub cached: bool,
    /// The upstream call failed and the default tier was used.
    pub degraded: bool,
}

impl FallbackOutcome {
    fn degraded() -> Self {
        Self {
            tier: DEGRADED_TIER,
            confidence: DEGRADED_CONFIDENCE,
            cached: false,
            degraded: true,
        }
    }
}

/// LLM-backed classifier with a TTL cache keyed by prompt fingerprint.
pub struct FallbackClassifier {
    http: Arc<dyn HttpCaller>,
    cache: Arc<dyn ClassificationCache>,
    config: ClassifierConfig,
}

impl FallbackClassifier {
    pub fn new(
        http: Arc<dyn HttpCaller>,
        cache: Arc<dyn ClassificationCache>,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            http,
            cache,
            config,
        }
    }

    /// Classifier with an in-memory cache sized from `config`.
    pub fn with_memory_cache(http: Arc<dyn HttpCaller>, config: ClassifierConfig) -> Self {
        let cache = Arc::new(MemoryClassificationCache::new(config.cache_max_entries));
        Self::new(http, cache, config)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// Classify `prompt`, consulting the cache first.
    pub async fn classify(&self, prompt: &str) -> FallbackOutcome {
        let truncated: String = prompt.chars().take(self.config.truncation_chars).collect();
        let key = cache_key(&truncated);

        if let Some(tier) = self.cache.get(&key).await {
            debug!(%tier, "fallback classifier cache hit");
            return FallbackOutcome {
                tier,
                confidence: CLASSIFIED_CONFIDENCE,
                cached: true,
                degraded: false,
            };
        }

        match self.call_upstream(&truncated).await {
            Ok(tier) => {
                let ttl = Duration::from_secs(self.config.cache_ttl_secs).min(MAX_CACHE_TTL);
                self.cache.set(key, tier, ttl).await;
                if self.cache.len().await > self.config.cache_max_entries {
                    self.cache.prune().await;
                }
                debug!(%tier, "fallback classifier resolved tier");
                FallbackOutcome {
                    tier,
                    confidence: CLASSIFIED_CONFIDENCE,
                    cached: false,
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "fallback classifier failed, using default tier");
                FallbackOutcome::degraded()
            }
        }
    }

    async fn call_upstream(&self, truncated: &str) -> Result<Tier, RouterError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": CLASSIFIER_PROMPT},
                {"role": "user", "content": truncated},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": false,
        });
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let url = self.endpoint();

        // Bounded even if the caller ignores its timeout argument.
        let response = tokio::time::timeout(timeout, self.http.post_json(&url, &body, timeout))
            .await
            .map_err(|_| RouterError::Timeout { duration: timeout })??;

        if !response.is_success() {
            return Err(RouterError::Classifier(format!(
                "upstream returned status {}",
                response.status
            )));
        }

        let reply = response.body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| RouterError::Classifier("response has no message content".into()))?;

        parse_tier(reply)
            .ok_or_else(|| RouterError::Classifier(format!("no tier name in reply {reply:?}")))
    }
}

fn cache_key(truncated: &str) -> String {
    hex::encode(Sha256::digest(truncated.as_bytes()))
}

/// Mutex-guarded in-memory [`ClassificationCache`].
pub struct MemoryClassificationCache {
    entries: Mutex<HashMap<String, (Tier, Instant)>>,
    max_entries: usize,
}

impl MemoryClassificationCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries,
        }
    }
}

#[async_trait]
impl ClassificationCache for MemoryClassificationCache {
    async fn get(&self, key: &str) -> Option<Tier> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(tier, _)| *tier)
    }

    async fn set(&self, key: String, tier: Tier, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_CACHE_TTL);
        self.entries.lock().await.insert(key, (tier, expires_at));
    }

    async fn prune(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| now < *expires_at);

        if entries.len() > self.max_entries {
            let mut by_expiry: Vec<(String, Instant)> = entries
                .iter()
                .map(|(key, (_, expires_at))| (key.clone(), *expires_at))
                .collect();
            by_expiry.sort_by_key(|(_, expires_at)| *expires_at);
            let excess = entries.len() - self.max_entries;
            for (key, _) in by_expiry.into_iter().take(excess) {
                entries.remove(&key);
            }
        }
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefers_highest_tier() {
        assert_eq!(parse_tier("SIMPLE"), Some(Tier::Simple));
        assert_eq!(parse_tier("  medium\n"), Some(Tier::Medium));
        assert_eq!(
            parse_tier("Not SIMPLE, this is COMPLEX"),
            Some(Tier::Complex)
        );
        assert_eq!(
            parse_tier("complex, maybe reasoning"),
            Some(Tier::Reasoning)
        );
        assert_eq!(parse_tier("no idea"), None);
    }

    #[test]
    fn cache_key_is_sha256_hex() {
        let key = cache_key("hello");
        assert_eq!(key.len(), 64);
        assert_eq!(key, cache_key("hello"));
        assert_ne!(key, cache_key("hello!"));
    }

    #[tokio::test(start_paused = true)]
    async fn memory_cache_expires_entries() {
        let cache = MemoryClassificationCache::new(10);
        cache.set("k".into(), Tier::Complex, Duration::from_secs(5)).await;
        assert_eq!(cache.get("k").await, Some(Tier::Complex));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.len().await, 1);
        cache.prune().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn memory_cache_accepts_unbounded_ttl() {
        let cache = MemoryClassificationCache::new(10);
        cache.set("k".into(), Tier::Medium, Duration::MAX).await;
        tokio::time::advance(Duration::from_secs(24 * 60 * 60)).await;
        assert_eq!(cache.get("k").await, Some(Tier::Medium));
    }

    #[tokio::test(start_paused = true)]
    async fn memory_cache_prune_enforces_bound() {
        let cache = MemoryClassificationCache::new(2);
        for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            cache
                .set(key.into(), Tier::Simple, Duration::from_secs(10 + i as u64))
                .await;
        }
        cache.prune().await;
        assert_eq!(cache.len().await, 2);
        // Soonest-expiring entries go first.
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("d").await, Some(Tier::Simple));
    }
}
