// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store and escalation state machine.
//!
//! Per session: absent -> pinned@tier -> pinned@tier with 0..=2 strikes ->
//! escalated@tier+1 with strikes reset. An escalated session never escalates
//! again until it is evicted. Idle timeout returns any state to absent.
//!
//! All mutation goes through one map-wide lock. [`SessionStore::lock`] hands
//! out a [`SessionGuard`] so a caller can run lookup, upgrade, fingerprint, and
//! escalation for one request as a single atomic step.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tiergate_config::TierTable;
use tiergate_config::model::SessionConfig;
use tiergate_core::Tier;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Number of recent request fingerprints kept per session.
pub const FINGERPRINT_WINDOW: usize = 3;

/// Consecutive repeats (beyond the first request) that trigger escalation.
const STRIKE_LIMIT: u32 = 2;

const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Longer configured sweep intervals are shortened to this.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

type SessionMap = HashMap<String, SessionEntry>;

/// State pinned to one session id.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub model: String,
    pub tier: Tier,
    pub created_at: Instant,
    pub last_used_at: Instant,
    pub request_count: u64,
    /// Consecutive identical fingerprints seen, reset on any change.
    pub strikes: u32,
    /// Set once three-strike escalation has fired.
    pub escalated: bool,
    recent_hashes: VecDeque<String>,
}

impl SessionEntry {
    fn new(model: String, tier: Tier, now: Instant) -> Self {
        Self {
            model,
            tier,
            created_at: now,
            last_used_at: now,
            request_count: 1,
            strikes: 0,
            escalated: false,
            recent_hashes: VecDeque::with_capacity(FINGERPRINT_WINDOW),
        }
    }

    /// Most recent fingerprints, oldest first.
    pub fn recent_hashes(&self) -> impl Iterator<Item = &str> {
        self.recent_hashes.iter().map(String::as_str)
    }

    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_used_at) > idle_timeout
    }
}

/// Result of a successful escalation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    pub from: Tier,
    pub to: Tier,
    pub model: String,
}

/// Snapshot counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub active: usize,
    pub escalated: usize,
}

/// Owned session map with an optional background idle sweep.
pub struct SessionStore {
    sessions: Arc<Mutex<SessionMap>>,
    idle_timeout: Duration,
    sweep_interval: Duration,
    shutdown: CancellationToken,
}

impl SessionStore {
    /// Create a store without a background sweep. Idle sessions are still
    /// evicted lazily on lookup.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            shutdown: CancellationToken::new(),
        }
    }

    /// Create a store and start its background sweep.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &SessionConfig) -> Self {
        let store = Self::new(config);
        spawn_sweeper(
            Arc::downgrade(&store.sessions),
            store.idle_timeout,
            store.sweep_interval,
            store.shutdown.clone(),
        );
        store
    }

    /// Stop the background sweep. Stored sessions are kept.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Take the map-wide lock for a multi-step update.
    ///
    /// The guard must not be held across an `.await`.
    pub fn lock(&self) -> SessionGuard<'_> {
        SessionGuard {
            sessions: lock_map(&self.sessions),
            idle_timeout: self.idle_timeout,
        }
    }

    /// Current entry, or `None` if absent or idle past the timeout.
    pub fn get_session(&self, session_id: &str) -> Option<SessionEntry> {
        self.lock().get_session(session_id).cloned()
    }

    pub fn set_session(&self, session_id: &str, model: &str, tier: Tier) {
        self.lock().set_session(session_id, model, tier);
    }

    pub fn touch_session(&self, session_id: &str) -> bool {
        self.lock().touch_session(session_id)
    }

    pub fn record_request_hash(&self, session_id: &str, hash: &str) -> bool {
        self.lock().record_request_hash(session_id, hash)
    }

    pub fn escalate_session(&self, session_id: &str, tiers: &TierTable) -> Option<Escalation> {
        self.lock().escalate_session(session_id, tiers)
    }

    pub fn clear_session(&self, session_id: &str) -> bool {
        self.lock().clear_session(session_id)
    }

    pub fn clear_all(&self) {
        let mut sessions = lock_map(&self.sessions);
        let count = sessions.len();
        sessions.clear();
        debug!(count, "cleared all sessions");
    }

    /// Evict every idle session now. Returns the number evicted.
    pub fn sweep(&self) -> usize {
        sweep_map(&mut lock_map(&self.sessions), self.idle_timeout, Instant::now())
    }

    pub fn stats(&self) -> SessionStats {
        let sessions = lock_map(&self.sessions);
        SessionStats {
            active: sessions.len(),
            escalated: sessions.values().filter(|e| e.escalated).count(),
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Exclusive access to the session map for one request.
pub struct SessionGuard<'a> {
    sessions: MutexGuard<'a, SessionMap>,
    idle_timeout: Duration,
}

impl SessionGuard<'_> {
    /// Current entry, evicting it first if it has been idle too long.
    pub fn get_session(&mut self, session_id: &str) -> Option<&SessionEntry> {
        let now = Instant::now();
        if self
            .sessions
            .get(session_id)
            .is_some_and(|e| e.is_idle(now, self.idle_timeout))
        {
            self.sessions.remove(session_id);
            debug!(session_id, "evicted idle session on lookup");
            return None;
        }
        self.sessions.get(session_id)
    }

    /// Pin `model`/`tier`. Creates the entry on first sight, otherwise re-pins
    /// and counts one more request.
    pub fn set_session(&mut self, session_id: &str, model: &str, tier: Tier) {
        let now = Instant::now();
        match self.sessions.get_mut(session_id) {
            Some(entry) => {
                entry.model = model.to_string();
                entry.tier = tier;
                entry.last_used_at = now;
                entry.request_count += 1;
            }
            None => {
                self.sessions.insert(
                    session_id.to_string(),
                    SessionEntry::new(model.to_string(), tier, now),
                );
                debug!(session_id, model, %tier, "pinned new session");
            }
        }
    }

    /// Bump recency and the request counter without touching the pinned model.
    /// Returns `false` for an unknown session.
    pub fn touch_session(&mut self, session_id: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(entry) => {
                entry.last_used_at = Instant::now();
                entry.request_count += 1;
                true
            }
            None => false,
        }
    }

    /// Push a request fingerprint and report whether escalation should fire.
    ///
    /// True exactly when this is the third identical fingerprint in a row and
    /// the session has not escalated yet. Unknown sessions return `false`.
    pub fn record_request_hash(&mut self, session_id: &str, hash: &str) -> bool {
        let Some(entry) = self.sessions.get_mut(session_id) else {
            return false;
        };

        if entry.recent_hashes.back().is_some_and(|last| last == hash) {
            entry.strikes += 1;
        } else {
            entry.strikes = 0;
        }
        entry.recent_hashes.push_back(hash.to_string());
        while entry.recent_hashes.len() > FINGERPRINT_WINDOW {
            entry.recent_hashes.pop_front();
        }

        entry.strikes >= STRIKE_LIMIT && !entry.escalated
    }

    /// Move the session one tier up and re-pin it to that tier's primary in
    /// `tiers`. `None` at REASONING or for an unknown session.
    pub fn escalate_session(&mut self, session_id: &str, tiers: &TierTable) -> Option<Escalation> {
        let entry = self.sessions.get_mut(session_id)?;
        let from = entry.tier;
        let to = from.next()?;
        let model = tiers.get(to).primary.clone();

        entry.tier = to;
        entry.model = model.clone();
        entry.strikes = 0;
        entry.escalated = true;
        entry.last_used_at = Instant::now();

        info!(session_id, %from, %to, model = model.as_str(), "escalated session after repeated requests");
        Some(Escalation { from, to, model })
    }

    pub fn clear_session(&mut self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }
}

fn lock_map(sessions: &Mutex<SessionMap>) -> MutexGuard<'_, SessionMap> {
    // A panic while holding the lock leaves the map structurally valid.
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn sweep_map(sessions: &mut SessionMap, idle_timeout: Duration, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_idle(now, idle_timeout));
    before - sessions.len()
}

/// tokio intervals reject a zero period, and `Instant + period` must not overflow.
fn sweep_period(configured: Duration) -> Duration {
    configured.clamp(MIN_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL)
}

fn spawn_sweeper(
    sessions: Weak<Mutex<SessionMap>>,
    idle_timeout: Duration,
    sweep_interval: Duration,
    shutdown: CancellationToken,
) {
    let sweep_interval = sweep_period(sweep_interval);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + sweep_interval, sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(sessions) = sessions.upgrade() else { break };
                    let evicted = sweep_map(&mut lock_map(&sessions), idle_timeout, Instant::now());
                    if evicted > 0 {
                        debug!(evicted, "swept idle sessions");
                    }
                }
            }
        }
        debug!("session sweep stopped");
    });
}
