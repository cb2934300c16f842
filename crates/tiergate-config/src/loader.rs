// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tiergate.toml` > `~/.config/tiergate/tiergate.toml` >
//! `/etc/tiergate/tiergate.toml` with environment variable overrides via `TIERGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TiergateConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tiergate/tiergate.toml";

/// Local (working directory) config file.
pub const LOCAL_CONFIG_PATH: &str = "tiergate.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tiergate/tiergate.toml` (system-wide)
/// 3. `~/.config/tiergate/tiergate.toml` (user XDG config)
/// 4. `./tiergate.toml` (local directory)
/// 5. `TIERGATE_*` environment variables
pub fn load_config() -> Result<TiergateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TiergateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TiergateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TiergateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TiergateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TiergateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// `~/.config/tiergate/tiergate.toml`, when a config dir exists on this platform.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("tiergate/tiergate.toml"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TIERGATE_SESSION_IDLE_TIMEOUT_SECS` must map to
/// `session.idle_timeout_secs`, not `session.idle.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("TIERGATE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env key onto its dotted config path.
fn map_env_key(key: &str) -> String {
    const SECTIONS: &[&str] = &["logging_", "overrides_", "classifier_", "session_", "cost_"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            return format!("{}.{rest}", section.trim_end_matches('_'));
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("logging_level"), "logging.level");
        assert_eq!(
            map_env_key("session_idle_timeout_secs"),
            "session.idle_timeout_secs"
        );
        assert_eq!(map_env_key("classifier_api_base"), "classifier.api_base");
        assert_eq!(
            map_env_key("overrides_max_tokens_force_complex"),
            "overrides.max_tokens_force_complex"
        );
    }

    #[test]
    fn unknown_section_passes_through() {
        assert_eq!(map_env_key("something_else"), "something_else");
    }
}
