//! Application configuration model.
//!
//! Loaded from `config.toml`; every field has a default so a missing or
//! partial file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Secret the mock directory accepts for every account.
pub const DEFAULT_ACCEPTED_SECRET: &str = "123456";

/// Simulated backend latency applied to each login attempt.
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,
    #[serde(default = "default_accepted_secret")]
    pub accepted_secret: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the directory holding `storage.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

fn default_login_delay_ms() -> u64 {
    DEFAULT_LOGIN_DELAY_MS
}

fn default_accepted_secret() -> String {
    DEFAULT_ACCEPTED_SECRET.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: default_login_delay_ms(),
            accepted_secret: default_accepted_secret(),
            log_level: default_log_level(),
            storage_dir: None,
        }
    }
}

impl AppConfig {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("login_delay_ms = 0").unwrap();
        assert_eq!(config.login_delay(), Duration::ZERO);
        assert_eq!(config.accepted_secret, "123456");
        assert_eq!(config.log_level, "info");
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
