//! Client configuration.
//!
//! Configuration lives in `$XDG_CONFIG_HOME/proxwatch/config.toml`; every
//! field has a built-in default and can be overridden by environment
//! variables (`PROXWATCH_API_URL`, `PROXWATCH_POLL_INTERVAL_MS`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "proxwatch";
const CONFIG_FILE: &str = "config.toml";

/// Minimum automatic poll period when polling is enabled.
const MIN_POLL_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the monitoring backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Automatic refresh period for the status view, in milliseconds.
    /// Zero disables automatic polling.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    30_000 // matches the dashboard's 30 second refresh
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file if present, then
    /// environment overrides. Never fails; a malformed file is ignored in
    /// favor of defaults.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load from an explicit file path, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|text| toml::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Poll period clamped to the supported floor; zero stays zero
    /// (polling disabled).
    pub fn effective_poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("PROXWATCH_API_URL") {
            if !url.is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(interval) = std::env::var("PROXWATCH_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.poll_interval_ms = ms;
            }
        }
    }
}
