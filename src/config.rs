//! Configuration for ticketsafi-client.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default delay between two status checks (3 seconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

/// Shortest delay between two status checks.
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Default number of status checks before giving up (≈ 2 minutes at 3s).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the TicketSafi API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token sent with every API request.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Payment confirmation polling policy.
    #[serde(default)]
    pub poll: PollConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Polling policy for payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between checks in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of checks per session.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout(),
            poll: PollConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PollConfig {
    /// Delay between checks.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Reject policies that could never make progress.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the interval is below
    /// [`MIN_POLL_INTERVAL_MS`] or the attempt budget is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if self.interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(crate::Error::Config(format!(
                "poll.interval_ms must be at least {MIN_POLL_INTERVAL_MS}"
            )));
        }
        if self.max_attempts == 0 {
            return Err(crate::Error::Config(
                "poll.max_attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_request_timeout() -> u64 {
    15
}

const fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

const fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform-specific location of the default config file.
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "ticketsafi")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".ticketsafi/config.toml"))
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
