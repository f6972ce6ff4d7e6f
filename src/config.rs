//! Configuration loader and validator for the watcher.
//! Defaults match the devnet the broadcast scripts target; a TOML file and
//! command-line flags can override any field.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

// ------------------------------------------------------------------------------------------------
// Defaults
// ------------------------------------------------------------------------------------------------

/// Chain the broadcast scripts are run against
pub const DEFAULT_CHAIN_ID: u64 = 43;
pub const DEFAULT_API_URL: &str = "https://api-evmx-devnet.socket.tech/getDetailsByTxHash";
pub const DEFAULT_POLL_INTERVAL_MILLISECONDS: u64 = 2000;
pub const DEFAULT_BROADCAST_DIR: &str = "broadcast";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// ------------------------------------------------------------------------------------------------
// Configuration Struct
// ------------------------------------------------------------------------------------------------

/// Runtime settings of the watcher.
///
/// Missing keys in a config file take the defaults above.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WatcherConfig {
    /// Network id; selects the broadcast directory and is the fallback display chain
    pub chain_id: u64,
    /// Status endpoint; the hash is appended as the `txHash` query parameter
    pub api_url: String,
    /// Time between the starts of two poll passes
    pub poll_interval_ms: u64,
    /// Root of the Forge broadcast output
    pub broadcast_dir: PathBuf,
    /// Per-request timeout in seconds, 0 disables it
    pub request_timeout_secs: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MILLISECONDS,
            broadcast_dir: PathBuf::from(DEFAULT_BROADCAST_DIR),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Error Types and Validation
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl WatcherConfig {
    /// Load a config file; the result still needs `validate` after overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path)?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config_str)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError("Poll interval must be positive".into()));
        }
        self.endpoint()?;
        Ok(())
    }

    /// Parsed status endpoint; only http and https are accepted
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.api_url.trim())
            .map_err(|e| ConfigError::ValidationError(format!("Invalid API URL '{}': {}", self.api_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::ValidationError(format!(
                "API URL must use http or https, got '{}'",
                scheme
            ))),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
