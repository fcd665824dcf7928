//! Run configuration.
//!
//! A `ProcessorConfig` is resolved once at startup (defaults, then an optional
//! TOML file, then command-line flags) and never changes during the run.
//!
//! ```toml
//! input = "transaction-log.txt"
//! output = "output.txt"
//! symbol = "TSLA"
//! side = "sell"
//! base_url = "https://example.com/api"
//! retries = 3
//! timeout = "30s"
//! backoff = "1s"
//! insecure = false
//! ```

use crate::delivery::RetryPolicy;
use crate::feed::OrderFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Transaction log, one JSON order per line.
    pub input: PathBuf,
    /// Created (or truncated) at start; one response body per line.
    pub output: PathBuf,
    pub symbol: String,
    pub side: String,
    /// Orders are fetched from `{base_url}/{order_id}`.
    pub base_url: String,
    /// Retry budget per order, per pass.
    pub retries: u32,
    /// Per-request timeout.
    #[serde(with = "human_duration")]
    pub timeout: Duration,
    /// Backoff unit; the n-th retry waits `n * backoff`.
    #[serde(with = "human_duration")]
    pub backoff: Duration,
    /// Skip TLS certificate validation.
    pub insecure: bool,
    pub verbose: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("transaction-log.txt"),
            output: PathBuf::from("output.txt"),
            symbol: "TSLA".into(),
            side: "sell".into(),
            base_url: "https://example.com/api".into(),
            retries: 3,
            timeout: Duration::from_secs(30),
            backoff: Duration::from_secs(1),
            insecure: false,
            verbose: false,
        }
    }
}

impl ProcessorConfig {
    /// Load a config from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the run cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if self.side.trim().is_empty() {
            return Err(ConfigError::Invalid("side must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
        }

        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base url '{}' must use http or https",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn filter(&self) -> OrderFilter {
        OrderFilter::new(self.symbol.clone(), self.side.clone())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.backoff)
    }
}

/// Durations as human-readable strings ("30s", "1m 30s", "250ms").
mod human_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
