//! # Gateway Config
//!
//! Process-wide configuration for the flashcard LLM gateway, read once at
//! startup from `OPENROUTER_*` environment variables.
//!
//! Everything is immutable after construction except the default model,
//! which can be swapped at runtime to change the fallback model for
//! subsequent calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arc_swap::ArcSwap;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable holding the provider API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the provider base URL.
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
/// Environment variable overriding the per-attempt timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "OPENROUTER_TIMEOUT_MS";
/// Environment variable overriding the retry count.
pub const ENV_MAX_RETRIES: &str = "OPENROUTER_MAX_RETRIES";
/// Environment variable overriding the request rate in queries per second.
pub const ENV_RATE_LIMIT_QPS: &str = "OPENROUTER_RATE_LIMIT_QPS";
/// Environment variable overriding the default model.
pub const ENV_DEFAULT_MODEL: &str = "OPENROUTER_DEFAULT_MODEL";

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API key is missing or empty
    #[error("Missing {var} environment variable")]
    MissingApiKey {
        /// Variable that should hold the key
        var: &'static str,
    },
    /// A variable could not be parsed
    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Offending variable
        var: &'static str,
        /// Raw value
        value: String,
        /// Parse failure
        reason: String,
    },
}

/// Gateway configuration
#[derive(Debug)]
pub struct GatewayConfig {
    api_key: Secret<String>,
    base_url: Url,
    timeout: Duration,
    max_retries: u32,
    rate_limit_qps: f64,
    default_model: ArcSwap<String>,
}

impl GatewayConfig {
    /// Default provider endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";
    /// Default per-attempt timeout (30 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    /// Default request rate (queries per second).
    pub const DEFAULT_RATE_LIMIT_QPS: f64 = 1.0;
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "openai/gpt-4o-mini";

    /// Create a configuration with default values
    ///
    /// # Errors
    /// Returns error if the API key is empty
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey { var: ENV_API_KEY });
        }

        Ok(Self {
            api_key: Secret::new(api_key),
            base_url: default_base_url(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            rate_limit_qps: Self::DEFAULT_RATE_LIMIT_QPS,
            default_model: ArcSwap::from_pointee(Self::DEFAULT_MODEL.to_string()),
        })
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns error if the API key is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns error if the API key is missing or a value cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();
        let mut config = Self::new(api_key)?;

        if let Some(raw) = non_empty(lookup(ENV_BASE_URL)) {
            config.base_url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                var: ENV_BASE_URL,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(raw) = non_empty(lookup(ENV_TIMEOUT_MS)) {
            let millis: u64 = parse_var(ENV_TIMEOUT_MS, &raw)?;
            if millis == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_TIMEOUT_MS,
                    value: raw,
                    reason: "timeout must be greater than zero".to_string(),
                });
            }
            config.timeout = Duration::from_millis(millis);
        }

        if let Some(raw) = non_empty(lookup(ENV_MAX_RETRIES)) {
            config.max_retries = parse_var(ENV_MAX_RETRIES, &raw)?;
        }

        if let Some(raw) = non_empty(lookup(ENV_RATE_LIMIT_QPS)) {
            config.rate_limit_qps = parse_var(ENV_RATE_LIMIT_QPS, &raw)?;
        }

        if let Some(model) = non_empty(lookup(ENV_DEFAULT_MODEL)) {
            config.default_model.store(Arc::new(model));
        }

        debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout.as_millis(),
            max_retries = config.max_retries,
            rate_limit_qps = config.rate_limit_qps,
            default_model = %config.default_model(),
            "Gateway configuration loaded"
        );

        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the request rate in queries per second
    #[must_use]
    pub fn with_rate_limit_qps(mut self, qps: f64) -> Self {
        self.rate_limit_qps = qps;
        self
    }

    /// Set the default model
    #[must_use]
    pub fn with_default_model(self, model: impl Into<String>) -> Self {
        self.set_default_model(model);
        self
    }

    /// Get the API key (exposed for use in requests)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret().as_str()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the maximum number of retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the request rate in queries per second
    pub fn rate_limit_qps(&self) -> f64 {
        self.rate_limit_qps
    }

    /// Get the current default model
    pub fn default_model(&self) -> String {
        self.default_model.load().as_ref().clone()
    }

    /// Replace the default model used by subsequent calls (last write wins)
    pub fn set_default_model(&self, model: impl Into<String>) {
        self.default_model.store(Arc::new(model.into()));
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(GatewayConfig::DEFAULT_BASE_URL).expect("valid default URL")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
