//! Error types for the gateway.
//!
//! Transport-layer failures (`Unauthorized` through `Transport`) come from
//! classifying the HTTP exchange; `MalformedReply` and `SchemaViolation` come
//! from the response parser and are never retried.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The caller misused the API (e.g. empty message list).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },

    /// The provider rejected the credentials (401/403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider.
        message: String,
    },

    /// The endpoint or resource does not exist (404).
    #[error("Not found: {message}")]
    NotFound {
        /// Error message from the provider.
        message: String,
    },

    /// The provider is throttling requests (429).
    #[error("Rate limited by provider{}: {message}", format_retry_after(.retry_after))]
    RateLimited {
        /// Wait suggested by the `Retry-After` header.
        retry_after: Option<Duration>,
        /// Error message from the provider.
        message: String,
    },

    /// The provider failed (5xx).
    #[error("Provider server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider.
        message: String,
    },

    /// The HTTP attempt exceeded the configured timeout.
    #[error("Request timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Per-attempt timeout that elapsed.
        timeout: Duration,
    },

    /// Any other network or HTTP failure.
    #[error("Transport error: {message}")]
    Transport {
        /// Original error message.
        message: String,
    },

    /// The reply had no usable content or was not valid JSON.
    #[error("Malformed reply: {message}")]
    MalformedReply {
        /// What was wrong with the reply.
        message: String,
    },

    /// The JSON answer did not satisfy the requested schema.
    #[error("Response validation failed: {}", join_violations(.violations))]
    SchemaViolation {
        /// Validation errors in encounter order.
        violations: Vec<SchemaViolation>,
    },

    /// The caller cancelled the call.
    #[error("Request cancelled")]
    Cancelled,

    /// The client could not be constructed.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },
}

fn format_retry_after(retry_after: &Option<Duration>) -> String {
    retry_after.map_or_else(String::new, |d| format!(", retry after {}s", d.as_secs()))
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single schema validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value (empty for the root).
    pub path: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl SchemaViolation {
    /// Create a violation.
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

impl GatewayError {
    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a rate limited error.
    pub fn rate_limited(retry_after: Option<Duration>, message: impl Into<String>) -> Self {
        Self::RateLimited {
            retry_after,
            message: message.into(),
        }
    }

    /// Create a server error.
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a malformed reply error.
    pub fn malformed_reply(message: impl Into<String>) -> Self {
        Self::MalformedReply {
            message: message.into(),
        }
    }

    /// Create a schema violation error.
    pub fn schema_violation(violations: Vec<SchemaViolation>) -> Self {
        Self::SchemaViolation { violations }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if the error is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::ServerError { .. } | Self::Timeout { .. }
        )
    }

    /// Get the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::ServerError { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Get the retry-after hint if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Get the schema violations if this is a validation failure.
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::SchemaViolation { violations } => violations,
            _ => &[],
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport_error",
            Self::MalformedReply { .. } => "malformed_reply",
            Self::SchemaViolation { .. } => "schema_violation",
            Self::Cancelled => "cancelled",
            Self::Configuration { .. } => "configuration",
        }
    }
}
