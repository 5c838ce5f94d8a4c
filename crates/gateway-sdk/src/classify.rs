//! Classification of failed HTTP exchanges into gateway errors.
//!
//! | Condition            | Error           | Retryable |
//! |----------------------|-----------------|-----------|
//! | 401 / 403            | `Unauthorized`  | no        |
//! | 404                  | `NotFound`      | no        |
//! | 429                  | `RateLimited`   | yes       |
//! | 5xx                  | `ServerError`   | yes       |
//! | timeout              | `Timeout`       | yes       |
//! | anything else        | `Transport`     | no        |

use gateway_core::GatewayError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use std::error::Error as _;
use std::time::Duration;

/// Error response body from an OpenAI-compatible API.
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Classify a non-success HTTP response.
pub fn status_error(status: u16, retry_after: Option<Duration>, body: &str) -> GatewayError {
    let message = error_message(status, body);

    match status {
        401 | 403 => GatewayError::unauthorized(status, message),
        404 => GatewayError::not_found(message),
        429 => GatewayError::rate_limited(retry_after, message),
        500..=599 => GatewayError::server_error(status, message),
        _ => GatewayError::transport(format!("HTTP {status}: {message}")),
    }
}

/// Classify a failure to send a request or read its response.
pub fn transport_error(error: &reqwest::Error, timeout: Duration) -> GatewayError {
    if error.is_timeout() {
        return GatewayError::timeout(timeout);
    }

    // reqwest's own message omits the underlying cause (DNS, refused, reset).
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    GatewayError::transport(message)
}

/// Read a `Retry-After` header given in seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn error_message(status: u16, body: &str) -> String {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(body) {
        return api_error.error.message;
    }

    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}
