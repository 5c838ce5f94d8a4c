//! # Gateway Resilience
//!
//! Resilience patterns for the flashcard LLM gateway:
//! - Request-start rate limiting with FIFO queuing
//! - Retry policy with exponential backoff and cooperative cancellation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod rate_limit;
pub mod retry;

// Re-export main types
pub use rate_limit::RateLimiter;
pub use retry::{RetryConfig, RetryPolicy};
pub use tokio_util::sync::CancellationToken;
