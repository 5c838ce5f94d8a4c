//! Integration tests for the flashcard LLM gateway
//!
//! Exercises the client against a wiremock provider:
//! - Chat round-trips and structured output
//! - Clients built from environment configuration
//! - Retry and failure classification
//! - Request spacing across concurrent callers
//! - Flashcard generation end to end

pub mod mock_provider;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;
pub use mock_provider::*;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod rate_limit_tests;
