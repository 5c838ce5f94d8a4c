//! # Gateway Telemetry
//!
//! Structured logging for the flashcard LLM gateway: a `tracing` subscriber
//! with an env-filter and either human-readable or JSON output.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;

pub use logging::{init_logging, LoggingConfig, LoggingError};
