//! # Gateway Core
//!
//! Core types and error handling for the flashcard LLM gateway.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Chat messages and the wire request payload
//! - Structured output formats (JSON-schema mode)
//! - Provider replies and the parsed reply handed back to callers
//! - The gateway error taxonomy

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult, SchemaViolation};
pub use request::{ChatMessage, ChatRequest, JsonSchemaFormat, MessageRole, ResponseFormat};
pub use response::{ChatReply, Choice, ParsedReply, Usage};
