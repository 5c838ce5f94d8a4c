//! # Flashcard Gateway SDK
//!
//! Client for OpenAI-compatible chat completion APIs (OpenRouter by default),
//! used by the flashcard generator.
//!
//! ## Features
//!
//! - Process-wide request spacing via a shared rate limiter
//! - Retries with exponential backoff for 429, 5xx and timeouts
//! - Structured output: JSON-schema response formats are validated locally
//! - Cancellation through `tokio_util` tokens
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gateway_core::ChatMessage;
//! use gateway_sdk::{Client, SendChatOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gateway_core::GatewayError> {
//!     let client = Client::builder()
//!         .api_key("sk-or-...")
//!         .build()?;
//!
//!     let reply = client
//!         .send_chat(
//!             vec![ChatMessage::system("Be brief"), ChatMessage::user("Hello!")],
//!             SendChatOptions::new().temperature(0.2),
//!         )
//!         .await?;
//!
//!     println!("Response: {}", reply.content);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod classify;
mod client;
mod options;
pub mod parser;

pub use client::{Client, ClientBuilder};
pub use options::SendChatOptions;
pub use parser::{parse_and_validate, parse_reply};

pub use tokio_util::sync::CancellationToken;
