//! # Gateway Generation
//!
//! Turns a block of source text into flashcard proposals by asking the LLM
//! gateway for a reply that matches a strict flashcard JSON schema.
//!
//! ```rust,no_run
//! use gateway_generation::{FlashcardGenerator, GenerateFlashcards};
//! use gateway_sdk::Client;
//!
//! # async fn example(text: String) -> Result<(), Box<dyn std::error::Error>> {
//! let generator = FlashcardGenerator::new(Client::from_env()?);
//! let generation = generator
//!     .generate(&GenerateFlashcards::new(text), None)
//!     .await?;
//! for card in &generation.flashcards {
//!     println!("{} -> {}", card.front, card.back);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod generator;
pub mod schema;

pub use command::{GenerateFlashcards, SUPPORTED_MODEL};
pub use error::GenerationError;
pub use generator::{
    text_hash, FlashcardGenerator, FlashcardSource, GeneratedFlashcard, Generation,
};
pub use schema::{flashcard_response_format, FLASHCARD_SCHEMA_NAME};
