//! Flashcard generator.

use crate::command::GenerateFlashcards;
use crate::error::GenerationError;
use crate::schema::flashcard_response_format;
use chrono::{DateTime, Utc};
use gateway_core::{ChatMessage, GatewayError};
use gateway_sdk::{CancellationToken, Client, SendChatOptions};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Instant;
use tracing::{error, info, instrument};
use validator::Validate;

const SYSTEM_PROMPT: &str = "You are an assistant that writes study flashcards. \
Read the user's text and produce between 3 and 20 flashcards covering its key facts and ideas. \
Each card has a concise question or term on the front (at most 200 characters) \
and a self-contained answer on the back (at most 500 characters). \
Write the cards in the language of the source text and do not invent facts that are not in it.";

const GENERATION_TEMPERATURE: f32 = 0.2;

/// Where a flashcard came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashcardSource {
    /// Proposed by the model and not yet edited
    AiGenerated,
}

/// A proposed flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFlashcard {
    /// Question side
    pub front: String,
    /// Answer side
    pub back: String,
    /// Origin of the card
    pub source: FlashcardSource,
}

/// Result of one generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    /// SHA-256 of the source text, lowercase hex
    pub hash: String,
    /// Source text length in characters
    pub input_length: usize,
    /// Number of proposals returned
    pub generated_count: usize,
    /// Wall time spent in the gateway call, at least 1ms
    pub generation_time_ms: u64,
    /// Model name from the command
    pub model: String,
    /// When the generation finished
    pub created_at: DateTime<Utc>,
    /// The proposals
    pub flashcards: Vec<GeneratedFlashcard>,
}

#[derive(Debug, Deserialize)]
struct FlashcardsPayload {
    flashcards: Vec<CardPayload>,
}

#[derive(Debug, Deserialize)]
struct CardPayload {
    front: String,
    back: String,
}

/// Generates flashcard proposals through the gateway client.
#[derive(Debug, Clone)]
pub struct FlashcardGenerator {
    client: Client,
}

impl FlashcardGenerator {
    /// Create a generator using `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying gateway client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Validate `command`, ask the model for flashcards and return them.
    ///
    /// # Errors
    /// - [`GenerationError::InvalidInput`] before any network call
    /// - [`GenerationError::Gateway`] for any gateway, parser or cancellation failure
    #[instrument(
        skip_all,
        fields(model = %command.model, input_length = command.text.chars().count())
    )]
    pub async fn generate(
        &self,
        command: &GenerateFlashcards,
        cancel: Option<CancellationToken>,
    ) -> Result<Generation, GenerationError> {
        command.validate()?;

        let hash = text_hash(&command.text);
        let input_length = command.text.chars().count();

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(command.text.as_str()),
        ];
        let mut options = SendChatOptions::new()
            .model(command.provider_model())
            .temperature(GENERATION_TEMPERATURE)
            .response_format(flashcard_response_format());
        if let Some(token) = cancel {
            options = options.cancel_token(token);
        }

        let started = Instant::now();
        let result = self
            .client
            .send_chat(messages, options)
            .await
            .and_then(|reply| decode_flashcards(&reply));

        let flashcards = match result {
            Ok(flashcards) => flashcards,
            Err(err) => {
                error!(
                    error = %err,
                    kind = err.kind(),
                    input_length,
                    "Flashcard generation failed"
                );
                return Err(err.into());
            }
        };

        let generation_time_ms =
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX).max(1);

        info!(
            generated_count = flashcards.len(),
            generation_time_ms, "Flashcards generated"
        );

        Ok(Generation {
            hash,
            input_length,
            generated_count: flashcards.len(),
            generation_time_ms,
            model: command.model.clone(),
            created_at: Utc::now(),
            flashcards,
        })
    }
}

fn decode_flashcards(
    reply: &gateway_core::ParsedReply,
) -> Result<Vec<GeneratedFlashcard>, GatewayError> {
    let payload: FlashcardsPayload = reply
        .json_as()
        .ok_or_else(|| GatewayError::malformed_reply("Reply carries no JSON payload"))?
        .map_err(|e| GatewayError::malformed_reply(format!("Unexpected flashcard payload: {e}")))?;

    Ok(payload
        .flashcards
        .into_iter()
        .map(|card| GeneratedFlashcard {
            front: card.front,
            back: card.back,
            source: FlashcardSource::AiGenerated,
        })
        .collect())
}

/// SHA-256 of `text` as lowercase hex.
pub fn text_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
