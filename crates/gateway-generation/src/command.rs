//! Generation input and its validation rules.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// The only model name accepted for generation.
pub const SUPPORTED_MODEL: &str = "gpt-4o-mini";

/// Minimum source text length in characters.
pub const MIN_TEXT_CHARS: u64 = 1000;
/// Maximum source text length in characters.
pub const MAX_TEXT_CHARS: u64 = 10_000;

/// Request to generate flashcards from a block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GenerateFlashcards {
    /// Source text, 1000 to 10000 characters
    #[validate(length(
        min = MIN_TEXT_CHARS,
        max = MAX_TEXT_CHARS,
        message = "text must be between 1000 and 10000 characters"
    ))]
    pub text: String,
    /// Model name; must be `gpt-4o-mini`
    #[validate(custom(function = "validate_model"))]
    pub model: String,
}

impl GenerateFlashcards {
    /// Create a command for the supported model.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: SUPPORTED_MODEL.to_string(),
        }
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Provider model id the gateway is asked for.
    pub fn provider_model(&self) -> String {
        format!("openai/{}", self.model)
    }
}

fn validate_model(model: &str) -> Result<(), ValidationError> {
    if model == SUPPORTED_MODEL {
        Ok(())
    } else {
        let mut error = ValidationError::new("unsupported_model");
        error.message = Some(format!("model must be \"{SUPPORTED_MODEL}\"").into());
        Err(error)
    }
}
