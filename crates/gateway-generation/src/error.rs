//! Generation errors.

use gateway_core::GatewayError;
use validator::ValidationErrors;

/// Message shown to end users for any gateway failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Flashcard generation failed. Please try again later.";

/// Errors from flashcard generation
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The command failed validation; no call was made
    #[error("Validation error: {0}")]
    InvalidInput(#[from] ValidationErrors),

    /// The gateway call or its reply failed
    #[error("Generation failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl GenerationError {
    /// Message safe to show to end users.
    ///
    /// Validation problems are described; gateway failures collapse into one
    /// generic message while the typed error stays available via
    /// [`gateway_error`](Self::gateway_error).
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(errors) => {
                let mut messages: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| match &e.message {
                            Some(message) => message.to_string(),
                            None => format!("{field} is invalid"),
                        })
                    })
                    .collect();
                messages.sort();
                messages.join("; ")
            }
            Self::Gateway(_) => GENERATION_FAILED_MESSAGE.to_string(),
        }
    }

    /// The underlying gateway error, if any.
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            Self::InvalidInput(_) => None,
        }
    }

    /// Whether the caller sent bad input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
