//! Response types for the gateway.

use crate::request::ChatMessage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Raw chat-completion reply from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Provider-assigned completion ID
    #[serde(default)]
    pub id: String,

    /// Unix timestamp of when the completion was created
    #[serde(default)]
    pub created: i64,

    /// Model that produced the completion
    #[serde(default)]
    pub model: String,

    /// Completion choices, in provider order
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatReply {
    /// Get the first choice
    #[must_use]
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,

    /// The generated message
    pub message: ChatMessage,

    /// Reason the model stopped generating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: u32,
}

/// Reply after parsing and schema validation
///
/// `json` is only populated when a JSON-schema response format was requested
/// and the answer validated against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    /// Raw provider reply
    pub raw: ChatReply,
    /// Message of the first choice
    pub message: ChatMessage,
    /// Text content of the first choice
    pub content: String,
    /// Validated JSON answer
    pub json: Option<serde_json::Value>,
}

impl ParsedReply {
    /// Deserialize the validated JSON answer into a caller type
    ///
    /// Returns `None` when no JSON answer was requested.
    pub fn json_as<T: DeserializeOwned>(&self) -> Option<serde_json::Result<T>> {
        self.json.clone().map(serde_json::from_value)
    }

    /// Total tokens reported by the provider
    #[must_use]
    pub fn total_tokens(&self) -> Option<u32> {
        self.raw.usage.map(|u| u.total_tokens)
    }

    /// Finish reason of the first choice
    #[must_use]
    pub fn finish_reason(&self) -> Option<&str> {
        self.raw
            .first_choice()
            .and_then(|c| c.finish_reason.as_deref())
    }
}
