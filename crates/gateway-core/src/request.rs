//! Request types for the gateway.
//!
//! This module defines the chat messages callers build and the
//! OpenAI-compatible payload sent to the chat-completions endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Chat request payload sent to `{base_url}/chat/completions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Target model (e.g., "openai/gpt-4o-mini")
    pub model: String,

    /// Chat messages for the conversation, in order
    pub messages: Vec<ChatMessage>,

    /// Structured output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request for the given model and messages
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            response_format: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the response format
    #[must_use]
    pub fn with_response_format(mut self, format: Option<ResponseFormat>) -> Self {
        self.response_format = format;
        self
    }

    /// Set the temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max_tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Chat message with role and content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: MessageRole,

    /// Text content of the message
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Providers send `"content": null` for replies without text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Response format configuration
///
/// Serializes to the OpenAI wire shape, e.g.
/// `{"type": "json_schema", "json_schema": {"name": ..., "schema": {...}, "strict": true}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text, no structured output expected
    Text,
    /// Answer must be JSON conforming to a schema
    JsonSchema {
        /// Schema the answer must satisfy
        json_schema: JsonSchemaFormat,
    },
}

impl ResponseFormat {
    /// Create a JSON-schema response format
    #[must_use]
    pub fn json_schema(format: JsonSchemaFormat) -> Self {
        Self::JsonSchema {
            json_schema: format,
        }
    }

    /// Get the schema if this is a JSON-schema format
    #[must_use]
    pub fn as_json_schema(&self) -> Option<&JsonSchemaFormat> {
        match self {
            Self::JsonSchema { json_schema } => Some(json_schema),
            Self::Text => None,
        }
    }
}

/// Named JSON-schema describing the expected answer shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    /// Schema name reported to the provider
    pub name: String,

    /// JSON-Schema document, treated as opaque
    #[serde(rename = "schema")]
    pub definition: serde_json::Value,

    /// Ask the provider for strict schema adherence
    #[serde(default)]
    pub strict: bool,

    /// Human-readable description of the schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JsonSchemaFormat {
    /// Create a strict schema format
    #[must_use]
    pub fn new(name: impl Into<String>, definition: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            definition,
            strict: true,
            description: None,
        }
    }

    /// Set strict mode
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
