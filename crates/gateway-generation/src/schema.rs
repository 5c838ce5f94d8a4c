//! Structured output format for flashcard proposals.

use gateway_core::{JsonSchemaFormat, ResponseFormat};
use serde_json::json;

/// Name the schema is registered under with the provider.
pub const FLASHCARD_SCHEMA_NAME: &str = "flashcards";

/// Strict JSON-schema response format: 3 to 20 cards, each with a front of
/// at most 200 characters and a back of at most 500.
pub fn flashcard_response_format() -> ResponseFormat {
    let schema = json!({
        "type": "object",
        "properties": {
            "flashcards": {
                "type": "array",
                "minItems": 3,
                "maxItems": 20,
                "items": {
                    "type": "object",
                    "properties": {
                        "front": {"type": "string", "minLength": 1, "maxLength": 200},
                        "back": {"type": "string", "minLength": 1, "maxLength": 500}
                    },
                    "required": ["front", "back"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["flashcards"],
        "additionalProperties": false
    });

    ResponseFormat::json_schema(
        JsonSchemaFormat::new(FLASHCARD_SCHEMA_NAME, schema)
            .with_strict(true)
            .with_description("Flashcard proposals generated from source text"),
    )
}
