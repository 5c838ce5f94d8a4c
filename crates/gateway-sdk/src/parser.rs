//! Schema-validating reply parser.
//!
//! Only the first choice of a reply is considered. When a JSON-schema
//! response format was requested, its content must parse as JSON and satisfy
//! the schema before the reply reaches the caller.

use gateway_core::{
    ChatReply, GatewayError, GatewayResult, JsonSchemaFormat, ParsedReply, ResponseFormat,
    SchemaViolation,
};
use jsonschema::JSONSchema;
use serde_json::Value;

/// Turn a raw provider reply into a [`ParsedReply`].
///
/// # Errors
/// - `MalformedReply` if there are no choices, the first choice has no
///   content, or the content is not JSON when a schema was requested
/// - `SchemaViolation` if the JSON does not satisfy the schema
/// - `InvalidRequest` if the schema itself is invalid
pub fn parse_reply(
    reply: ChatReply,
    response_format: Option<&ResponseFormat>,
) -> GatewayResult<ParsedReply> {
    let Some(choice) = reply.first_choice() else {
        return Err(GatewayError::malformed_reply("Reply is missing choices"));
    };

    if choice.message.content.is_empty() {
        return Err(GatewayError::malformed_reply(
            "Reply is missing message content",
        ));
    }

    let message = choice.message.clone();
    let content = message.content.clone();

    let json = match response_format.and_then(ResponseFormat::as_json_schema) {
        Some(format) => Some(parse_and_validate(&content, format)?),
        None => None,
    };

    Ok(ParsedReply {
        raw: reply,
        message,
        content,
        json,
    })
}

/// Parse `content` as JSON and validate it against `format`.
///
/// Violations are reported in the order the validator encounters them.
///
/// # Errors
/// See [`parse_reply`]
pub fn parse_and_validate(content: &str, format: &JsonSchemaFormat) -> GatewayResult<Value> {
    let parsed: Value = serde_json::from_str(content).map_err(|e| {
        GatewayError::malformed_reply(format!("Failed to parse JSON response: {e}"))
    })?;

    let schema = JSONSchema::compile(&format.definition).map_err(|e| {
        GatewayError::invalid_request(format!("Invalid JSON schema '{}': {e}", format.name))
    })?;

    if let Err(errors) = schema.validate(&parsed) {
        let violations = errors
            .map(|e| SchemaViolation::new(e.instance_path.to_string(), e.to_string()))
            .collect();
        return Err(GatewayError::schema_violation(violations));
    }

    Ok(parsed)
}
