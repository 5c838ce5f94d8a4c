//! Chat command - send a single chat completion request.

use anyhow::{Context, Result};
use clap::Args;
use gateway_core::{ChatMessage, JsonSchemaFormat, ParsedReply, ResponseFormat};
use gateway_sdk::{CancellationToken, Client, SendChatOptions};
use serde::Serialize;
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send (if not provided, reads from stdin)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Model to use (defaults to OPENROUTER_DEFAULT_MODEL)
    #[arg(short = 'M', long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 to 2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// JSON schema file the reply must satisfy
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Name to register the schema under
    #[arg(long, default_value = "response")]
    pub schema_name: String,
}

/// Chat response for output.
#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub model: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

impl From<ParsedReply> for ChatOutput {
    fn from(reply: ParsedReply) -> Self {
        Self {
            finish_reason: reply.finish_reason().map(String::from),
            total_tokens: reply.total_tokens(),
            model: reply.raw.model,
            content: reply.content,
            json: reply.json,
        }
    }
}

/// Execute the chat command.
pub async fn execute(
    args: ChatArgs,
    client: Client,
    cancel: CancellationToken,
    json: bool,
) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);

    let message = match args.message {
        Some(message) => message,
        None => super::read_input(None).await?.trim().to_string(),
    };

    let mut messages = Vec::new();
    if let Some(system) = args.system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(message));

    let mut options = SendChatOptions::new().cancel_token(cancel);
    if let Some(model) = args.model {
        options = options.model(model);
    }
    if let Some(temperature) = args.temperature {
        options = options.temperature(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        options = options.max_tokens(max_tokens);
    }
    if let Some(path) = &args.schema {
        let schema = load_schema(path).await?;
        options = options.response_format(ResponseFormat::json_schema(JsonSchemaFormat::new(
            args.schema_name,
            schema,
        )));
    }

    let reply = client.send_chat(messages, options).await?;
    let output = ChatOutput::from(reply);

    match format {
        OutputFormat::Json => output::json(&output),
        OutputFormat::Text => {
            match &output.json {
                Some(value) => output::json(value)?,
                None => println!("{}", output.content),
            }
            if let Some(tokens) = output.total_tokens {
                output::info(&format!("{} · {tokens} tokens", output.model));
            }
            Ok(())
        }
    }
}

async fn load_schema(path: &std::path::Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Schema {} is not valid JSON", path.display()))
}
