//! # Flashcard Gateway
//!
//! Command-line front end for the flashcard LLM gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Generate flashcard proposals from a file
//! OPENROUTER_API_KEY=sk-or-... flashcard-gateway generate --file notes.txt
//!
//! # Or from stdin, as JSON
//! cat notes.txt | flashcard-gateway --json generate
//!
//! # Send a raw chat call, optionally validated against a schema
//! flashcard-gateway chat --message "Name three primes" --schema primes.json
//! ```

use anyhow::Result;
use clap::Parser;
use gateway_telemetry::{init_logging, LoggingConfig};

mod cli;
mod commands;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&LoggingConfig::from_verbosity(cli.verbose).with_json(cli.json))?;

    cli.execute().await
}
