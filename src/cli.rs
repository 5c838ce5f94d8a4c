//! CLI argument definitions using clap.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gateway_config::GatewayConfig;
use gateway_sdk::{CancellationToken, Client};
use tracing::warn;

use crate::commands;

/// Flashcard Gateway - generate flashcards through an OpenAI-compatible LLM API
#[derive(Parser, Debug)]
#[command(name = "flashcard-gateway")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate flashcard proposals from source text
    #[command(visible_alias = "gen")]
    Generate(commands::generate::GenerateArgs),

    /// Send a chat completion request
    Chat(commands::chat::ChatArgs),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let config = GatewayConfig::from_env().context("Failed to load gateway configuration")?;
        let client = Client::new(config)?;

        let cancel = CancellationToken::new();
        spawn_ctrl_c_handler(cancel.clone());

        match self.command {
            Commands::Generate(args) => {
                commands::generate::execute(args, client, cancel, self.json).await
            }
            Commands::Chat(args) => commands::chat::execute(args, client, cancel, self.json).await,
        }
    }
}

/// Cancel `token` on the first Ctrl-C.
fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            token.cancel();
        }
    });
}
