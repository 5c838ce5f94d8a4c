//! Generate command - turn source text into flashcard proposals.

use anyhow::{bail, Result};
use clap::Args;
use gateway_generation::{FlashcardGenerator, GenerateFlashcards, Generation, SUPPORTED_MODEL};
use gateway_sdk::{CancellationToken, Client};
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

/// Arguments for the generate command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// File with the source text (reads stdin if omitted)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Model to generate with
    #[arg(short = 'M', long, default_value = SUPPORTED_MODEL)]
    pub model: String,
}

/// Execute the generate command.
pub async fn execute(
    args: GenerateArgs,
    client: Client,
    cancel: CancellationToken,
    json: bool,
) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);
    let text = super::read_input(args.file.as_deref()).await?;

    let command = GenerateFlashcards::new(text).with_model(args.model);
    let generator = FlashcardGenerator::new(client);

    let generation = match generator.generate(&command, Some(cancel)).await {
        Ok(generation) => generation,
        Err(err) => bail!(err.user_message()),
    };

    match format {
        OutputFormat::Json => output::json(&generation),
        OutputFormat::Text => {
            print_generation(&generation);
            Ok(())
        }
    }
}

fn print_generation(generation: &Generation) {
    output::success(&format!(
        "Generated {} flashcards in {}ms",
        generation.generated_count, generation.generation_time_ms
    ));

    for (i, card) in generation.flashcards.iter().enumerate() {
        output::section(&format!("Card {}", i + 1));
        output::key_value("Front", &card.front);
        output::key_value("Back", &card.back);
    }

    output::section("Generation");
    output::key_value("Model", &generation.model);
    output::key_value("Input length", &generation.input_length.to_string());
    output::key_value("Hash", &generation.hash);
}
