// SPDX-FileCopyrightText: 2026 MindMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MindMate - a sentiment-aware mental-health companion.
//!
//! This is the binary entry point for the `mindmate` CLI.

mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use mindmate_config::MindmateConfig;
use mindmate_core::MindmateError;
use mindmate_credential::{mask_secret, CredentialStore, OPENAI_API_KEY};
use mindmate_sentiment::SentimentClassifier;

/// MindMate - a sentiment-aware mental-health companion.
#[derive(Parser, Debug)]
#[command(name = "mindmate", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat (the default).
    Chat,
    /// Print the sentiment tag of a piece of text.
    Classify {
        /// Text to classify.
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Store the chat-completion API key in the local credential file.
    SetKey {
        /// The API key.
        value: String,
    },
    /// Remove the stored API key.
    ClearKey,
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => mindmate_config::load_and_validate_path(path),
        None => mindmate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            mindmate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.companion.log_level);

    if let Err(e) = run(cli.command.unwrap_or(Commands::Chat), config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: MindmateConfig) -> Result<(), MindmateError> {
    match command {
        Commands::Chat => {
            let store = open_store(&config)?;
            shell::run_chat(config, store).await
        }
        Commands::Classify { text } => {
            let sentiment = SentimentClassifier::new().classify(&text.join(" "));
            println!("{sentiment}");
            Ok(())
        }
        Commands::SetKey { value } => {
            let mut store = open_store(&config)?;
            let credential = store.set(OPENAI_API_KEY, &value)?;
            println!(
                "stored {} in {}",
                mask_secret(credential.expose()),
                store.path().display()
            );
            Ok(())
        }
        Commands::ClearKey => {
            let mut store = open_store(&config)?;
            if store.remove(OPENAI_API_KEY)? {
                println!("API key removed from {}", store.path().display());
            } else {
                println!("no API key stored");
            }
            Ok(())
        }
        Commands::Config => {
            println!("{}", render_config(&config)?);
            Ok(())
        }
    }
}

fn open_store(config: &MindmateConfig) -> Result<CredentialStore, MindmateError> {
    CredentialStore::open(config.credential.resolved_store_path())
}

/// Serializes the effective configuration with the API key masked.
fn render_config(config: &MindmateConfig) -> Result<String, MindmateError> {
    let mut shown = config.clone();
    if let Some(key) = shown.openai.api_key.as_deref() {
        shown.openai.api_key = Some(mask_secret(key));
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| MindmateError::Internal(format!("failed to render config: {e}")))
}

/// Installs the stderr tracing subscriber so the transcript on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mindmate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
