mod admin;
mod diagnose;

use clap::{Parser, Subcommand};
use cropsage_core::{Language, NEARBY_RADIUS};
use tracing_subscriber::EnvFilter;

use crate::admin::{AdminCommands, StoreFields};

#[derive(Debug, Parser)]
#[command(name = "cropsage")]
#[command(about = "Multilingual crop diagnosis: describe the symptoms, get remedies and nearby stores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diagnose a crop problem from a symptom description
    Diagnose {
        /// Symptom description in the chosen language
        query: Vec<String>,
        /// Query language: en, hi or mr (defaults to `CROPSAGE_DEFAULT_LANG`)
        #[arg(long)]
        lang: Option<Language>,
        /// Take the query from voice input instead
        #[arg(long)]
        listen: bool,
        /// Do not read the result aloud
        #[arg(long)]
        no_speak: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List agricultural stores near the current position
    Stores {
        /// Search radius in kilometres
        #[arg(long, default_value_t = NEARBY_RADIUS)]
        radius: f64,
        /// Print the stores as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest a new store to the public directory
    AddStore {
        #[command(flatten)]
        fields: StoreFields,
    },
    /// Listen once and print the recognized text
    Listen {
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Read text aloud
    Speak {
        text: String,
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Manage problems and stores (requires an admin login)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    // stdout carries results only.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cropsage_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    tracing::debug!(?config, "configuration loaded");

    let default_lang = config.default_language;
    match cli.command {
        Commands::Diagnose {
            query,
            lang,
            listen,
            no_speak,
            json,
        } => {
            let options = diagnose::DiagnoseOptions {
                language: lang.unwrap_or(default_lang),
                listen,
                speak: !no_speak,
                json,
            };
            diagnose::run_diagnose(&config, &query.join(" "), &options).await
        }
        Commands::Stores { radius, json } => diagnose::run_stores(&config, radius, json).await,
        Commands::AddStore { fields } => diagnose::run_add_store(&config, fields).await,
        Commands::Listen { lang } => {
            diagnose::run_listen(&config, lang.unwrap_or(default_lang)).await
        }
        Commands::Speak { text, lang } => {
            diagnose::run_speak(&config, &text, lang.unwrap_or(default_lang)).await
        }
        Commands::Admin { command } => admin::run_admin(&config, command).await,
    }
}

#[cfg(test)]
mod tests;
