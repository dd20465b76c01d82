//! PrismBreak CLI
//!
//! A command-line front end for the PrismBreak ingestion and semantic-search
//! backend: sign in, find local files, upload them and search what was
//! ingested.

mod commands;
mod config;
mod context;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::{EnvFilter, fmt};

/// PrismBreak CLI: upload documents and search them in plain language.
#[derive(Parser, Debug)]
#[command(name = "prismbreak", version, about)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "PRISMBREAK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Backend endpoint URL (overrides the config file).
    #[arg(long, env = "PRISMBREAK_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Bearer token for the backend (overrides the config file).
    #[arg(
        long,
        env = "PRISMBREAK_API_KEY",
        global = true,
        hide_env_values = true,
        value_parser = context::parse_secret
    )]
    api_key: Option<SecretString>,

    /// Account identifier (usually an email address).
    #[arg(long, env = "PRISMBREAK_IDENTIFIER", global = true)]
    identifier: Option<String>,

    /// Account password.
    #[arg(
        long,
        env = "PRISMBREAK_PASSWORD",
        global = true,
        hide_env_values = true,
        value_parser = context::parse_secret
    )]
    password: Option<SecretString>,

    /// Sign in through a federated provider instead of a password.
    #[arg(long, global = true)]
    federated: Option<String>,

    /// Project to attach uploads to (overrides the config file).
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and show the active identity.
    Whoami,
    /// Hash a password read from stdin for an `[[auth.accounts]]` entry.
    HashPassword,
    /// List photos found in the media library.
    Scan(commands::scan::ScanArgs),
    /// Describe documents as the picker would present them.
    Pick(commands::pick::PickArgs),
    /// Upload documents (and optionally photos) one at a time.
    Upload(commands::upload::UploadArgs),
    /// Search ingested content.
    Search(commands::search::SearchArgs),
    /// Show preview content for a search hit.
    Preview(commands::preview::PreviewArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Whoami => commands::account::whoami(&cli, &cli.format).await,
        Command::HashPassword => commands::account::hash_password(),
        Command::Scan(args) => commands::scan::run(&cli, args, &cli.format).await,
        Command::Pick(args) => commands::pick::run(&cli, args, &cli.format).await,
        Command::Upload(args) => commands::upload::run(&cli, args, &cli.format).await,
        Command::Search(args) => commands::search::run(&cli, args, &cli.format).await,
        Command::Preview(args) => commands::preview::run(&cli, args, &cli.format).await,
    }
}
