//! Folio CLI - wiki document pipeline.
//!
//! Provides commands for:
//! - `render`: Parse a document and render it in another syntax
//! - `translate`: Render a configured translation with parameters
//! - `syntaxes`: List the syntaxes that can be parsed and rendered

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, TranslateArgs};
use output::Output;

/// Folio - parse, render and localize wiki documents.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and render it in another syntax.
    Render(RenderArgs),
    /// Render a translation key for a locale.
    Translate(TranslateArgs),
    /// List supported input and output syntaxes.
    Syntaxes,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Render(args) => args.execute(config),
        Commands::Translate(args) => args.execute(config),
        Commands::Syntaxes => commands::syntaxes::execute(config),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
