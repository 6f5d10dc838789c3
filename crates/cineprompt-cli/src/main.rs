//! CinePrompt CLI — entry point.
//!
//! # Commands
//!
//! - `cineprompt providers` — list supported providers and models
//! - `cineprompt status` — show configuration and key status
//! - `cineprompt configure` — select a provider, store key and model
//! - `cineprompt test` — check that the key and model work
//! - `cineprompt prompt --story FILE` — print the compiled prompt
//! - `cineprompt generate --story FILE` — turn a story into a shot list

mod configure;
mod generate;
mod helpers;
mod inputs;
mod providers_cmd;
mod status;
mod target;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::generate::OutputFormat;
use crate::inputs::InputArgs;
use crate::target::TargetArgs;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🎬 CinePrompt — turn a story into a shot list of image-generation prompts
#[derive(Parser)]
#[command(name = "cineprompt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported providers and their models
    Providers,

    /// Show configuration and provider key status
    Status,

    /// Select a provider and store its API key and model
    Configure(configure::ConfigureArgs),

    /// Check that the selected provider accepts the key and model
    Test {
        #[command(flatten)]
        target: TargetArgs,

        /// Enable debug logging and show raw provider responses
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Print the compiled prompt without calling a provider
    Prompt {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Generate a shot list from a story
    Generate {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        target: TargetArgs,

        /// Write the result to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Also save the text report as cineprompt-shots-<millis>.txt
        #[arg(long, default_value_t = false)]
        export: bool,

        /// Enable debug logging and show raw provider responses
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Providers => providers_cmd::run(),
        Commands::Status => status::run(),
        Commands::Configure(args) => configure::run(args),
        Commands::Test { target, logs } => {
            init_logging(logs);
            generate::run_test(&target, logs).await
        }
        Commands::Prompt { input } => generate::run_prompt(&input),
        Commands::Generate {
            input,
            target,
            output,
            format,
            export,
            logs,
        } => {
            init_logging(logs);
            generate::run_generate(&input, &target, output, format, export, logs).await
        }
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("cineprompt=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
