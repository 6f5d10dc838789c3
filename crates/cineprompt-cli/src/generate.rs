//! `cineprompt prompt`, `test` and `generate`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use colored::Colorize;
use tracing::info;

use cineprompt_core::config::load_config;
use cineprompt_core::export::{default_export_filename, render_text, ExportHeader};
use cineprompt_core::prompt;
use cineprompt_core::types::{total_shots, Scene};
use cineprompt_providers::ProviderClient;

use crate::helpers;
use crate::inputs::{InputArgs, Inputs};
use crate::target::{Target, TargetArgs};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Shot list as a JSON array
    #[default]
    Json,
    /// Boxed plain-text report
    Text,
}

// ─────────────────────────────────────────────
// prompt
// ─────────────────────────────────────────────

/// Print the compiled prompt without calling any provider.
pub fn run_prompt(input: &InputArgs) -> Result<()> {
    let inputs = Inputs::load(input)?;
    let compiled = prompt::compile(&inputs.story, &inputs.characters, &inputs.references);
    println!("{compiled}");
    Ok(())
}

// ─────────────────────────────────────────────
// test
// ─────────────────────────────────────────────

/// Probe the selected provider with the configured or given key.
pub async fn run_test(target: &TargetArgs, verbose: bool) -> Result<()> {
    let config = load_config(None);
    let target = Target::resolve(&config, target)?;
    let client = ProviderClient::from_settings(&config.generation);

    helpers::print_waiting(&format!(
        "connecting to {} ({})...",
        target.provider.name, target.model
    ));
    let result = match target.request_spec() {
        Ok(spec) => client.probe(&spec).await,
        Err(e) => Err(e),
    };
    helpers::clear_waiting();

    match result {
        Ok(outcome) => {
            println!(
                "{} Connected to {} ({}) in {} ms",
                "✓".green(),
                outcome.provider_name.bold(),
                outcome.model,
                outcome.elapsed.as_millis()
            );
            Ok(())
        }
        Err(e) => {
            helpers::print_error_details(&e, verbose);
            Err(e).with_context(|| format!("connection test for {} failed", target.provider.name))
        }
    }
}

// ─────────────────────────────────────────────
// generate
// ─────────────────────────────────────────────

/// Compile, generate, then print or write the shot list.
pub async fn run_generate(
    input: &InputArgs,
    target: &TargetArgs,
    output: Option<PathBuf>,
    format: OutputFormat,
    export: bool,
    verbose: bool,
) -> Result<()> {
    let inputs = Inputs::load(input)?;
    let config = load_config(None);
    let target = Target::resolve(&config, target)?;
    let client = ProviderClient::from_settings(&config.generation);

    let compiled = prompt::compile(&inputs.story, &inputs.characters, &inputs.references);
    info!(
        provider = %target.provider.id,
        model = %target.model,
        characters = inputs.characters.len(),
        references = inputs.references.len(),
        "Starting generation"
    );

    helpers::print_waiting(&format!(
        "generating with {} ({}), Ctrl-C to cancel...",
        target.provider.name, target.model
    ));
    let result = match target.request_spec() {
        Ok(spec) => client.generate_until(&spec, &compiled, ctrl_c()).await,
        Err(e) => Err(e),
    };
    helpers::clear_waiting();

    let scenes = match result {
        Ok(scenes) => scenes,
        Err(e) => {
            helpers::print_error_details(&e, verbose);
            return Err(e).with_context(|| format!("generation with {} failed", target.provider.name));
        }
    };

    let header = ExportHeader {
        story_name: inputs.story_name.clone(),
        generated_at: Utc::now(),
        provider_name: target.provider.name.to_string(),
        model: target.model.clone(),
    };
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&scenes).context("failed to serialize shot list")?
        }
        OutputFormat::Text => render_text(&header, &inputs.characters, &scenes),
    };

    match output {
        Some(path) => {
            let path = helpers::expand_tilde(&path.to_string_lossy());
            std::fs::write(&path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            print_summary(&scenes);
            eprintln!("  {} saved to {}", "✓".green(), path.display());
        }
        None => {
            println!("{rendered}");
            print_summary(&scenes);
        }
    }

    if export {
        let path = PathBuf::from(default_export_filename(header.generated_at));
        std::fs::write(&path, render_text(&header, &inputs.characters, &scenes))
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  {} exported to {}", "✓".green(), path.display());
    }

    Ok(())
}

/// Resolves on the first Ctrl-C. If the handler cannot be installed it never
/// resolves, so the request is not cancelled spuriously.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn print_summary(scenes: &[Scene]) {
    eprintln!(
        "{} {} scenes, {} shots",
        "✓".green(),
        scenes.len(),
        total_shots(scenes)
    );
}
