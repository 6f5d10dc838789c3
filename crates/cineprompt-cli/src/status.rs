//! `cineprompt status` — show configuration and provider key status.

use anyhow::Result;
use colored::Colorize;

use cineprompt_core::config::{get_config_path, load_config};
use cineprompt_providers::registry::{self, PROVIDERS};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    crate::helpers::print_banner("Status");

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Selected provider + model
    match registry::find_by_id(&config.provider) {
        Some(provider) => {
            let model = provider.resolve_model(
                config
                    .provider_settings(provider.id)
                    .and_then(|s| s.model.as_deref()),
            );
            println!("  {:<18} {} ({})", "Provider:".bold(), provider.name, provider.id);
            println!("  {:<18} {}", "Model:".bold(), model);
        }
        None => println!(
            "  {:<18} {} {}",
            "Provider:".bold(),
            config.provider,
            "(unknown)".red()
        ),
    }

    println!(
        "  {:<18} {}",
        "Timeouts:".bold(),
        format!(
            "probe {}s | generate {}s",
            config.generation.probe_timeout_secs, config.generation.generate_timeout_secs
        )
        .dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for provider in PROVIDERS {
        let settings = config.provider_settings(provider.id);
        let status = match settings {
            Some(s) if s.is_configured() => format!("{} (key set)", "✓".green()),
            _ => format!("{}", "· not configured".dimmed()),
        };
        let selected = if provider.id == config.provider { "→" } else { " " };
        let base = settings
            .and_then(|s| s.api_base.as_deref())
            .map(|b| format!(" {}", format!("via {b}").dimmed()))
            .unwrap_or_default();
        println!("  {} {:<20} {}{}", selected.cyan(), provider.name, status, base);
    }

    println!();
    Ok(())
}
