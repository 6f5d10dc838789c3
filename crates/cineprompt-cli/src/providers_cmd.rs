//! `cineprompt providers` — list supported providers and their models.

use anyhow::Result;
use colored::Colorize;

use cineprompt_providers::registry::PROVIDERS;

pub fn run() -> Result<()> {
    crate::helpers::print_banner("Providers");

    for provider in PROVIDERS {
        println!(
            "  {} {} {}",
            provider.name.bold(),
            format!("({})", provider.id).dimmed(),
            format!("[{}]", provider.badge).yellow()
        );
        println!("    {:<10} {}", "Key:".dimmed(), provider.api_key_url);
        println!("    {:<10} {}", "Format:".dimmed(), provider.api_key_hint);
        for (i, model) in provider.models.iter().enumerate() {
            let marker = if i == 0 { "*" } else { " " };
            println!(
                "    {} {:<42} {} {}",
                marker.green(),
                model.id,
                model.name,
                format!("— {}", model.desc).dimmed()
            );
        }
        println!();
    }

    println!("  {}", "* default model".dimmed());
    println!();
    Ok(())
}
