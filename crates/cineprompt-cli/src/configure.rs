//! `cineprompt configure` — select a provider and store its key and model.
//!
//! Each provider keeps its own key and model, so switching back and forth
//! never loses a key.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cineprompt_core::config::{get_config_path, load_config_from_path, save_config, Config};
use cineprompt_providers::registry::{self, ProviderDescriptor};

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigureArgs {
    /// Provider id to select (defaults to the current one)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model id to store for the provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key to store (prompted for when omitted)
    #[arg(short = 'k', long = "api-key")]
    pub api_key: Option<String>,

    /// Custom API base URL for the provider
    #[arg(long = "api-base")]
    pub api_base: Option<String>,
}

/// Run the configure command.
pub fn run(args: ConfigureArgs) -> Result<()> {
    crate::helpers::print_banner("Configure");

    let config_path = get_config_path();
    let mut config = load_config_from_path(&config_path);

    let id = args
        .provider
        .as_deref()
        .unwrap_or(config.provider.as_str())
        .trim()
        .to_lowercase();
    let provider = registry::find_by_id(&id).ok_or_else(|| {
        anyhow!("unknown provider '{id}'; run `cineprompt providers` to list them")
    })?;

    let api_key = match args.api_key.clone() {
        Some(key) => Some(key),
        None => prompt_for_key(provider, &config)?,
    };

    apply(&mut config, provider, &args, api_key);
    save_config(&config, Some(&config_path))
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    let settings = config.provider_settings(provider.id);
    let model = provider.resolve_model(settings.and_then(|s| s.model.as_deref()));
    println!("  {} provider: {} ({})", "✓".green(), provider.name, provider.id);
    println!("  {} model: {}", "✓".green(), model);
    if settings.is_some_and(|s| s.is_configured()) {
        println!("  {} API key saved", "✓".green());
    } else {
        println!("  {} no API key set", "·".dimmed());
    }
    println!("  {} config at {}", "✓".green(), config_path.display());
    println!();
    println!(
        "{}",
        "  Run `cineprompt test` to check the connection.".green()
    );
    println!();
    Ok(())
}

/// Store the selection in `config`. A `None` or blank key keeps the stored one.
fn apply(
    config: &mut Config,
    provider: &ProviderDescriptor,
    args: &ConfigureArgs,
    api_key: Option<String>,
) {
    config.provider = provider.id.to_string();
    let settings = config.provider_settings_mut(provider.id);

    if let Some(key) = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        settings.api_key = key;
    }
    if let Some(model) = args.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        if provider.find_model(model).is_none() {
            println!(
                "  {} '{}' is not in the {} catalog; using it as given",
                "!".yellow(),
                model,
                provider.name
            );
        }
        settings.model = Some(model.to_string());
    }
    if let Some(base) = args.api_base.as_deref().map(str::trim) {
        settings.api_base = (!base.is_empty()).then(|| base.to_string());
    }
}

/// Ask for the key interactively. Returns `None` when the user just presses
/// Enter or aborts.
fn prompt_for_key(provider: &ProviderDescriptor, config: &Config) -> Result<Option<String>> {
    let has_key = config
        .provider_settings(provider.id)
        .is_some_and(|s| s.is_configured());

    println!("  Get a key at {}", provider.api_key_url.cyan());
    if has_key {
        println!("  {}", "(press Enter to keep the current key)".dimmed());
    }

    let mut editor = DefaultEditor::new().context("failed to open the terminal")?;
    let prompt = format!("  {} API key ({}): ", provider.name, provider.api_key_hint);
    match editor.readline(&prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e).context("failed to read the API key"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str) -> &'static ProviderDescriptor {
        registry::find_by_id(id).unwrap()
    }

    #[test]
    fn apply_sets_provider_and_key() {
        let mut config = Config::default();
        let args = ConfigureArgs {
            model: Some("gpt-4o".into()),
            ..ConfigureArgs::default()
        };
        apply(&mut config, provider("openai"), &args, Some("  sk-new  ".into()));

        assert_eq!(config.provider, "openai");
        let s = config.provider_settings("openai").unwrap();
        assert_eq!(s.api_key, "sk-new");
        assert_eq!(s.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn apply_blank_key_keeps_existing() {
        let mut config = Config::default();
        config.provider_settings_mut("groq").api_key = "gsk-old".into();
        apply(&mut config, provider("groq"), &ConfigureArgs::default(), Some("   ".into()));
        assert_eq!(config.provider_settings("groq").unwrap().api_key, "gsk-old");
    }

    #[test]
    fn apply_keeps_other_providers() {
        let mut config = Config::default();
        config.provider_settings_mut("gemini").api_key = "AIza-keep".into();
        apply(&mut config, provider("anthropic"), &ConfigureArgs::default(), Some("sk-ant".into()));
        assert_eq!(config.provider_settings("gemini").unwrap().api_key, "AIza-keep");
        assert_eq!(config.provider, "anthropic");
    }

    #[test]
    fn apply_api_base_set_and_clear() {
        let mut config = Config::default();
        let mut args = ConfigureArgs {
            api_base: Some("http://localhost:8080/v1".into()),
            ..ConfigureArgs::default()
        };
        apply(&mut config, provider("openai"), &args, None);
        assert_eq!(
            config.provider_settings("openai").unwrap().api_base.as_deref(),
            Some("http://localhost:8080/v1")
        );

        args.api_base = Some(String::new());
        apply(&mut config, provider("openai"), &args, None);
        assert!(config.provider_settings("openai").unwrap().api_base.is_none());
    }
}
