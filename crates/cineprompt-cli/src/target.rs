//! Which provider, model and key a command talks to.
//!
//! Flags win over the config file (which already has env overrides applied).

use anyhow::{anyhow, Result};
use clap::Args;

use cineprompt_core::config::Config;
use cineprompt_core::error::GenerationError;
use cineprompt_providers::registry::{self, ProviderDescriptor};
use cineprompt_providers::{AdapterRegistry, RequestSpec};

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Provider id (see `cineprompt providers`)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model id (defaults to the configured or the provider's default model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (overrides the configured key)
    #[arg(short = 'k', long = "api-key")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Target {
    pub provider: &'static ProviderDescriptor,
    pub model: String,
    pub api_key: String,
    pub api_base: Option<String>,
}

impl Target {
    pub fn resolve(config: &Config, args: &TargetArgs) -> Result<Self> {
        let id = args
            .provider
            .as_deref()
            .unwrap_or(config.provider.as_str())
            .trim()
            .to_lowercase();
        let provider = registry::find_by_id(&id).ok_or_else(|| {
            anyhow!("unknown provider '{id}'; run `cineprompt providers` to list them")
        })?;

        let settings = config.provider_settings(provider.id);
        let model = provider.resolve_model(
            args.model
                .as_deref()
                .or_else(|| settings.and_then(|s| s.model.as_deref())),
        );
        let api_key = args
            .api_key
            .clone()
            .or_else(|| settings.map(|s| s.api_key.clone()))
            .unwrap_or_default();
        let api_base = settings
            .and_then(|s| s.api_base.clone())
            .filter(|b| !b.trim().is_empty());

        Ok(Target {
            provider,
            model,
            api_key,
            api_base,
        })
    }

    pub fn request_spec(&self) -> Result<RequestSpec, GenerationError> {
        let registry = match &self.api_base {
            Some(base) => AdapterRegistry::with_defaults().with_api_base(self.provider.id, base)?,
            None => AdapterRegistry::with_defaults(),
        };
        registry.build_request_spec(self.provider.id, &self.api_key, &self.model)
    }
}
