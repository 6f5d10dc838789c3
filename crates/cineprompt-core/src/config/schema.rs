//! Configuration schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = 120;

/// Root configuration — loaded from `~/.cineprompt/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Selected provider id (e.g. `"gemini"`).
    pub provider: String,
    /// Per-provider settings keyed by provider id.
    pub providers: BTreeMap<String, ProviderSettings>,
    pub generation: GenerationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            providers: BTreeMap::new(),
            generation: GenerationSettings::default(),
        }
    }
}

impl Config {
    /// Settings for a provider, if any were stored.
    pub fn provider_settings(&self, id: &str) -> Option<&ProviderSettings> {
        self.providers.get(id)
    }

    /// Mutable settings for a provider, created empty on first use.
    pub fn provider_settings_mut(&mut self, id: &str) -> &mut ProviderSettings {
        self.providers.entry(id.to_string()).or_default()
    }
}

/// Stored credentials and model choice for one provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// API key for authentication.
    pub api_key: String,
    /// Selected model id. `None` means the provider's default model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderSettings {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Time bounds for network calls. Zero is not a usable bound and falls back
/// to the default.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    /// Connectivity probe bound, in seconds.
    pub probe_timeout_secs: u64,
    /// Generation call bound, in seconds.
    pub generate_timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            generate_timeout_secs: DEFAULT_GENERATE_TIMEOUT_SECS,
        }
    }
}

impl GenerationSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(non_zero_or(self.probe_timeout_secs, DEFAULT_PROBE_TIMEOUT_SECS))
    }

    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(non_zero_or(self.generate_timeout_secs, DEFAULT_GENERATE_TIMEOUT_SECS))
    }
}

fn non_zero_or(secs: u64, default: u64) -> u64 {
    if secs == 0 {
        default
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider, "gemini");
        assert!(config.providers.is_empty());
        assert_eq!(config.generation.probe_timeout_secs, 15);
        assert_eq!(config.generation.generate_timeout_secs, 120);
    }

    #[test]
    fn test_provider_settings_are_independent() {
        let mut config = Config::default();
        config.provider_settings_mut("openai").api_key = "sk-openai".to_string();
        config.provider_settings_mut("groq").model = Some("llama3-8b-8192".to_string());

        assert_eq!(config.provider_settings("openai").unwrap().api_key, "sk-openai");
        assert!(config.provider_settings("openai").unwrap().model.is_none());
        assert!(!config.provider_settings("groq").unwrap().is_configured());
        assert!(config.provider_settings("cohere").is_none());
    }

    #[test]
    fn test_whitespace_key_is_not_configured() {
        let settings = ProviderSettings {
            api_key: "   ".to_string(),
            ..Default::default()
        };
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_zero_timeouts_use_defaults() {
        let settings = GenerationSettings {
            probe_timeout_secs: 0,
            generate_timeout_secs: 0,
        };
        assert_eq!(settings.probe_timeout(), Duration::from_secs(15));
        assert_eq!(settings.generate_timeout(), Duration::from_secs(120));

        let settings = GenerationSettings {
            probe_timeout_secs: 4,
            generate_timeout_secs: 30,
        };
        assert_eq!(settings.probe_timeout(), Duration::from_secs(4));
        assert_eq!(settings.generate_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_camel_case_serialization() {
        let mut config = Config::default();
        config.provider_settings_mut("anthropic").api_key = "sk-ant".to_string();
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["providers"]["anthropic"]["apiKey"], "sk-ant");
        assert!(value["providers"]["anthropic"].get("model").is_none());
        assert_eq!(value["generation"]["probeTimeoutSecs"], 15);
    }
}
