//! Config loader — reads `~/.cineprompt/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.cineprompt/config.json`
//! 3. Environment variables `CINEPROMPT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, DEFAULT_GENERATE_TIMEOUT_SECS, DEFAULT_PROBE_TIMEOUT_SECS};

const ENV_PREFIX: &str = "CINEPROMPT_";

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path (or `path`) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path), std::env::vars())
}

/// Load config from a file only, without env overrides. Use this before
/// `save_config` so env-provided secrets are not written to disk.
pub fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => reject_zero_timeouts(config),
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `CINEPROMPT_PROVIDER` → `provider`
/// - `CINEPROMPT_PROVIDERS__<ID>__API_KEY` → `providers.<id>.api_key`
/// - `CINEPROMPT_PROVIDERS__<ID>__MODEL` → `providers.<id>.model`
/// - `CINEPROMPT_PROVIDERS__<ID>__API_BASE` → `providers.<id>.api_base`
/// - `CINEPROMPT_GENERATION__PROBE_TIMEOUT_SECS` → `generation.probe_timeout_secs`
/// - `CINEPROMPT_GENERATION__GENERATE_TIMEOUT_SECS` → `generation.generate_timeout_secs`
///
/// Provider ids are matched lowercased.
fn apply_env_overrides<I>(mut config: Config, vars: I) -> Config
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, val) in vars {
        let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };

        match rest {
            "PROVIDER" => config.provider = val.to_lowercase(),
            "GENERATION__PROBE_TIMEOUT_SECS" => match val.parse::<u64>() {
                Ok(n) if n > 0 => config.generation.probe_timeout_secs = n,
                _ => warn!(var = %key, value = %val, "ignoring timeout override, expected seconds > 0"),
            },
            "GENERATION__GENERATE_TIMEOUT_SECS" => match val.parse::<u64>() {
                Ok(n) if n > 0 => config.generation.generate_timeout_secs = n,
                _ => warn!(var = %key, value = %val, "ignoring timeout override, expected seconds > 0"),
            },
            _ => {
                if let Some(provider_var) = rest.strip_prefix("PROVIDERS__") {
                    apply_provider_env(&mut config, provider_var, val);
                }
            }
        }
    }

    config
}

/// A zero timeout would fail every call at once; reset it to the default.
fn reject_zero_timeouts(mut config: Config) -> Config {
    if config.generation.probe_timeout_secs == 0 {
        warn!("probeTimeoutSecs is 0, using {DEFAULT_PROBE_TIMEOUT_SECS}");
        config.generation.probe_timeout_secs = DEFAULT_PROBE_TIMEOUT_SECS;
    }
    if config.generation.generate_timeout_secs == 0 {
        warn!("generateTimeoutSecs is 0, using {DEFAULT_GENERATE_TIMEOUT_SECS}");
        config.generation.generate_timeout_secs = DEFAULT_GENERATE_TIMEOUT_SECS;
    }
    config
}

/// Apply a single `<ID>__<FIELD>` provider override.
fn apply_provider_env(config: &mut Config, provider_var: &str, val: String) {
    let Some((id, field)) = provider_var.split_once("__") else {
        return;
    };
    let id = id.to_lowercase();

    match field {
        "API_KEY" => config.provider_settings_mut(&id).api_key = val,
        "MODEL" => config.provider_settings_mut(&id).model = Some(val),
        "API_BASE" => config.provider_settings_mut(&id).api_base = Some(val),
        other => debug!(provider = %id, field = other, "ignoring unknown provider env var"),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
