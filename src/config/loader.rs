//! Configuration loading and layered merge.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::OrchestratorConfig;
use crate::config::validation::{validate_config, ValidationIssue};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "STATEWATCH_";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The override file exists but could not be read.
    #[error("unreadable config file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    /// The override file is not well-formed TOML.
    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override carries a value of the wrong type.
    #[error("invalid environment override {key}={value}: {reason}")]
    InvalidOverride {
        key: String,
        value: String,
        reason: String,
    },

    /// The merged configuration failed semantic validation.
    #[error("configuration validation failed: {}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// The configuration could not be re-encoded as TOML.
    #[error("failed to encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the configuration by merging, in precedence order, environment
/// overrides over the optional TOML override file over the given defaults.
///
/// Pure over its inputs: the process environment is passed in as a map so
/// callers (and tests) control exactly what is visible.
pub fn load(
    defaults: OrchestratorConfig,
    override_path: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<OrchestratorConfig, ConfigError> {
    let mut merged = toml::Value::try_from(&defaults)?;

    if let Some(path) = override_path {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let overlay: toml::Value = toml::from_str(&content)?;
                merge_values(&mut merged, overlay);
            }
            // Absence is not an error; only an unreadable present file is.
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::Unreadable {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        }
    }

    let mut config: OrchestratorConfig = merged.try_into()?;
    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Collect the STATEWATCH_* variables from the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Deep-merge `overlay` into `base`. Tables merge key-wise; everything else
/// (including arrays) replaces wholesale.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match overlay {
        toml::Value::Table(overlay_table) => {
            if let toml::Value::Table(base_table) = base {
                for (key, value) in overlay_table {
                    match base_table.get_mut(&key) {
                        Some(existing) => merge_values(existing, value),
                        None => {
                            base_table.insert(key, value);
                        }
                    }
                }
            } else {
                *base = toml::Value::Table(overlay_table);
            }
        }
        other => *base = other,
    }
}

fn apply_env_overrides(
    config: &mut OrchestratorConfig,
    env: &HashMap<String, String>,
) -> Result<(), ConfigError> {
    if let Some(value) = env.get("STATEWATCH_BIND_ADDRESS") {
        config.server.bind_address = value.clone();
    }
    if let Some(value) = env.get("STATEWATCH_LOG_LEVEL") {
        config.logging.level = value.clone();
    }
    override_u64(env, "STATEWATCH_REQUEST_TIMEOUT_SECS", &mut config.server.request_timeout_secs)?;
    override_u64(env, "STATEWATCH_DEBOUNCE_MS", &mut config.watchdog.debounce_ms)?;
    override_u64(env, "STATEWATCH_SHUTDOWN_GRACE_SECS", &mut config.shutdown.grace_secs)?;
    Ok(())
}

fn override_u64(
    env: &HashMap<String, String>,
    key: &str,
    slot: &mut u64,
) -> Result<(), ConfigError> {
    if let Some(raw) = env.get(key) {
        *slot = raw
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidOverride {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}
