//! Configuration loading from disk and the environment.
//!
//! Precedence, lowest to highest: built-in defaults, TOML file, environment
//! variables. The environment contract matches the legacy deployment
//! (`ZONEFILE`, `PORT`, ...), so existing container setups keep working.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML (or has wrong field types).
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but failed semantic validation.
    #[error("invalid configuration: {}", format_violations(.0))]
    Validation(Vec<ValidationError>),
}

fn format_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment-variable overrides on top of a loaded configuration.
///
/// Recognized variables:
/// - `ZONEFILE` — zone output path
/// - `PORT` — listen address; accepts `host:port`, `:port`, or a bare port
/// - `DEFAULT_SERVICE_PORT` — fallback registrant port
/// - `ERROR_THRESHOLD` — consecutive failures before eviction
/// - `RECONCILE_INTERVAL_MS` — reconciliation interval
///
/// Unparsable values are logged and ignored rather than failing startup.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(path) = env::var("ZONEFILE") {
        config.zone.output_path = path;
    }
    if let Ok(port) = env::var("PORT") {
        config.listener.bind_address = normalize_listen_addr(&port);
    }
    if let Ok(raw) = env::var("DEFAULT_SERVICE_PORT") {
        match raw.parse() {
            Ok(port) => config.registry.default_service_port = port,
            Err(_) => tracing::warn!(value = %raw, "ignoring unparsable DEFAULT_SERVICE_PORT"),
        }
    }
    if let Ok(raw) = env::var("ERROR_THRESHOLD") {
        match raw.parse() {
            Ok(threshold) => config.registry.error_threshold = threshold,
            Err(_) => tracing::warn!(value = %raw, "ignoring unparsable ERROR_THRESHOLD"),
        }
    }
    if let Ok(raw) = env::var("RECONCILE_INTERVAL_MS") {
        match raw.parse() {
            Ok(interval) => config.health_check.interval_ms = interval,
            Err(_) => tracing::warn!(value = %raw, "ignoring unparsable RECONCILE_INTERVAL_MS"),
        }
    }
}

/// Accept the legacy `PORT` spellings: `":3353"`, `"3353"`, or a full
/// socket address.
fn normalize_listen_addr(value: &str) -> String {
    if let Some(port) = value.strip_prefix(':') {
        return format!("0.0.0.0:{port}");
    }
    if value.parse::<u16>().is_ok() {
        return format!("0.0.0.0:{value}");
    }
    value.to_string()
}
