//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{override_warnings, validate_config, ValidationError};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    for warning in override_warnings(&config) {
        tracing::warn!(field = %warning.field, "{}", warning.message);
    }
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Resolve the effective configuration.
///
/// An explicit path wins, then `GATEWAY_CONFIG`. With neither set the
/// built-in defaults are validated and used.
pub fn resolve_config(explicit: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let from_env = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading configuration file");
            load_config(&path)
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            let config = GatewayConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}
