//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the upstream base URL.
pub const ENV_UPSTREAM_URL: &str = "RELAY_UPSTREAM_URL";
/// Environment variable selecting development vs production resolution.
pub const ENV_ENVIRONMENT: &str = "RELAY_ENV";
/// Environment variable overriding the CORS allowed origin.
pub const ENV_FRONTEND_ORIGIN: &str = "RELAY_FRONTEND_ORIGIN";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: defaults, then optional TOML file, then environment
/// overrides, then semantic validation.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment variable overrides on top of the loaded config.
/// Precedence: environment > file > defaults.
fn apply_env_overrides(config: &mut RelayConfig) {
    if let Ok(url) = std::env::var(ENV_UPSTREAM_URL) {
        if !url.is_empty() {
            config.upstream.base_url = url;
        }
    }
    if let Ok(env) = std::env::var(ENV_ENVIRONMENT) {
        if !env.is_empty() {
            config.upstream.environment = env;
        }
    }
    if let Ok(origin) = std::env::var(ENV_FRONTEND_ORIGIN) {
        if !origin.is_empty() {
            config.cors.allowed_origin = origin;
        }
    }
}
