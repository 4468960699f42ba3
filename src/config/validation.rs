//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream base URLs are absolute http(s) URLs
//! - Validate value ranges (timeouts > 0, attempts >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the error refers to, dotted path form.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_absolute_http_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: field.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: field.to_string(),
            message: format!("not an absolute URL: {}", e),
        }),
    }
}

/// Validate a loaded configuration, collecting every error found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("invalid socket address '{}'", config.listener.bind_address),
        });
    }

    check_absolute_http_url("upstream.base_url", &config.upstream.base_url, &mut errors);
    check_absolute_http_url(
        "upstream.development_base_url",
        &config.upstream.development_base_url,
        &mut errors,
    );

    if config.upstream.environment != "production" && config.upstream.environment != "development" {
        errors.push(ValidationError {
            field: "upstream.environment".to_string(),
            message: format!(
                "expected 'production' or 'development', got '{}'",
                config.upstream.environment
            ),
        });
    }

    for prefix in &config.rewrite.prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError {
                field: "rewrite.prefixes".to_string(),
                message: format!("prefix '{}' must start with '/'", prefix),
            });
        }
    }

    if config.cors.allowed_origin.is_empty() {
        errors.push(ValidationError {
            field: "cors.allowed_origin".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError {
            field: "retries.max_attempts".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    if config.timeouts.attempt_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.attempt_secs".to_string(),
            message: "must be greater than 0".to_string(),
        });
    }

    if config.health_probe.enabled && config.health_probe.timeout_secs == 0 {
        errors.push(ValidationError {
            field: "health_probe.timeout_secs".to_string(),
            message: "must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RelayConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_relative_upstream_url_rejected() {
        let mut config = RelayConfig::default();
        config.upstream.base_url = "sproj-backend.onrender.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "upstream.base_url"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = RelayConfig::default();
        config.retries.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "retries.max_attempts"));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.retries.max_attempts = 0;
        config.upstream.environment = "staging".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
