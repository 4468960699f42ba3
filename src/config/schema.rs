//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the request relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Upstream origin the relay forwards to.
    pub upstream: UpstreamConfig,

    /// Inbound path rewriting rules.
    pub rewrite: RewriteConfig,

    /// Cross-origin response policy.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for upstream calls.
    pub retries: RetryConfig,

    /// Pre-call upstream health probe.
    pub health_probe: HealthProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Upstream origin configuration.
///
/// The effective base URL depends on the deployment environment: production
/// uses `base_url`, development uses `development_base_url`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Production upstream origin (absolute URL, no trailing slash).
    pub base_url: String,

    /// Development upstream origin.
    pub development_base_url: String,

    /// Deployment environment: "production" or "development".
    pub environment: String,
}

impl UpstreamConfig {
    /// Resolve the effective upstream base URL for this environment.
    pub fn resolved_base_url(&self) -> &str {
        if self.environment == "development" {
            &self.development_base_url
        } else {
            &self.base_url
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sproj-backend.onrender.com".to_string(),
            development_base_url: "http://localhost:8000".to_string(),
            environment: "production".to_string(),
        }
    }
}

/// Path rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Recognized path prefixes, stripped once per request.
    /// Longest match wins regardless of order here.
    pub prefixes: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![
                "/.netlify/functions/relay/api/".to_string(),
                "/.netlify/functions/relay/".to_string(),
                "/api/".to_string(),
            ],
        }
    }
}

/// Cross-origin response policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value for Access-Control-Allow-Origin ("*" or a specific origin).
    pub allowed_origin: String,

    /// Preflight cache lifetime in seconds (Access-Control-Max-Age).
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-attempt upstream call timeout in seconds.
    pub attempt_secs: u64,

    /// Total inbound request timeout in seconds. Must cover all retry
    /// attempts plus backoff, so it is larger than attempt_secs * attempts.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            attempt_secs: 10,
            request_secs: 60,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries for transient upstream failures.
    pub enabled: bool,

    /// Maximum number of upstream attempts per inbound request.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
        }
    }
}

/// Pre-call health probe configuration.
///
/// When enabled, a HEAD request probes the upstream before each main call;
/// a failed probe short-circuits with 503 instead of waiting out the full
/// retry loop against a cold-starting upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthProbeConfig {
    /// Enable the pre-call probe.
    pub enabled: bool,

    /// Path to probe on the upstream origin.
    pub path: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthProbeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "/".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
