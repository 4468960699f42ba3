//! Pre-call upstream health probe.
//!
//! # Responsibilities
//! - Issue a cheap HEAD to the upstream before the main call
//! - Short-circuit cold-start failures with a fast, clear 503
//!
//! # Design Decisions
//! - One extra round trip buys faster failure reporting than waiting out
//!   the full retry loop against a cold upstream
//! - Non-2xx counts as a failed probe

use std::time::Duration;
use thiserror::Error;

use crate::config::HealthProbeConfig;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe request failed: {0}")]
    Transport(String),

    #[error("probe returned non-success status {0}")]
    Status(u16),
}

/// Probes the upstream origin ahead of the main call.
pub struct HealthProbe {
    client: reqwest::Client,
    config: HealthProbeConfig,
}

impl HealthProbe {
    pub fn new(config: HealthProbeConfig) -> Self {
        let client = reqwest::Client::builder().build().unwrap_or_default();
        Self { client, config }
    }

    /// HEAD the configured probe path on the upstream origin.
    pub async fn check(&self, base_url: &str) -> Result<(), ProbeError> {
        let url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            self.config.path
        );
        let timeout = Duration::from_secs(self.config.timeout_secs);

        let response = self
            .client
            .head(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::warn!(url = %url, status = %status, "Health probe failed: non-success status");
            Err(ProbeError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let probe = HealthProbe::new(HealthProbeConfig {
            enabled: true,
            path: "/".to_string(),
            timeout_secs: 1,
        });
        let err = probe.check("http://127.0.0.1:9").await.unwrap_err();
        assert!(matches!(err, ProbeError::Transport(_)));
    }
}
