//! Upstream HTTP caller with bounded retries.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::config::{RetryConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::is_retryable;

/// A buffered upstream response, definitive from the retry loop's view.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Terminal failure after the retry loop gave up.
#[derive(Debug, Error)]
pub enum CallError {
    /// Transport never produced a response (DNS, refused, timeout).
    #[error("upstream transport failed after {attempts} attempts: {message}")]
    Exhausted { attempts: u32, message: String },

    /// The upstream kept answering 503 (cold start / warming up).
    #[error("upstream unavailable after {attempts} attempts: {message}")]
    Unavailable { attempts: u32, message: String },
}

impl CallError {
    /// Number of upstream attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            CallError::Exhausted { attempts, .. } => *attempts,
            CallError::Unavailable { attempts, .. } => *attempts,
        }
    }

    /// Message of the last attempt's failure.
    pub fn last_error(&self) -> &str {
        match self {
            CallError::Exhausted { message, .. } => message,
            CallError::Unavailable { message, .. } => message,
        }
    }
}

/// Performs upstream calls with per-attempt timeouts and exponential
/// backoff between transient failures.
pub struct UpstreamCaller {
    client: reqwest::Client,
    retry: RetryConfig,
    attempt_timeout: Duration,
}

impl UpstreamCaller {
    /// Create a caller from the relay's timeout and retry configuration.
    pub fn new(timeouts: &TimeoutConfig, retry: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            retry,
            attempt_timeout: Duration::from_secs(timeouts.attempt_secs),
        }
    }

    fn max_attempts(&self) -> u32 {
        if self.retry.enabled {
            self.retry.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Call the upstream, retrying transient failures. Returns the first
    /// definitive reply (any status other than 503) or a terminal error
    /// once attempts are exhausted.
    pub async fn call(
        &self,
        method: Method,
        url: &str,
        headers: &HeaderMap,
        body: Bytes,
        request_id: &str,
    ) -> Result<UpstreamReply, CallError> {
        let max_attempts = self.max_attempts();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let result = self
                .client
                .request(method.clone(), url)
                .headers(headers.clone())
                .timeout(self.attempt_timeout)
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();

                    if is_retryable(Some(status), false) {
                        if attempts < max_attempts {
                            self.wait_out_backoff(attempts, request_id, "unavailable").await;
                            continue;
                        }
                        return Err(CallError::Unavailable {
                            attempts,
                            message: format!("upstream returned {}", status),
                        });
                    }

                    let content_type = response
                        .headers()
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);

                    match response.bytes().await {
                        Ok(body) => {
                            return Ok(UpstreamReply {
                                status,
                                content_type,
                                body,
                            });
                        }
                        Err(e) => {
                            // The response died mid-body; same treatment as
                            // a transport failure.
                            tracing::error!(request_id = %request_id, attempt = attempts, error = %e, "Upstream body read failed");
                            if attempts < max_attempts {
                                self.wait_out_backoff(attempts, request_id, "transport").await;
                                continue;
                            }
                            return Err(CallError::Exhausted {
                                attempts,
                                message: e.to_string(),
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(request_id = %request_id, attempt = attempts, error = %e, "Upstream request failed");

                    if is_retryable(None, true) && attempts < max_attempts {
                        self.wait_out_backoff(attempts, request_id, "transport").await;
                        continue;
                    }
                    return Err(CallError::Exhausted {
                        attempts,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    async fn wait_out_backoff(&self, attempt: u32, request_id: &str, reason: &'static str) {
        let backoff = calculate_backoff(attempt, self.retry.base_delay_ms, self.retry.max_delay_ms);
        tracing::info!(
            request_id = %request_id,
            attempt = attempt,
            delay = ?backoff,
            reason = reason,
            "Retrying upstream call"
        );
        metrics::record_retry(reason);
        tokio::time::sleep(backoff).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RetryConfig, TimeoutConfig};

    #[test]
    fn test_disabled_retries_cap_attempts_at_one() {
        let retry = RetryConfig {
            enabled: false,
            ..RetryConfig::default()
        };
        let caller = UpstreamCaller::new(&TimeoutConfig::default(), retry);
        assert_eq!(caller.max_attempts(), 1);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let retry = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        let caller = UpstreamCaller::new(&TimeoutConfig::default(), retry);
        assert_eq!(caller.max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_exhausts_attempts() {
        let retry = RetryConfig {
            max_attempts: 2,
            base_delay_ms: 10,
            max_delay_ms: 20,
            ..RetryConfig::default()
        };
        let caller = UpstreamCaller::new(&TimeoutConfig::default(), retry);
        // Reserved port with nothing listening.
        let err = caller
            .call(
                Method::GET,
                "http://127.0.0.1:9/api/products",
                &HeaderMap::new(),
                Bytes::new(),
                "test",
            )
            .await
            .unwrap_err();
        assert_eq!(err.attempts(), 2);
        assert!(matches!(err, CallError::Exhausted { .. }));
    }
}
