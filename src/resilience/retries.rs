//! Retry classification.
//!
//! # Responsibilities
//! - Decide whether an upstream attempt outcome is transient
//!
//! # Design Decisions
//! - Transport failures (DNS, refused, timeout) are always transient
//! - 503 is transient: the upstream answers it while warming up from a
//!   cold start
//! - Every other status, including other 4xx/5xx, is a definitive
//!   upstream decision and must be relayed, never retried

use axum::http::StatusCode;

/// Returns true if the attempt outcome warrants another try.
pub fn is_retryable(status: Option<StatusCode>, transport_error: bool) -> bool {
    transport_error || status == Some(StatusCode::SERVICE_UNAVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_retryable() {
        assert!(is_retryable(None, true));
    }

    #[test]
    fn test_503_retryable() {
        assert!(is_retryable(Some(StatusCode::SERVICE_UNAVAILABLE), false));
    }

    #[test]
    fn test_definitive_statuses_not_retryable() {
        assert!(!is_retryable(Some(StatusCode::OK), false));
        assert!(!is_retryable(Some(StatusCode::NOT_FOUND), false));
        assert!(!is_retryable(Some(StatusCode::INTERNAL_SERVER_ERROR), false));
        assert!(!is_retryable(Some(StatusCode::BAD_GATEWAY), false));
    }
}
