//! Upstream response translation.
//!
//! # Responsibilities
//! - Parse upstream bodies by content type (JSON vs opaque text)
//! - Relay definitive upstream statuses, wrapping 4xx/5xx in a typed envelope
//! - Map transport exhaustion to 502 and unavailability to 503
//!
//! # Design Decisions
//! - Non-JSON upstream bodies relay as raw text with their own content
//!   type instead of being JSON-string-wrapped
//! - Every failure shape is a serde struct, not hand-built JSON
//! - The callers of this module never see a panic: parse failures become
//!   502 responses

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::upstream::caller::{CallError, UpstreamReply};

/// Envelope for relay-level failures (transport, probe, parse).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayErrorBody {
    pub error: &'static str,
    pub message: String,
    pub details: String,
    pub retry_count: u32,
    pub backend_url: String,
    pub path: String,
    pub timestamp: u64,
}

/// Envelope wrapping a definitive upstream 4xx/5xx.
#[derive(Debug, Serialize)]
pub struct BackendErrorBody {
    pub error: &'static str,
    pub status: u16,
    pub message: String,
    pub details: Value,
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

fn backend_error(status: StatusCode, details: Value) -> Response {
    let message = details
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status_reason(status));
    let body = BackendErrorBody {
        error: "Backend error",
        status: status.as_u16(),
        message,
        details,
    };
    (status, Json(body)).into_response()
}

/// Translate a definitive upstream reply into the outbound response.
pub fn translate_reply(reply: UpstreamReply, path: &str, backend_url: &str) -> Response {
    let is_json = reply
        .content_type
        .as_deref()
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        match serde_json::from_slice::<Value>(&reply.body) {
            Ok(value) if reply.status.as_u16() >= 400 => backend_error(reply.status, value),
            Ok(value) => (reply.status, Json(value)).into_response(),
            Err(e) => parse_failure(&e.to_string(), path, backend_url),
        }
    } else {
        let text = String::from_utf8_lossy(&reply.body).into_owned();
        if reply.status.as_u16() >= 400 {
            backend_error(reply.status, Value::String(text))
        } else {
            let mut response = (reply.status, text).into_response();
            if let Some(ct) = reply
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
            {
                response.headers_mut().insert(header::CONTENT_TYPE, ct);
            }
            response
        }
    }
}

/// Translate retry exhaustion into the terminal 502/503 response.
pub fn relay_failure(err: &CallError, path: &str, backend_url: &str) -> Response {
    let (status, error, message) = match err {
        CallError::Exhausted { .. } => (
            StatusCode::BAD_GATEWAY,
            "Bad Gateway",
            "Upstream request failed".to_string(),
        ),
        CallError::Unavailable { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            "Upstream is unavailable and may be cold-starting".to_string(),
        ),
    };
    let body = GatewayErrorBody {
        error,
        message,
        details: err.last_error().to_string(),
        retry_count: err.attempts(),
        backend_url: backend_url.to_string(),
        path: path.to_string(),
        timestamp: unix_timestamp(),
    };
    (status, Json(body)).into_response()
}

/// Short-circuit response for a failed pre-call health probe.
pub fn probe_failure(details: &str, path: &str, backend_url: &str) -> Response {
    let body = GatewayErrorBody {
        error: "Service Unavailable",
        message: "Upstream health probe failed; the service may be cold-starting".to_string(),
        details: details.to_string(),
        retry_count: 0,
        backend_url: backend_url.to_string(),
        path: path.to_string(),
        timestamp: unix_timestamp(),
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

/// Response for an unparseable upstream body.
pub fn parse_failure(details: &str, path: &str, backend_url: &str) -> Response {
    let body = GatewayErrorBody {
        error: "Parse error",
        message: "Failed to parse upstream response".to_string(),
        details: details.to_string(),
        retry_count: 0,
        backend_url: backend_url.to_string(),
        path: path.to_string(),
        timestamp: unix_timestamp(),
    };
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn reply(status: u16, content_type: Option<&str>, body: &str) -> UpstreamReply {
        UpstreamReply {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: content_type.map(str::to_string),
            body: body.as_bytes().to_vec().into(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_json_success_relayed_verbatim() {
        let reply = reply(
            200,
            Some("application/json"),
            r#"[{"_id":"1","name":"Widget"}]"#,
        );
        let response = translate_reply(reply, "/api/products", "http://u/api/products");
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await;
        assert_eq!(value[0]["name"], "Widget");
    }

    #[tokio::test]
    async fn test_definitive_error_wrapped_in_envelope() {
        let reply = reply(
            404,
            Some("application/json"),
            r#"{"message":"Product not found"}"#,
        );
        let response = translate_reply(reply, "/api/products/9", "http://u/api/products/9");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let value = body_json(response).await;
        assert_eq!(value["error"], "Backend error");
        assert_eq!(value["status"], 404);
        assert_eq!(value["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_error_message_falls_back_to_status_reason() {
        let reply = reply(500, Some("application/json"), r#"{"oops":true}"#);
        let response = translate_reply(reply, "/api/x", "http://u/api/x");
        let value = body_json(response).await;
        assert_eq!(value["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_text_body_relayed_with_content_type() {
        let reply = reply(200, Some("text/plain"), "pong");
        let response = translate_reply(reply, "/api/ping", "http://u/api/ping");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/plain"
        );
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_gateway() {
        let reply = reply(200, Some("application/json"), "{not json");
        let response = translate_reply(reply, "/api/x", "http://u/api/x");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let value = body_json(response).await;
        assert_eq!(value["error"], "Parse error");
    }

    #[tokio::test]
    async fn test_exhaustion_carries_retry_count() {
        let err = CallError::Exhausted {
            attempts: 3,
            message: "connection refused".to_string(),
        };
        let response = relay_failure(&err, "/api/orders", "http://u/api/orders");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let value = body_json(response).await;
        assert_eq!(value["error"], "Bad Gateway");
        assert_eq!(value["retryCount"], 3);
        assert_eq!(value["backendUrl"], "http://u/api/orders");
    }

    #[tokio::test]
    async fn test_unavailable_maps_to_503() {
        let err = CallError::Unavailable {
            attempts: 3,
            message: "upstream returned 503".to_string(),
        };
        let response = relay_failure(&err, "/api/orders", "http://u/api/orders");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let value = body_json(response).await;
        assert_eq!(value["error"], "Service Unavailable");
    }
}
