//! CORS middleware.
//!
//! Every response the relay produces, success or error, carries the same
//! permissive header set; OPTIONS preflights short-circuit here with 204
//! and never reach the upstream.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;
use crate::http::server::AppState;

const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With, Origin, Accept, Cookie";
const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Precomputed CORS header values for one relay deployment.
#[derive(Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    /// Build the policy from configuration. An unparseable origin falls
    /// back to the wildcard.
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            allow_origin: HeaderValue::from_str(&config.allowed_origin)
                .unwrap_or_else(|_| HeaderValue::from_static("*")),
            max_age: HeaderValue::from_str(&config.max_age_secs.to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("86400")),
        }
    }

    /// Stamp the fixed CORS set onto a response header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }

    /// Terminal 204 response for an OPTIONS preflight.
    pub fn preflight(&self) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        self.apply(response.headers_mut());
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        response
    }
}

pub async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS {
        return state.cors.preflight();
    }

    let mut response = next.run(req).await;
    state.cors.apply(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_header_set_applied() {
        let policy = CorsPolicy::from_config(&CorsConfig::default());
        let mut headers = HeaderMap::new();
        policy.apply(&mut headers);
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            ALLOWED_METHODS
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
        assert_eq!(headers.get("vary").unwrap(), "Origin");
        assert!(headers
            .get("access-control-allow-headers")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Authorization"));
    }

    #[test]
    fn test_specific_origin_configured() {
        let config = CorsConfig {
            allowed_origin: "https://shop.example.com".to_string(),
            ..CorsConfig::default()
        };
        let policy = CorsPolicy::from_config(&config);
        let mut headers = HeaderMap::new();
        policy.apply(&mut headers);
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://shop.example.com"
        );
    }

    #[test]
    fn test_preflight_is_204_with_max_age() {
        let policy = CorsPolicy::from_config(&CorsConfig::default());
        let response = policy.preflight();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("access-control-max-age").unwrap(),
            "86400"
        );
    }
}
