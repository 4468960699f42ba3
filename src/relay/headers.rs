//! Outbound-to-upstream header filtering.
//!
//! # Responsibilities
//! - Force JSON content negotiation on every upstream call
//! - Copy the credential and origin headers the upstream cares about
//! - Keep hop-by-hop and host-identifying headers off the wire
//!
//! # Design Decisions
//! - Allowlist, not blocklist: anything unlisted never crosses, so
//!   Host, Connection, Content-Length and friends are excluded by
//!   construction
//! - HeaderMap lookups are case-insensitive already

use axum::http::{header, HeaderMap, HeaderValue};

/// User-Agent sent when the inbound request carries none.
pub const RELAY_USER_AGENT: &str = "request-relay/0.1";

/// Inbound headers copied through to the upstream when present.
const FORWARDED: [header::HeaderName; 4] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::ORIGIN,
    header::REFERER,
];

/// Build the header set for the upstream call from the inbound headers.
pub fn build_upstream_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    for name in FORWARDED {
        if let Some(value) = inbound.get(&name) {
            headers.insert(name, value.clone());
        }
    }

    let user_agent = inbound
        .get(header::USER_AGENT)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(RELAY_USER_AGENT));
    headers.insert(header::USER_AGENT, user_agent);

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_negotiation_always_set() {
        let headers = build_upstream_headers(&HeaderMap::new());
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(headers.get("accept").unwrap(), "application/json");
    }

    #[test]
    fn test_authorization_copied_when_present() {
        let mut inbound = HeaderMap::new();
        inbound.insert("authorization", HeaderValue::from_static("Bearer token"));
        let headers = build_upstream_headers(&inbound);
        assert_eq!(headers.get("authorization").unwrap(), "Bearer token");
    }

    #[test]
    fn test_credential_headers_absent_when_not_sent() {
        let headers = build_upstream_headers(&HeaderMap::new());
        assert!(headers.get("authorization").is_none());
        assert!(headers.get("cookie").is_none());
    }

    #[test]
    fn test_hop_by_hop_headers_never_forwarded() {
        let mut inbound = HeaderMap::new();
        inbound.insert("host", HeaderValue::from_static("relay.example.com"));
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert("content-length", HeaderValue::from_static("42"));
        let headers = build_upstream_headers(&inbound);
        assert!(headers.get("host").is_none());
        assert!(headers.get("connection").is_none());
        assert!(headers.get("content-length").is_none());
    }

    #[test]
    fn test_user_agent_forwarded_with_fallback() {
        let headers = build_upstream_headers(&HeaderMap::new());
        assert_eq!(headers.get("user-agent").unwrap(), RELAY_USER_AGENT);

        let mut inbound = HeaderMap::new();
        inbound.insert("user-agent", HeaderValue::from_static("Mozilla/5.0"));
        let headers = build_upstream_headers(&inbound);
        assert_eq!(headers.get("user-agent").unwrap(), "Mozilla/5.0");
    }

    #[test]
    fn test_origin_and_referer_copied() {
        let mut inbound = HeaderMap::new();
        inbound.insert("origin", HeaderValue::from_static("https://shop.example.com"));
        inbound.insert("referer", HeaderValue::from_static("https://shop.example.com/cart"));
        let headers = build_upstream_headers(&inbound);
        assert_eq!(headers.get("origin").unwrap(), "https://shop.example.com");
        assert_eq!(
            headers.get("referer").unwrap(),
            "https://shop.example.com/cart"
        );
    }
}
