//! HTTP server setup and the relay handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all relay handler
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Bind server to listener, serve until shutdown
//! - Drive one request through the relay state machine:
//!   rewrite → filter → [probe] → call (retries inside) → translate

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::middleware::cors::{cors_middleware, CorsPolicy};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::relay::headers::build_upstream_headers;
use crate::relay::rewrite::{upstream_url, PathRewriter};
use crate::relay::translate;
use crate::upstream::{HealthProbe, UpstreamCaller};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub rewriter: Arc<PathRewriter>,
    pub caller: Arc<UpstreamCaller>,
    pub probe: Option<Arc<HealthProbe>>,
    pub cors: CorsPolicy,
}

/// HTTP server for the request relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let config = Arc::new(config);

        let rewriter = Arc::new(PathRewriter::new(config.rewrite.prefixes.clone()));
        let caller = Arc::new(UpstreamCaller::new(&config.timeouts, config.retries.clone()));
        let probe = config
            .health_probe
            .enabled
            .then(|| Arc::new(HealthProbe::new(config.health_probe.clone())));
        let cors = CorsPolicy::from_config(&config.cors);

        let state = AppState {
            config: config.clone(),
            rewriter,
            caller,
            probe,
            cors,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        // CORS sits outside the timeout so even timeout responses carry
        // the header set; preflights short-circuit before any relay work.
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(middleware::from_fn_with_state(state, cors_middleware))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.resolved_base_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Main relay handler.
/// Rewrites the path, filters headers, and forwards to the upstream.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let method = request.method().clone();
    let method_str = method.to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Relaying request"
    );

    let base_url = state.config.upstream.resolved_base_url();
    let rewritten = state.rewriter.rewrite(&path);
    let target = upstream_url(base_url, &rewritten, query.as_deref());

    let (parts, body) = request.into_parts();

    // Buffered up front: retry attempts need to replay the body.
    let body_bytes = match to_bytes(body, state.config.listener.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(request_id = %request_id, "Inbound body exceeded size limit");
            metrics::record_request(&method_str, 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    if let Some(probe) = &state.probe {
        if let Err(e) = probe.check(base_url).await {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Short-circuiting on failed health probe"
            );
            metrics::record_request(&method_str, 503, start_time);
            return translate::probe_failure(&e.to_string(), &path, &target);
        }
    }

    let upstream_headers = build_upstream_headers(&parts.headers);

    tracing::debug!(request_id = %request_id, target = %target, "Forwarding to upstream");

    let response = match state
        .caller
        .call(method, &target, &upstream_headers, body_bytes, &request_id)
        .await
    {
        Ok(reply) => translate::translate_reply(reply, &path, &target),
        Err(e) => translate::relay_failure(&e, &path, &target),
    };

    metrics::record_request(&method_str, response.status().as_u16(), start_time);
    response
}
