//! Request Relay
//!
//! A stateless HTTP relay built with Tokio and Axum. It accepts any inbound
//! request, rewrites the path, forwards the call to a single configured
//! upstream origin, and answers with a CORS-decorated JSON response.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                REQUEST RELAY                  │
//!                         │                                               │
//!   Client Request        │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   ──────────────────────┼─▶│  http   │──▶│  relay  │──▶│  upstream  │──┼──▶ Upstream
//!                         │  │ server  │   │ rewrite │   │   caller   │  │    API
//!                         │  └─────────┘   │ +filter │   │ (+ retry)  │  │
//!                         │                └─────────┘   └─────┬──────┘  │
//!                         │                                    │         │
//!   Client Response       │  ┌─────────┐   ┌───────────┐       │         │
//!   ◀─────────────────────┼──│  CORS   │◀──│ translate │◀──────┘         │
//!                         │  │ headers │   │ response  │                 │
//!                         │  └─────────┘   └───────────┘                 │
//!                         │                                               │
//!                         │  ┌─────────────────────────────────────────┐ │
//!                         │  │          Cross-Cutting Concerns          │ │
//!                         │  │  config │ resilience │ observability │   │ │
//!                         │  │         │ (backoff)  │ (logs/metrics)│   │ │
//!                         │  └─────────────────────────────────────────┘ │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use request_relay::config::loader::load_config;
use request_relay::http::HttpServer;
use request_relay::lifecycle::Shutdown;
use request_relay::observability;

/// Command-line arguments for the relay binary.
#[derive(Parser, Debug)]
#[command(name = "request-relay")]
#[command(about = "Stateless HTTP relay with retry, health probing, and CORS", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Override the listener bind address (e.g., "0.0.0.0:8080").
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    observability::logging::init("request_relay=debug,tower_http=debug");

    tracing::info!("request-relay v0.1.0 starting");

    let mut config = load_config(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.listener.bind_address = listen;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.resolved_base_url(),
        environment = %config.upstream.environment,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
