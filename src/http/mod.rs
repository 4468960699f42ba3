//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all relay handler)
//!     → request.rs (assign request ID)
//!     → middleware/cors.rs (preflight short-circuit, response headers)
//!     → [relay pipeline rewrites, filters, calls upstream]
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
