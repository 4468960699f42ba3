//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed explicitly into HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no global mutable state
//! - All fields have defaults to allow minimal configs
//! - Environment overrides beat file values, file beats defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CorsConfig;
pub use schema::HealthProbeConfig;
pub use schema::RelayConfig;
pub use schema::RetryConfig;
pub use schema::RewriteConfig;
pub use schema::TimeoutConfig;
pub use schema::UpstreamConfig;
