//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize server → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → trigger → server drains connections → Exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown signal out to every task
//! - Tests trigger shutdown programmatically, the binary from Ctrl+C

pub mod shutdown;

pub use shutdown::Shutdown;
