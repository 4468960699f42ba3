//! Upstream call subsystem.
//!
//! # Data Flow
//! ```text
//! filtered request
//!     → [probe.rs: optional HEAD before the main call]
//!     → caller.rs (one attempt per loop iteration, per-attempt timeout)
//!     → transient failure? backoff, retry up to max_attempts
//!     → definitive reply or terminal CallError
//! ```
//!
//! # Design Decisions
//! - Transport errors and upstream 503 are transient; everything else,
//!   including other 4xx/5xx, is definitive and returned at once
//! - Attempts are strictly sequential, never concurrent
//! - Exhaustion carries the attempt count and last error for the caller's
//!   502/503 envelope

pub mod caller;
pub mod probe;

pub use caller::{CallError, UpstreamCaller, UpstreamReply};
pub use probe::HealthProbe;
