//! Resilience primitives shared by the upstream caller.
//!
//! # Design Decisions
//! - One parameterized backoff helper instead of per-call-site loops
//! - Retryability is a pure predicate over (status, transport failure)

pub mod backoff;
pub mod retries;
