//! Relay pipeline: the pure request/response transforms.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → rewrite.rs (strip one known prefix, derive upstream path)
//!     → headers.rs (allowlist filter, force JSON content negotiation)
//!     → [upstream caller performs the call]
//!     → translate.rs (parse by content type, wrap errors, map statuses)
//! ```
//!
//! # Design Decisions
//! - Every transform here is a pure function: no I/O, no shared state
//! - Typed envelopes instead of ad hoc JSON for every error shape
//! - One rewrite/filter policy replaces the per-variant duplicates

pub mod headers;
pub mod rewrite;
pub mod translate;

pub use rewrite::PathRewriter;
