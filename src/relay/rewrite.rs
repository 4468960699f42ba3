//! Inbound path rewriting.
//!
//! # Responsibilities
//! - Strip exactly one recognized prefix from the inbound path
//! - Left-trim remaining leading slashes
//! - Derive the full upstream URL under the upstream's /api/ segment
//!
//! # Design Decisions
//! - Longest prefix wins, so "<invocation>/api/" beats "<invocation>/"
//! - Unrecognized paths pass through trimmed, never rejected
//! - Pure and infallible: always produces a string, possibly empty

/// Rewrites inbound paths for forwarding to the upstream origin.
#[derive(Debug, Clone)]
pub struct PathRewriter {
    /// Recognized prefixes, sorted longest first.
    prefixes: Vec<String>,
}

impl PathRewriter {
    /// Create a rewriter from the configured prefix set.
    pub fn new(mut prefixes: Vec<String>) -> Self {
        prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
        Self { prefixes }
    }

    /// Strip one matching prefix and any remaining leading slashes.
    pub fn rewrite(&self, path: &str) -> String {
        let stripped = self
            .prefixes
            .iter()
            .find_map(|prefix| path.strip_prefix(prefix.as_str()))
            .unwrap_or(path);
        stripped.trim_start_matches('/').to_string()
    }
}

/// Build the full upstream URL for a rewritten path, carrying the inbound
/// query string through verbatim.
pub fn upstream_url(base_url: &str, rewritten: &str, query: Option<&str>) -> String {
    let mut url = format!("{}/api/{}", base_url.trim_end_matches('/'), rewritten);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}
