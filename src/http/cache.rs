//! HTTP cache control module
//!
//! `ETag` generation, conditional request checks and per-route cache policy.
//! Nothing here keeps file content in memory; the `ETag` is computed from the bytes
//! read for the current request.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag` from content, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single `ETag`, a comma-separated list, weak validators and `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

/// Cache-Control policy for a served file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Cacheable but must be revalidated on every use
    NoCache,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(3600) // 1 hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"<!doctype html>");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 2);
        assert_eq!(etag, generate_etag(b"<!doctype html>"));
        assert_ne!(etag, generate_etag(b"<!doctype html><p>"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(CachePolicy::default().to_header_value(), "public, max-age=3600");
        assert_eq!(CachePolicy::NoCache.to_header_value(), "no-cache");
    }
}
