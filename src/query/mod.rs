//! Query model and cache-key derivation.
//!
//! # Responsibilities
//! - Represent one logical "popular repositories" request
//! - Derive the deterministic cache key for a query
//!
//! # Design Decisions
//! - Queries are immutable value objects, built once per request
//! - A single key derivation is used everywhere a key is computed
//!   (primary lookup, write-back, fallback lookup)
//! - An empty language string and an absent language normalize to the
//!   same key to avoid cache fragmentation
//! - `since` does not participate in the key: two queries that differ
//!   only in `since` share a cached entry (see DESIGN.md)

use chrono::NaiveDate;

/// A request for the most popular repositories matching a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Number of repositories to retrieve. Must be positive.
    pub count: u32,
    /// Programming language filter, if any.
    pub language: Option<String>,
    /// Only repositories created on or after this date.
    pub since: Option<NaiveDate>,
}

impl Query {
    /// Create a query. An empty `language` is normalized to `None` and
    /// `count` is raised to at least 1, so no out-of-model spelling can
    /// diverge anywhere downstream (cache key or upstream query string).
    pub fn new(count: u32, language: Option<String>, since: Option<NaiveDate>) -> Self {
        let language = language.filter(|l| !l.is_empty());
        Self {
            count: count.max(1),
            language,
            since,
        }
    }

    /// Derive the cache key for this query.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive(self.count, self.language.as_deref())
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(10, None, None)
    }
}

/// Deterministic cache key derived from (count, language).
///
/// `since` is deliberately not part of the key, matching the observed
/// behavior of the service this replaces: cached entries are shared
/// across date filters for the same (count, language) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Pure key derivation. Equal (count, language) inputs always map to
    /// the same key; absent and empty language are equivalent.
    pub fn derive(count: u32, language: Option<&str>) -> Self {
        let language = match language {
            Some(l) if !l.is_empty() => l,
            _ => "none",
        };
        CacheKey(format!("{}-{}", count, language))
    }

    /// The key as a string slice, for use by store backends.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
