//! Cache storage subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator:
//!     → get(namespace, key): Some(value) | None | CacheError
//!     → put(namespace, key, value): best-effort write-back
//!
//! Backend (memory.rs):
//!     → TTL enforcement on read
//!     → whole-value replacement on write (never partial)
//! ```
//!
//! # Design Decisions
//! - Absence is `Ok(None)`, never an error: callers can always tell
//!   "not cached" apart from "store unavailable" and from a cached
//!   empty result
//! - TTL and eviction are the backend's concern; callers never
//!   revalidate entries
//! - Writes replace the whole entry atomically, so a concurrent reader
//!   sees either the previous value or the new one

pub mod memory;

pub use memory::InMemoryCache;

use crate::github::types::SearchResults;
use crate::query::CacheKey;
use async_trait::async_trait;
use thiserror::Error;

/// Error raised when the store itself is unavailable.
///
/// A missing entry is not an error; `get` reports it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
#[error("cache store unavailable: {0}")]
pub struct CacheError(pub String);

/// Namespaced key-value store for search results.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a cached value. `Ok(None)` means "not cached".
    async fn get(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> Result<Option<SearchResults>, CacheError>;

    /// Store a value under the given key, replacing any previous entry.
    async fn put(
        &self,
        namespace: &str,
        key: &CacheKey,
        value: SearchResults,
    ) -> Result<(), CacheError>;
}
