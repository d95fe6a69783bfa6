//! In-memory cache backend with per-entry TTL.
//!
//! # Responsibilities
//! - Store search results keyed by (namespace, key)
//! - Expire entries lazily on read once their TTL has passed
//!
//! # Design Decisions
//! - DashMap for lock-free concurrent access; last write wins
//! - Expired entries are dropped on the read path, no sweeper task
//! - This backend never fails: `CacheError` exists for remote stores
//!   implementing the same trait

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheError, CacheStore};
use crate::github::types::SearchResults;
use crate::observability::metrics;
use crate::query::CacheKey;
use async_trait::async_trait;

#[derive(Debug, Clone)]
struct Entry {
    value: SearchResults,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// A thread-safe in-memory store with a fixed TTL for every entry.
#[derive(Clone)]
pub struct InMemoryCache {
    inner: Arc<DashMap<(String, String), Entry>>,
    ttl: Duration,
}

impl InMemoryCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Number of entries currently held, including not-yet-reaped
    /// expired ones.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> Result<Option<SearchResults>, CacheError> {
        let map_key = (namespace.to_string(), key.as_str().to_string());

        if let Some(entry) = self.inner.get(&map_key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }

        // Entry exists but is expired: reap it and report a miss.
        self.inner.remove(&map_key);
        metrics::record_cache_size(self.inner.len());
        Ok(None)
    }

    async fn put(
        &self,
        namespace: &str,
        key: &CacheKey,
        value: SearchResults,
    ) -> Result<(), CacheError> {
        let map_key = (namespace.to_string(), key.as_str().to_string());
        self.inner.insert(
            map_key,
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
        metrics::record_cache_size(self.inner.len());
        Ok(())
    }
}
