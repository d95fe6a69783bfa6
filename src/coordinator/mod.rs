//! Request coordinator: cache-aside, breaker-gated fetch, stale fallback.
//!
//! # Data Flow
//! ```text
//! resolve(query):
//!     → derive cache key
//!     → primary cache lookup ── hit ──→ return
//!     → miss: upstream call through the circuit breaker
//!         → success: best-effort cache write, return
//!         → failure (breaker open / 4xx / 5xx / transport):
//!             → fallback cache lookup ── present ──→ return stale value
//!             → absent: NoCachedFallback
//! ```
//!
//! # Design Decisions
//! - Stateless and reentrant; the breaker is the only shared mutable
//!   state and is injected, not globally retrieved
//! - One key derivation for every lookup and write path
//! - A failed cache read counts as a miss on the primary path; on the
//!   fallback path it means we cannot even check, which is reported as
//!   UpstreamUnavailable rather than NoCachedFallback
//! - No retries here; serving stale data beats failing the caller

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::{CacheStore, InMemoryCache};
use crate::config::AppConfig;
use crate::github::client::ClientBuildError;
use crate::github::types::{SearchResults, UpstreamError};
use crate::github::{GithubClient, UpstreamClient};
use crate::observability::metrics;
use crate::query::{CacheKey, Query};
use crate::resilience::{CircuitBreaker, GuardError};

/// Why a live upstream fetch could not produce data.
#[derive(Debug, Clone, Error)]
pub enum FetchFailure {
    /// The circuit breaker was open; no network attempt was made.
    #[error("circuit breaker is open")]
    BreakerOpen,

    /// The upstream call ran and failed.
    #[error(transparent)]
    Upstream(UpstreamError),
}

impl FetchFailure {
    fn kind(&self) -> &'static str {
        match self {
            FetchFailure::BreakerOpen => "breaker_open",
            FetchFailure::Upstream(UpstreamError::Client { .. }) => "client_error",
            FetchFailure::Upstream(UpstreamError::Server { .. }) => "server_error",
            FetchFailure::Upstream(UpstreamError::Transport(_)) => "transport",
        }
    }
}

/// Terminal failure of [`Coordinator::resolve`].
///
/// Both variants surface externally as "service unavailable"; they stay
/// distinct so logging and alerting can tell them apart.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// Upstream failed and the fallback lookup could not be performed
    /// (the cache store was unavailable too).
    #[error("upstream unavailable: {cause}")]
    UpstreamUnavailable {
        #[source]
        cause: FetchFailure,
    },

    /// Upstream failed and no cached fallback exists for this key.
    #[error("service unavailable and no cached value found")]
    NoCachedFallback {
        #[source]
        cause: FetchFailure,
    },
}

/// Result of one resolve call.
pub type Outcome = Result<SearchResults, ResolveError>;

/// Orchestrates cache store, upstream client, and circuit breaker for
/// each popular-repositories request.
///
/// Holds no per-call state: concurrent resolves are independent, and
/// two concurrent misses for the same key may both fetch and both write
/// (last write wins).
pub struct Coordinator<S, U> {
    cache: S,
    upstream: U,
    breaker: Arc<CircuitBreaker>,
    namespace: String,
}

impl<S, U> Coordinator<S, U>
where
    S: CacheStore,
    U: UpstreamClient,
{
    /// Create a coordinator. The breaker is shared: every coordinator
    /// fronting the same upstream should receive a clone of the same
    /// `Arc`.
    pub fn new(cache: S, upstream: U, breaker: Arc<CircuitBreaker>, namespace: String) -> Self {
        Self {
            cache,
            upstream,
            breaker,
            namespace,
        }
    }

    /// Resolve a query: serve from cache, fetch from upstream, or
    /// degrade to stale data. The sole entry point.
    pub async fn resolve(&self, query: &Query) -> Outcome {
        let key = query.cache_key();

        match self.cache.get(&self.namespace, &key).await {
            Ok(Some(cached)) => {
                metrics::record_cache_lookup(true);
                tracing::debug!(key = %key, "Cache hit");
                return Ok(cached);
            }
            Ok(None) => {
                metrics::record_cache_lookup(false);
            }
            Err(e) => {
                // Store trouble must not fail the request; treat as a miss.
                metrics::record_cache_lookup(false);
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
            }
        }

        match self.breaker.guard(self.upstream.search(query)).await {
            Ok(results) => {
                if let Err(e) = self.cache.put(&self.namespace, &key, results.clone()).await {
                    tracing::warn!(key = %key, error = %e, "Cache write failed, returning result anyway");
                }
                Ok(results)
            }
            Err(guard_err) => {
                let cause = match guard_err {
                    GuardError::Open => FetchFailure::BreakerOpen,
                    GuardError::Inner(e) => FetchFailure::Upstream(e),
                };
                metrics::record_upstream_failure(cause.kind());
                tracing::warn!(key = %key, error = %cause, "Upstream fetch failed, attempting cached fallback");
                self.fallback(&key, cause).await
            }
        }
    }

    /// Serve a stale cached value after an upstream failure, if one
    /// exists at the same key.
    async fn fallback(&self, key: &CacheKey, cause: FetchFailure) -> Outcome {
        match self.cache.get(&self.namespace, key).await {
            Ok(Some(stale)) => {
                metrics::record_fallback_served();
                tracing::info!(key = %key, "Serving stale cached result");
                Ok(stale)
            }
            Ok(None) => {
                metrics::record_resolve_failure("no_cached_fallback");
                tracing::error!(key = %key, cause = %cause, "No cached fallback available");
                Err(ResolveError::NoCachedFallback { cause })
            }
            Err(e) => {
                metrics::record_resolve_failure("cache_unavailable");
                tracing::error!(key = %key, error = %e, cause = %cause, "Fallback lookup failed");
                Err(ResolveError::UpstreamUnavailable { cause })
            }
        }
    }
}

impl Coordinator<InMemoryCache, GithubClient> {
    /// Wire up the default production stack from configuration: in-memory
    /// TTL cache, reqwest-backed GitHub client, and a fresh breaker.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientBuildError> {
        let cache = InMemoryCache::new(Duration::from_secs(config.cache.ttl_secs));
        let upstream = GithubClient::new(&config.upstream)?;
        let breaker = Arc::new(CircuitBreaker::from_config(&config.circuit_breaker));
        Ok(Self::new(cache, upstream, breaker, config.cache.namespace.clone()))
    }
}
