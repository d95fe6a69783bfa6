//! Upstream GitHub search client.
//!
//! # Data Flow
//! ```text
//! Query
//!     → client.rs (build search URL, one HTTP GET)
//!     → 2xx: deserialize SearchResults
//!     → 4xx/5xx/transport: classified UpstreamError, never a partial result
//! ```
//!
//! # Design Decisions
//! - One call per invocation; pagination and rate-limit negotiation are
//!   not attempted, failures surface as classified errors
//! - Timeouts are enforced here, not by callers
//! - 4xx and 5xx are both failures from the caller's point of view,
//!   but remain distinguishable for observability

pub mod client;
pub mod types;

pub use client::{ClientBuildError, GithubClient};
pub use types::{RepoSummary, SearchResults, UpstreamError};

use crate::query::Query;
use async_trait::async_trait;

/// Contract for the upstream search call.
///
/// Implementations must return either a fully populated [`SearchResults`]
/// or a classified [`UpstreamError`] — never a partial result.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Perform one search call for the given query.
    async fn search(&self, query: &Query) -> Result<SearchResults, UpstreamError>;
}
