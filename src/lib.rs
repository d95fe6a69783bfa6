//! Popular-repositories resolver.
//!
//! Answers "what are the most popular repositories matching a filter?"
//! by querying the GitHub search API, while shielding callers from
//! upstream latency, rate limits, and outages.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌────────────────────────────────────────────────┐
//!                 │                  COORDINATOR                    │
//!                 │                                                 │
//!   Query ────────┼─▶ cache lookup ── hit ──▶ result                │
//!                 │        │ miss                                   │
//!                 │        ▼                                        │
//!                 │  circuit breaker ── open ──▶ fallback lookup    │
//!                 │        │ closed                   │             │
//!                 │        ▼                          ▼             │
//!                 │  upstream fetch ── fail ──▶ stale result or     │
//!                 │        │ ok                 NoCachedFallback    │
//!                 │        ▼                                        │
//!   Result ◀──────┼── cache write-back (best effort)                │
//!                 └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod coordinator;
pub mod github;
pub mod query;

// Collaborators
pub mod cache;
pub mod resilience;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use cache::{CacheStore, InMemoryCache};
pub use config::AppConfig;
pub use coordinator::{Coordinator, Outcome, ResolveError};
pub use github::{GithubClient, SearchResults, UpstreamClient};
pub use query::Query;
pub use resilience::CircuitBreaker;
