//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream call:
//!     → circuit_breaker.rs (fail fast if upstream deemed down)
//!     → On success/failure: outcome recorded, state machine advances
//! ```
//!
//! # Design Decisions
//! - One breaker instance per upstream, shared by every in-flight call
//! - Fail fast in Open state (no waiting for a timeout to elapse)
//! - Single probe in Half-Open (prevents hammering a recovering upstream)
//! - Retries are not performed here; callers fall back to stale data

pub mod circuit_breaker;

pub use circuit_breaker::{BreakerState, CircuitBreaker, GuardError};
