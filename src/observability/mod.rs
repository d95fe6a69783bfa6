//! Observability subsystem.
//!
//! # Responsibilities
//! - Define service metrics (cache hits/misses, fallbacks, breaker state)
//! - Keep metric names and labels in one place
//!
//! # Design Decisions
//! - Uses the `metrics` facade; exporter wiring belongs to the embedding
//!   application
//! - Structured logging via `tracing` happens at the call sites, not here

pub mod metrics;
