//! Metrics collection.
//!
//! # Metrics
//! - `repos_cache_lookups_total` (counter): by outcome (hit, miss)
//! - `repos_cache_entries` (gauge): current entry count
//! - `repos_upstream_failures_total` (counter): by kind
//! - `repos_fallback_served_total` (counter): stale results served
//! - `repos_resolve_failures_total` (counter): resolves with no data at all
//! - `repos_breaker_transitions_total` (counter): by target state
//! - `repos_breaker_rejections_total` (counter): calls failed fast

use metrics::{counter, gauge};

/// Record the outcome of a primary cache lookup.
pub fn record_cache_lookup(hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    counter!("repos_cache_lookups_total", "outcome" => outcome).increment(1);
}

/// Record the current number of cached entries.
pub fn record_cache_size(entries: usize) {
    gauge!("repos_cache_entries").set(entries as f64);
}

/// Record a classified upstream failure.
pub fn record_upstream_failure(kind: &'static str) {
    counter!("repos_upstream_failures_total", "kind" => kind).increment(1);
}

/// Record a stale cached result served after an upstream failure.
pub fn record_fallback_served() {
    counter!("repos_fallback_served_total").increment(1);
}

/// Record a resolve that failed with no cached fallback available.
pub fn record_resolve_failure(kind: &'static str) {
    counter!("repos_resolve_failures_total", "kind" => kind).increment(1);
}

/// Record a circuit breaker state transition.
pub fn record_breaker_transition(state: &'static str) {
    counter!("repos_breaker_transitions_total", "state" => state).increment(1);
}

/// Record a call rejected by the open breaker.
pub fn record_breaker_rejection() {
    counter!("repos_breaker_rejections_total").increment(1);
}
