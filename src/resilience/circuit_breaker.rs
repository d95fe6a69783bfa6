//! Circuit breaker for upstream protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: upstream assumed down, calls fail fast
//! - Half-Open: testing if the upstream recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: after recovery timeout, first caller becomes the probe
//! Half-Open → Closed: probe call succeeds
//! Half-Open → Open: probe call fails
//! ```
//!
//! # Design Decisions
//! - Lock-free: state is an AtomicU8, counters are atomics
//! - Exactly one probe in Half-Open; competing callers fail fast
//! - A probe that is cancelled (its future dropped mid-flight) reopens
//!   the breaker with a fresh timeout, so Half-Open can never wedge
//! - Any success fully closes the breaker and resets the failure count

use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Breaker state (0=Closed, 1=Open, 2=HalfOpen).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl From<u8> for BreakerState {
    fn from(val: u8) -> Self {
        match val {
            1 => BreakerState::Open,
            2 => BreakerState::HalfOpen,
            _ => BreakerState::Closed,
        }
    }
}

impl BreakerState {
    fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

/// Error returned by [`CircuitBreaker::guard`].
#[derive(Debug, Clone, Error)]
pub enum GuardError<E> {
    /// The breaker is open; the guarded call was never invoked.
    #[error("circuit breaker is open")]
    Open,

    /// The guarded call ran and failed; recorded against the breaker.
    #[error(transparent)]
    Inner(E),
}

/// Health-tracking gate in front of a single upstream.
///
/// Shared by every in-flight call via `Arc`; all state lives in atomics.
#[derive(Debug)]
pub struct CircuitBreaker {
    state: AtomicU8,
    consecutive_failures: AtomicUsize,
    /// Milliseconds since `started` at which the breaker last opened.
    opened_at_ms: AtomicU64,
    started: Instant,
    failure_threshold: usize,
    recovery_timeout: Duration,
}

impl CircuitBreaker {
    /// Create a breaker that opens after `failure_threshold` consecutive
    /// failures and allows a probe after `recovery_timeout`.
    pub fn new(failure_threshold: usize, recovery_timeout: Duration) -> Self {
        Self {
            state: AtomicU8::new(BreakerState::Closed as u8),
            consecutive_failures: AtomicUsize::new(0),
            opened_at_ms: AtomicU64::new(0),
            started: Instant::now(),
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
        }
    }

    pub fn from_config(config: &CircuitBreakerConfig) -> Self {
        Self::new(
            config.failure_threshold,
            Duration::from_millis(config.recovery_timeout_ms),
        )
    }

    /// Current state, for observability and tests.
    pub fn state(&self) -> BreakerState {
        BreakerState::from(self.state.load(Ordering::Relaxed))
    }

    /// Run a fallible call through the breaker.
    ///
    /// Fails with [`GuardError::Open`] without polling the future when the
    /// upstream is deemed down; otherwise forwards the outcome and records
    /// it against the state machine. If the returned future is dropped
    /// while a Half-Open probe is in flight, the probe permit reopens the
    /// breaker so the recovery cycle can restart.
    pub async fn guard<T, E, F>(&self, fut: F) -> Result<T, GuardError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let mut admission = match self.try_acquire() {
            Some(admission) => admission,
            None => {
                metrics::record_breaker_rejection();
                return Err(GuardError::Open);
            }
        };

        match fut.await {
            Ok(value) => {
                admission.disarm();
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                admission.disarm();
                self.record_failure();
                Err(GuardError::Inner(e))
            }
        }
    }

    /// Decide whether a call may proceed, advancing Open → Half-Open when
    /// the recovery timeout has elapsed. Exactly one caller wins the probe
    /// and holds its permit for the duration of the call.
    fn try_acquire(&self) -> Option<Admission<'_>> {
        match self.state() {
            BreakerState::Closed => Some(Admission::Pass),
            BreakerState::HalfOpen => None,
            BreakerState::Open => {
                let opened_at = self.opened_at_ms.load(Ordering::Relaxed);
                let elapsed = self.elapsed_ms().saturating_sub(opened_at);
                if elapsed < self.recovery_timeout.as_millis() as u64 {
                    return None;
                }

                // Recovery timeout elapsed: the CAS winner becomes the probe.
                let won = self
                    .state
                    .compare_exchange(
                        BreakerState::Open as u8,
                        BreakerState::HalfOpen as u8,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    )
                    .is_ok();
                if !won {
                    return None;
                }
                self.log_transition(BreakerState::HalfOpen);
                Some(Admission::Probe(ProbePermit {
                    breaker: self,
                    armed: true,
                }))
            }
        }
    }

    fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);

        let previous = self
            .state
            .swap(BreakerState::Closed as u8, Ordering::Relaxed);
        if previous != (BreakerState::Closed as u8) {
            self.log_transition(BreakerState::Closed);
        }
    }

    fn record_failure(&self) {
        match self.state() {
            BreakerState::HalfOpen => {
                // Probe failed: back to Open with a fresh timeout.
                self.open();
            }
            BreakerState::Closed => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                if failures >= self.failure_threshold {
                    self.open();
                }
            }
            BreakerState::Open => {}
        }
    }

    fn open(&self) {
        self.opened_at_ms.store(self.elapsed_ms(), Ordering::Relaxed);
        let previous = self.state.swap(BreakerState::Open as u8, Ordering::Relaxed);
        if previous != (BreakerState::Open as u8) {
            self.log_transition(BreakerState::Open);
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn log_transition(&self, to: BreakerState) {
        tracing::warn!(state = to.as_str(), "Circuit breaker state change");
        metrics::record_breaker_transition(to.as_str());
    }
}

/// Permission to make one guarded call.
enum Admission<'a> {
    /// Breaker closed: ordinary call, nothing to release.
    Pass,
    /// This call is the Half-Open probe and holds the probe permit.
    Probe(ProbePermit<'a>),
}

impl Admission<'_> {
    fn disarm(&mut self) {
        if let Admission::Probe(permit) = self {
            permit.armed = false;
        }
    }
}

/// RAII permit for the single Half-Open probe.
///
/// Dropped while still armed (the probe future was cancelled before an
/// outcome was recorded), it reopens the breaker with a fresh timeout;
/// otherwise Half-Open would be a dead end.
struct ProbePermit<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for ProbePermit<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Circuit breaker probe cancelled before completion");
            self.breaker.open();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn failing_call(breaker: &CircuitBreaker) -> Result<u32, GuardError<&'static str>> {
        breaker.guard(async { Err::<u32, _>("boom") }).await
    }

    async fn succeeding_call(breaker: &CircuitBreaker) -> Result<u32, GuardError<&'static str>> {
        breaker.guard(async { Ok::<_, &'static str>(1) }).await
    }

    #[tokio::test]
    async fn test_closed_forwards_success() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(30));
        assert_eq!(succeeding_call(&breaker).await.unwrap(), 1);
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test]
    async fn test_opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(30));

        for _ in 0..3 {
            assert!(matches!(
                failing_call(&breaker).await,
                Err(GuardError::Inner("boom"))
            ));
        }
        assert_eq!(breaker.state(), BreakerState::Open);

        // Open: fail fast, the future must not run.
        let called = std::sync::atomic::AtomicBool::new(false);
        let result = breaker
            .guard(async {
                called.store(true, Ordering::Relaxed);
                Ok::<_, &'static str>(1)
            })
            .await;
        assert!(matches!(result, Err(GuardError::Open)));
        assert!(!called.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(30));

        failing_call(&breaker).await.unwrap_err();
        failing_call(&breaker).await.unwrap_err();
        succeeding_call(&breaker).await.unwrap();
        failing_call(&breaker).await.unwrap_err();
        failing_call(&breaker).await.unwrap_err();

        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test]
    async fn test_half_open_probe_closes_on_success() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));

        failing_call(&breaker).await.unwrap_err();
        assert_eq!(breaker.state(), BreakerState::Open);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(succeeding_call(&breaker).await.unwrap(), 1);
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test]
    async fn test_half_open_probe_reopens_on_failure() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));

        failing_call(&breaker).await.unwrap_err();
        tokio::time::sleep(Duration::from_millis(20)).await;

        failing_call(&breaker).await.unwrap_err();
        assert_eq!(breaker.state(), BreakerState::Open);

        // Fresh timeout: still failing fast right after the probe.
        assert!(matches!(
            succeeding_call(&breaker).await,
            Err(GuardError::Open)
        ));
    }

    #[tokio::test]
    async fn test_cancelled_probe_reopens_breaker() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(10));

        failing_call(&breaker).await.unwrap_err();
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Start the probe, then drop its future before it completes
        // (client disconnect / upper-layer timeout).
        let probe = breaker.guard(std::future::pending::<Result<u32, &'static str>>());
        tokio::select! {
            biased;
            _ = probe => unreachable!("probe future never resolves"),
            _ = tokio::time::sleep(Duration::from_millis(5)) => {}
        }

        // The permit reopened the breaker instead of wedging Half-Open.
        assert_eq!(breaker.state(), BreakerState::Open);

        // The normal recovery cycle still works afterwards.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(succeeding_call(&breaker).await.unwrap(), 1);
        assert_eq!(breaker.state(), BreakerState::Closed);
    }
}
