//! Upstream failure injection: error classification, breaker behavior,
//! and degraded responses.

mod common;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use popular_repos::config::UpstreamConfig;
use popular_repos::coordinator::FetchFailure;
use popular_repos::github::UpstreamError;
use popular_repos::{CircuitBreaker, Coordinator, GithubClient, InMemoryCache, Query, ResolveError};

fn service(
    addr: SocketAddr,
    breaker: Arc<CircuitBreaker>,
) -> Coordinator<InMemoryCache, GithubClient> {
    common::init_tracing();
    let config = UpstreamConfig {
        base_url: format!("http://{}", addr),
        request_timeout_secs: 2,
        user_agent: "popular-repos-test".to_string(),
    };
    let client = GithubClient::new(&config).unwrap();
    Coordinator::new(
        InMemoryCache::new(Duration::from_secs(60)),
        client,
        breaker,
        "popular-repositories".to_string(),
    )
}

#[tokio::test]
async fn test_server_error_with_empty_cache_is_terminal() {
    let addr = common::start_mock_github(|| async { (503, String::new()) }).await;
    let service = service(addr, Arc::new(CircuitBreaker::new(5, Duration::from_secs(30))));

    let err = service.resolve(&Query::new(10, None, None)).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NoCachedFallback {
            cause: FetchFailure::Upstream(UpstreamError::Server { status: 503 }),
        }
    ));
}

#[tokio::test]
async fn test_client_error_is_classified() {
    let addr = common::start_mock_github(|| async { (404, String::new()) }).await;
    let service = service(addr, Arc::new(CircuitBreaker::new(5, Duration::from_secs(30))));

    let err = service.resolve(&Query::new(10, None, None)).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NoCachedFallback {
            cause: FetchFailure::Upstream(UpstreamError::Client { status: 404 }),
        }
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    // Grab an ephemeral port and release it so connections are refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = service(addr, Arc::new(CircuitBreaker::new(5, Duration::from_secs(30))));
    let err = service.resolve(&Query::new(10, None, None)).await.unwrap_err();

    assert!(matches!(
        err,
        ResolveError::NoCachedFallback {
            cause: FetchFailure::Upstream(UpstreamError::Transport(_)),
        }
    ));
}

#[tokio::test]
async fn test_breaker_opens_after_repeated_failures() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = common::start_mock_github(move || {
        counter.fetch_add(1, Ordering::Relaxed);
        async { (503, String::new()) }
    })
    .await;

    let breaker = Arc::new(CircuitBreaker::new(2, Duration::from_secs(30)));
    let service = service(addr, breaker);
    let query = Query::new(10, None, None);

    service.resolve(&query).await.unwrap_err();
    service.resolve(&query).await.unwrap_err();
    assert_eq!(hits.load(Ordering::Relaxed), 2);

    // Breaker is open now: no further network attempts.
    let err = service.resolve(&query).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::NoCachedFallback {
            cause: FetchFailure::BreakerOpen,
        }
    ));
    assert_eq!(hits.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn test_breaker_recovers_after_timeout() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let addr = common::start_mock_github(move || {
        let call = counter.fetch_add(1, Ordering::Relaxed);
        async move {
            if call == 0 {
                (503, String::new())
            } else {
                (200, common::search_body(5))
            }
        }
    })
    .await;

    let breaker = Arc::new(CircuitBreaker::new(1, Duration::from_millis(50)));
    let service = service(addr, breaker);
    let query = Query::new(10, None, None);

    service.resolve(&query).await.unwrap_err();
    assert_eq!(hits.load(Ordering::Relaxed), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Probe goes through, succeeds, and the result is cached again.
    let outcome = service.resolve(&query).await.unwrap();
    assert_eq!(outcome.total_count, 5);
    assert_eq!(hits.load(Ordering::Relaxed), 2);
}
