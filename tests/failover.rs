//! Failover over real HTTP against mock upstreams.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use wallet_gateway::upstream::{
    EndpointList, FailoverExecutor, FailoverPolicy, FailureKind, OutboundRequest, OutcomeKind, ReqwestTransport,
};

mod common;
use common::Reply;

fn policy() -> FailoverPolicy {
    FailoverPolicy {
        attempt_timeout: Duration::from_millis(300),
        rate_limit_cooldown: Duration::from_secs(10),
        transport_retry_delay: Duration::from_millis(50),
        ..FailoverPolicy::default()
    }
}

fn executor(urls: Vec<String>) -> FailoverExecutor<ReqwestTransport> {
    FailoverExecutor::new("solana_rpc", EndpointList::new(urls), policy(), common::transport())
}

fn get_balance() -> OutboundRequest {
    OutboundRequest::post_json(
        "",
        br#"{"jsonrpc":"2.0","id":1,"method":"getBalance","params":["11111111111111111111111111111111"]}"#.to_vec(),
    )
}

#[tokio::test]
async fn test_timeout_then_balance_from_second_endpoint() {
    let e1 = common::start_programmable_backend(|_| async { Reply::hang(Duration::from_secs(5)) }).await;
    let e2 = common::start_mock_backend(200, r#"{"jsonrpc":"2.0","id":1,"result":12345}"#).await;
    let exec = executor(vec![e1.url(), e2.url()]);

    let started = Instant::now();
    let ok = exec.execute(&get_balance()).await.expect("second endpoint should answer");

    assert_eq!(ok.status_code, 200);
    assert!(String::from_utf8_lossy(&ok.body).contains("12345"));
    assert_eq!(ok.attempts[0].outcome, OutcomeKind::TransportError);
    assert_eq!(e1.hits(), 1);
    assert_eq!(e2.hits(), 1);
    assert!(exec.health().snapshot().is_empty(), "a timeout must not start a cooldown");
    assert!(started.elapsed() >= Duration::from_millis(350));

    let body = &e2.requests()[0].body;
    assert!(body.contains("getBalance"));
}

#[tokio::test]
async fn test_rate_limited_node_is_skipped_until_cooldown_ends() {
    let limited = common::start_mock_backend(429, r#"{"message":"Too many requests"}"#).await;
    let healthy = common::start_mock_backend(200, r#"{"jsonrpc":"2.0","id":1,"result":1}"#).await;
    let exec = executor(vec![limited.url(), healthy.url()]);

    for _ in 0..3 {
        exec.execute(&get_balance()).await.unwrap();
    }

    assert_eq!(limited.hits(), 1);
    assert_eq!(healthy.hits(), 3);
    assert_eq!(exec.rotation_index(), 1);
    assert_eq!(exec.health().snapshot()[0].consecutive_penalties, 1);
}

#[tokio::test]
async fn test_refused_connection_fails_over() {
    let dead = common::refused_url().await;
    let live = common::start_mock_backend(200, r#"{"result":"ok"}"#).await;
    let exec = executor(vec![dead, live.url()]);

    let ok = exec.execute(&get_balance()).await.unwrap();
    assert_eq!(ok.attempts.len(), 2);
    assert_eq!(ok.attempts[0].outcome, OutcomeKind::TransportError);
}

#[tokio::test]
async fn test_flaky_node_recovers_on_later_call() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let flaky = common::start_programmable_backend(move |_| {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Reply::json(200, r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32005,"message":"Node is behind"}}"#)
            } else {
                Reply::json(200, r#"{"jsonrpc":"2.0","id":1,"result":7}"#)
            }
        }
    })
    .await;
    let backup = common::start_mock_backend(503, "<html>unavailable</html>").await;
    let exec = executor(vec![flaky.url(), backup.url()]);

    let failure = exec.execute(&get_balance()).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Exhausted);
    assert_eq!(failure.last_outcome, Some(OutcomeKind::ServerError));
    assert_eq!(failure.status_code, Some(503));
    assert_eq!(failure.http_status(), 503);

    let ok = exec.execute(&get_balance()).await.unwrap();
    assert!(String::from_utf8_lossy(&ok.body).contains("\"result\":7"));
}

#[tokio::test]
async fn test_every_node_rate_limited() {
    let a = common::start_mock_backend(429, "").await;
    let b = common::start_mock_backend(429, "").await;
    let exec = executor(vec![a.url(), b.url()]);

    let first = exec.execute(&get_balance()).await.unwrap_err();
    assert_eq!(first.http_status(), 429);
    assert_eq!(first.total_endpoints, 2);

    let second = exec.execute(&get_balance()).await.unwrap_err();
    assert_eq!(second.kind, FailureKind::AllEndpointsRateLimited);
    assert_eq!(a.hits() + b.hits(), 2);
}
