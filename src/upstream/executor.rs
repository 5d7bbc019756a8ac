//! Failover executor.
//!
//! Drives one logical request across the endpoint list of one service.
//!
//! # Per-call state machine
//! ```text
//! Start ── no eligible endpoint ──────────────▶ AllEndpointsRateLimited
//!   │
//!   └─▶ TryCandidate ── Success ──────────────▶ Ok (rotation := index)
//!           │  ▲
//!           │  └── soft failure, more left ──┘   (429 also starts a cooldown,
//!           │                                     transport errors pause first)
//!           └── last candidate / fatal RPC code ▶ Exhausted
//! ```
//!
//! Candidates are tried one at a time, starting at the rotation pointer. The
//! pointer and the health table are shared by every concurrent call of the
//! same service; they are updated without coordination beyond the atomics
//! and map shards they live in.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::schema::UpstreamConfig;
use crate::observability::metrics;
use crate::resilience::backoff::DEFAULT_TRANSPORT_RETRY_DELAY;
use crate::resilience::timeouts::with_attempt_timeout;
use crate::upstream::classify::{
    classify, classify_transport, AttemptOutcome, OutcomeKind, RpcErrorDetails, ShapeCheck,
};
use crate::upstream::health::{endpoint_key, HealthTracker};
use crate::upstream::registry::EndpointList;
use crate::upstream::transport::{OutboundRequest, Transport};

/// JSON-RPC codes every node answers identically; retrying them is pointless.
pub const DEFAULT_NON_RETRYABLE_RPC_CODES: [i64; 3] = [-32600, -32601, -32602];

/// Tunables for one service.
#[derive(Debug, Clone)]
pub struct FailoverPolicy {
    pub attempt_timeout: Duration,
    pub rate_limit_cooldown: Duration,
    pub transport_retry_delay: Duration,
    pub non_retryable_rpc_codes: Vec<i64>,
}

impl Default for FailoverPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(20),
            rate_limit_cooldown: Duration::from_secs(10),
            transport_retry_delay: DEFAULT_TRANSPORT_RETRY_DELAY,
            non_retryable_rpc_codes: DEFAULT_NON_RETRYABLE_RPC_CODES.to_vec(),
        }
    }
}

impl FailoverPolicy {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
            rate_limit_cooldown: Duration::from_millis(config.rate_limit_cooldown_ms),
            transport_retry_delay: Duration::from_millis(config.transport_retry_delay_ms),
            non_retryable_rpc_codes: config.non_retryable_rpc_codes.clone(),
        }
    }
}

/// One attempt in a failover sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub endpoint: String,
    pub outcome: OutcomeKind,
}

/// First usable upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
    /// Key of the endpoint that answered.
    pub endpoint: String,
    pub attempts: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Every endpoint was in cooldown; nothing was sent.
    AllEndpointsRateLimited,
    /// Every eligible endpoint was tried (or a fatal RPC error stopped the run).
    Exhausted,
    /// The registry is empty.
    NoEndpointsConfigured,
}

/// Aggregate failure of a failover sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailoverFailure {
    pub kind: FailureKind,
    /// Last HTTP status received, if any attempt got a response.
    pub status_code: Option<u16>,
    pub message: String,
    pub rpc_error: Option<RpcErrorDetails>,
    pub last_outcome: Option<OutcomeKind>,
    pub total_endpoints: usize,
    pub eligible_endpoints: usize,
    pub attempts: Vec<AttemptRecord>,
    /// Body of the last RPC error response, for JSON-RPC passthrough.
    #[serde(skip)]
    pub rpc_error_body: Option<Vec<u8>>,
}

impl FailoverFailure {
    /// Status to report to the wallet client.
    pub fn http_status(&self) -> u16 {
        match (self.kind, self.last_outcome) {
            (FailureKind::AllEndpointsRateLimited, _) => 429,
            (FailureKind::Exhausted, Some(OutcomeKind::RateLimited)) => 429,
            (FailureKind::Exhausted, Some(OutcomeKind::RpcError)) => 502,
            _ => 503,
        }
    }
}

impl fmt::Display for FailoverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {} endpoints eligible)",
            self.message, self.eligible_endpoints, self.total_endpoints
        )
    }
}

impl std::error::Error for FailoverFailure {}

pub type FailoverResult = Result<UpstreamResponse, FailoverFailure>;

/// Failover driver for one logical upstream service.
pub struct FailoverExecutor<T> {
    service: String,
    endpoints: EndpointList,
    keys: Vec<String>,
    health: HealthTracker,
    rotation: AtomicUsize,
    policy: FailoverPolicy,
    transport: T,
}

impl<T: Transport> FailoverExecutor<T> {
    pub fn new(
        service: impl Into<String>,
        endpoints: EndpointList,
        policy: FailoverPolicy,
        transport: T,
    ) -> Self {
        let keys = endpoints.list().iter().map(|e| endpoint_key(e)).collect();
        Self {
            service: service.into(),
            endpoints,
            keys,
            health: HealthTracker::new(),
            rotation: AtomicUsize::new(0),
            policy,
            transport,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    /// Tracking keys (host[:port]) in registry order; safe to display.
    pub fn endpoint_keys(&self) -> &[String] {
        &self.keys
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    pub fn policy(&self) -> &FailoverPolicy {
        &self.policy
    }

    /// Index the next call starts from.
    pub fn rotation_index(&self) -> usize {
        self.rotation.load(Ordering::Relaxed)
    }

    /// Run a request with no shape requirement on 2xx bodies.
    pub async fn execute(&self, request: &OutboundRequest) -> FailoverResult {
        self.execute_checked(request, None).await
    }

    /// Run a request, treating 2xx bodies that fail `shape` as soft failures.
    pub async fn execute_checked(
        &self,
        request: &OutboundRequest,
        shape: Option<ShapeCheck>,
    ) -> FailoverResult {
        let total = self.endpoints.len();
        if total == 0 {
            metrics::record_failover(&self.service, "no_endpoints");
            return Err(FailoverFailure {
                kind: FailureKind::NoEndpointsConfigured,
                status_code: None,
                message: format!("No endpoints configured for {}", self.service),
                rpc_error: None,
                last_outcome: None,
                total_endpoints: 0,
                eligible_endpoints: 0,
                attempts: Vec::new(),
                rpc_error_body: None,
            });
        }

        let start = self.rotation.load(Ordering::Relaxed) % total;
        let eligible: Vec<usize> = (0..total)
            .map(|offset| (start + offset) % total)
            .filter(|&index| !self.health.is_rate_limited(&self.keys[index]))
            .collect();

        if eligible.is_empty() {
            tracing::warn!(service = %self.service, total, "All endpoints cooling down");
            metrics::record_failover(&self.service, "all_rate_limited");
            return Err(FailoverFailure {
                kind: FailureKind::AllEndpointsRateLimited,
                status_code: Some(429),
                message: format!("All {} {} endpoints are rate limited", total, self.service),
                rpc_error: None,
                last_outcome: Some(OutcomeKind::RateLimited),
                total_endpoints: total,
                eligible_endpoints: 0,
                attempts: Vec::new(),
                rpc_error_body: None,
            });
        }

        let mut attempts = Vec::with_capacity(eligible.len());
        let mut last: Option<AttemptOutcome> = None;

        for (position, &index) in eligible.iter().enumerate() {
            let endpoint = &self.endpoints.list()[index];
            let key = &self.keys[index];
            let has_next = position + 1 < eligible.len();

            let started = Instant::now();
            let sent = with_attempt_timeout(
                self.policy.attempt_timeout,
                self.transport.send(endpoint, request, self.policy.attempt_timeout),
            )
            .await;
            let outcome = match sent {
                Ok(response) => classify(response, shape),
                Err(e) => classify_transport(&e),
            };

            metrics::record_upstream_attempt(&self.service, key, outcome.label(), started.elapsed());
            attempts.push(AttemptRecord {
                endpoint: key.clone(),
                outcome: outcome.kind(),
            });

            if let AttemptOutcome::Success { status_code, body } = outcome {
                self.rotation.store(index, Ordering::Relaxed);
                if position > 0 {
                    tracing::info!(
                        service = %self.service,
                        endpoint = %key,
                        failed_before = position,
                        "Failover succeeded on alternate endpoint"
                    );
                }
                metrics::record_failover(&self.service, "ok");
                return Ok(UpstreamResponse {
                    status_code,
                    body,
                    endpoint: key.clone(),
                    attempts,
                });
            }

            tracing::warn!(
                service = %self.service,
                endpoint = %key,
                outcome = outcome.label(),
                error = %outcome.describe(),
                remaining = eligible.len() - position - 1,
                "Upstream attempt failed"
            );

            let fatal = match &outcome {
                AttemptOutcome::RateLimited { .. } => {
                    self.health.mark_rate_limited(key, self.policy.rate_limit_cooldown);
                    metrics::record_cooldown(&self.service, key);
                    false
                }
                AttemptOutcome::RpcApplicationError { error, .. } => {
                    self.policy.non_retryable_rpc_codes.contains(&error.code)
                }
                AttemptOutcome::TransportError { .. } => {
                    if has_next {
                        tokio::time::sleep(self.policy.transport_retry_delay).await;
                    }
                    false
                }
                _ => false,
            };

            last = Some(outcome);
            if fatal {
                tracing::debug!(service = %self.service, "RPC error is not retryable, stopping failover");
                break;
            }
        }

        metrics::record_failover(&self.service, "exhausted");
        Err(self.exhausted(last, attempts, total, eligible.len()))
    }

    fn exhausted(
        &self,
        last: Option<AttemptOutcome>,
        attempts: Vec<AttemptRecord>,
        total: usize,
        eligible: usize,
    ) -> FailoverFailure {
        let last_outcome = last.as_ref().map(AttemptOutcome::kind);
        let status_code = last.as_ref().and_then(AttemptOutcome::status_code);
        let detail = last
            .as_ref()
            .map(AttemptOutcome::describe)
            .unwrap_or_else(|| "no attempt made".to_string());

        let (rpc_error, rpc_error_body) = match last {
            Some(AttemptOutcome::RpcApplicationError { error, body, .. }) => (Some(error), Some(body)),
            _ => (None, None),
        };

        FailoverFailure {
            kind: FailureKind::Exhausted,
            status_code,
            message: format!("All {} endpoints failed: {}", self.service, detail),
            rpc_error,
            last_outcome,
            total_endpoints: total,
            eligible_endpoints: eligible,
            attempts,
            rpc_error_body,
        }
    }
}

impl<T> fmt::Debug for FailoverExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailoverExecutor")
            .field("service", &self.service)
            .field("endpoints", &self.endpoints.len())
            .field("rotation", &self.rotation.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::transport::{RawResponse, TransportError};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum Reply {
        Status(u16, &'static str),
        Hang,
        Refused,
    }

    /// Replays a script per endpoint; the last reply repeats.
    #[derive(Default)]
    struct ScriptedTransport {
        scripts: Mutex<HashMap<String, Vec<Reply>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn with(scripts: &[(&str, Vec<Reply>)]) -> Self {
            let transport = Self::default();
            {
                let mut map = transport.scripts.lock().unwrap();
                for (endpoint, replies) in scripts {
                    map.insert(endpoint.to_string(), replies.clone());
                }
            }
            transport
        }

        fn next_reply(&self, endpoint: &str) -> Reply {
            let mut map = self.scripts.lock().unwrap();
            let replies = map.get_mut(endpoint).expect("unscripted endpoint");
            if replies.len() > 1 {
                replies.remove(0)
            } else {
                replies[0].clone()
            }
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            endpoint: &str,
            _request: &OutboundRequest,
            _timeout: Duration,
        ) -> Result<RawResponse, TransportError> {
            self.calls.lock().unwrap().push(endpoint.to_string());
            match self.next_reply(endpoint) {
                Reply::Status(status, body) => Ok(RawResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(TransportError::Request("unreachable".into()))
                }
                Reply::Refused => Err(TransportError::Connect("connection refused".into())),
            }
        }
    }

    const A: &str = "https://a.example";
    const B: &str = "https://b.example";
    const C: &str = "https://c.example";

    fn executor(scripts: &[(&str, Vec<Reply>)]) -> FailoverExecutor<ScriptedTransport> {
        let endpoints = EndpointList::new(scripts.iter().map(|(e, _)| *e));
        FailoverExecutor::new(
            "solana_rpc",
            endpoints,
            FailoverPolicy::default(),
            ScriptedTransport::with(scripts),
        )
    }

    fn calls(exec: &FailoverExecutor<ScriptedTransport>) -> Vec<String> {
        exec.transport.calls.lock().unwrap().clone()
    }

    fn rpc_request() -> OutboundRequest {
        OutboundRequest::post_json("", br#"{"jsonrpc":"2.0","id":1,"method":"getSlot"}"#.to_vec())
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_short_circuits() {
        let exec = executor(&[
            (A, vec![Reply::Status(200, r#"{"result":1}"#)]),
            (B, vec![Reply::Status(200, r#"{"result":2}"#)]),
        ]);

        let ok = exec.execute(&rpc_request()).await.unwrap();
        assert_eq!(ok.status_code, 200);
        assert_eq!(ok.endpoint, "a.example");
        assert_eq!(calls(&exec), vec![A]);
        assert_eq!(exec.rotation_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_sticks_to_last_success() {
        let exec = executor(&[
            (A, vec![Reply::Status(500, "boom")]),
            (B, vec![Reply::Status(200, r#"{"result":"ok"}"#)]),
            (C, vec![Reply::Status(200, r#"{"result":"ok"}"#)]),
        ]);

        let first = exec.execute(&rpc_request()).await.unwrap();
        assert_eq!(first.endpoint, "b.example");
        assert_eq!(exec.rotation_index(), 1);

        exec.execute(&rpc_request()).await.unwrap();
        assert_eq!(calls(&exec), vec![A, B, B]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_wraps_around() {
        let exec = executor(&[
            (A, vec![Reply::Status(200, r#"{"result":"a"}"#)]),
            (B, vec![Reply::Status(500, ""), Reply::Status(200, r#"{"result":"b"}"#)]),
            (C, vec![Reply::Status(200, r#"{"result":"c"}"#), Reply::Status(502, "")]),
        ]);
        exec.rotation.store(1, Ordering::Relaxed);

        exec.execute(&rpc_request()).await.unwrap();
        assert_eq!(exec.rotation_index(), 2);

        let ok = exec.execute(&rpc_request()).await.unwrap();
        assert_eq!(ok.endpoint, "a.example");
        assert_eq!(calls(&exec), vec![B, C, C, A]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_endpoint_skipped_during_cooldown() {
        let exec = executor(&[
            (A, vec![Reply::Status(429, "slow down")]),
            (B, vec![Reply::Status(500, "")]),
        ]);

        let first = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(first.eligible_endpoints, 2);
        assert!(exec.health().is_rate_limited("a.example"));

        tokio::time::advance(Duration::from_secs(5)).await;
        let second = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(second.eligible_endpoints, 1);
        assert_eq!(calls(&exec), vec![A, B, B]);

        tokio::time::advance(Duration::from_millis(5_100)).await;
        exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(calls(&exec), vec![A, B, B, A, B]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_rate_limited_reports_429_then_short_circuits() {
        let exec = executor(&[
            (A, vec![Reply::Status(429, "")]),
            (B, vec![Reply::Status(429, "")]),
            (C, vec![Reply::Status(429, "")]),
        ]);

        let failure = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Exhausted);
        assert_eq!(failure.total_endpoints, 3);
        assert_eq!(failure.eligible_endpoints, 3);
        assert_eq!(failure.status_code, Some(429));
        assert_eq!(failure.http_status(), 429);
        assert_eq!(calls(&exec).len(), 3);

        let blocked = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(blocked.kind, FailureKind::AllEndpointsRateLimited);
        assert_eq!(blocked.eligible_endpoints, 0);
        assert_eq!(blocked.http_status(), 429);
        assert!(blocked.attempts.is_empty());
        assert_eq!(calls(&exec).len(), 3, "no request may be sent while all endpoints cool down");
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_server_errors_preserve_last_status() {
        let exec = executor(&[
            (A, vec![Reply::Status(500, "")]),
            (B, vec![Reply::Status(503, "")]),
        ]);

        let failure = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Exhausted);
        assert_eq!(failure.status_code, Some(503));
        assert_eq!(failure.last_outcome, Some(OutcomeKind::ServerError));
        assert_eq!(failure.http_status(), 503);
        assert_eq!(failure.total_endpoints, 2);
        assert!(failure.message.contains("503"));
        assert!(!exec.health().is_rate_limited("a.example"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rpc_application_error_retried_on_next_node() {
        let exec = executor(&[
            (A, vec![Reply::Status(200, r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"x"}}"#)]),
            (B, vec![Reply::Status(200, r#"{"jsonrpc":"2.0","id":1,"result":42}"#)]),
        ]);

        let ok = exec.execute(&rpc_request()).await.unwrap();
        assert_eq!(ok.endpoint, "b.example");
        assert_eq!(ok.attempts[0].outcome, OutcomeKind::RpcError);
        assert!(!exec.health().is_rate_limited("a.example"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rpc_error_on_last_candidate_is_surfaced() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32005,"message":"node is behind"}}"#;
        let exec = executor(&[(A, vec![Reply::Status(500, "")]), (B, vec![Reply::Status(200, body)])]);

        let failure = exec.execute(&rpc_request()).await.unwrap_err();
        let rpc_error = failure.rpc_error.clone().unwrap();
        assert_eq!(rpc_error.code, -32005);
        assert_eq!(failure.status_code, Some(200));
        assert_eq!(failure.http_status(), 502);
        assert_eq!(failure.rpc_error_body.as_deref(), Some(body.as_bytes()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_rpc_code_stops_failover() {
        let exec = executor(&[
            (A, vec![Reply::Status(200, r#"{"error":{"code":-32602,"message":"Invalid param"}}"#)]),
            (B, vec![Reply::Status(200, r#"{"result":1}"#)]),
        ]);

        let failure = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(failure.rpc_error.unwrap().code, -32602);
        assert_eq!(failure.eligible_endpoints, 2);
        assert_eq!(calls(&exec), vec![A]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_endpoint_is_skipped_without_cooldown() {
        let exec = executor(&[
            (A, vec![Reply::Status(403, "forbidden")]),
            (B, vec![Reply::Status(200, r#"{"pairs":[]}"#)]),
        ]);

        let ok = exec.execute(&OutboundRequest::get("/latest/dex/search")).await.unwrap();
        assert_eq!(ok.endpoint, "b.example");
        assert_eq!(ok.attempts[0].outcome, OutcomeKind::Blocked);
        assert!(!exec.health().is_rate_limited("a.example"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let exec = executor(&[
            (A, vec![Reply::Status(400, r#"{"message":"bad mint"}"#)]),
            (B, vec![Reply::Status(200, "{}")]),
        ]);

        let ok = exec.execute(&OutboundRequest::get("/tokens/xyz")).await.unwrap();
        assert_eq!(ok.status_code, 400);
        assert_eq!(calls(&exec), vec![A]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shape_mismatch_moves_on() {
        fn require_pairs(body: &[u8]) -> Result<(), String> {
            let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
            match value.get("pairs") {
                Some(serde_json::Value::Array(_)) => Ok(()),
                _ => Err("no pairs".into()),
            }
        }

        let exec = executor(&[
            (A, vec![Reply::Status(200, "<html>maintenance</html>")]),
            (B, vec![Reply::Status(200, r#"{"pairs":[{"pairAddress":"p"}]}"#)]),
        ]);

        let ok = exec
            .execute_checked(&OutboundRequest::get("/latest/dex/tokens/t"), Some(require_pairs))
            .await
            .unwrap();
        assert_eq!(ok.endpoint, "b.example");
        assert_eq!(ok.attempts[0].outcome, OutcomeKind::UnexpectedShape);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_pauses_before_next_candidate() {
        let exec = executor(&[(A, vec![Reply::Refused]), (B, vec![Reply::Status(200, r#"{"result":1}"#)])]);

        let started = Instant::now();
        exec.execute(&rpc_request()).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_TRANSPORT_RETRY_DELAY);
        assert!(elapsed < DEFAULT_TRANSPORT_RETRY_DELAY + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_after_last_candidate() {
        let exec = executor(&[(A, vec![Reply::Refused])]);

        let started = Instant::now();
        let failure = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(failure.status_code, None);
        assert_eq!(failure.last_outcome, Some(OutcomeKind::TransportError));
        assert_eq!(failure.http_status(), 503);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_then_balance_from_second_endpoint() {
        let exec = executor(&[
            ("https://e1", vec![Reply::Hang]),
            ("https://e2", vec![Reply::Status(200, r#"{"jsonrpc":"2.0","id":1,"result":12345}"#)]),
        ]);
        let request = OutboundRequest::post_json(
            "",
            br#"{"jsonrpc":"2.0","id":1,"method":"getBalance","params":["11111111111111111111111111111111"]}"#.to_vec(),
        );

        let started = Instant::now();
        let ok = exec.execute(&request).await.unwrap();

        assert_eq!(ok.status_code, 200);
        assert!(String::from_utf8_lossy(&ok.body).contains("\"result\":12345"));
        assert_eq!(
            ok.attempts,
            vec![
                AttemptRecord { endpoint: "e1".into(), outcome: OutcomeKind::TransportError },
                AttemptRecord { endpoint: "e2".into(), outcome: OutcomeKind::Success },
            ]
        );
        assert!(!exec.health().is_rate_limited("e1"));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(20) + DEFAULT_TRANSPORT_RETRY_DELAY);
        assert!(elapsed < Duration::from_secs(21));
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let exec = executor(&[]);
        let failure = exec.execute(&rpc_request()).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoEndpointsConfigured);
        assert_eq!(failure.http_status(), 503);
    }
}
