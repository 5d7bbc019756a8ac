//! Shared utilities for integration tests.
//!
//! Mock upstreams are raw TCP listeners speaking just enough HTTP/1.1 to
//! answer one request per connection. Each records what it received.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wallet_gateway::config::schema::UpstreamConfig;
use wallet_gateway::lifecycle::{build_state_with, Shutdown};
use wallet_gateway::upstream::ReqwestTransport;
use wallet_gateway::{GatewayConfig, HttpServer};

/// What a mock backend saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Scripted reply. `delay` is applied before anything is written.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn hang(delay: Duration) -> Self {
        Self {
            status: 200,
            body: "{}".into(),
            delay,
        }
    }
}

#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let backend = MockBackend {
        addr: listener.local_addr().unwrap(),
        hits: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let f = Arc::new(f);
    let state = backend.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let state = state.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                state.hits.fetch_add(1, Ordering::SeqCst);
                state.requests.lock().unwrap().push(request.clone());

                let reply = f(request).await;
                tokio::time::sleep(reply.delay).await;

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.status,
                    status_text(reply.status),
                    reply.body.len(),
                    reply.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    backend
}

/// Start a mock backend that always gives the same answer.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockBackend {
    start_programmable_backend(move |_| async move { Reply::json(status, body) }).await
}

/// A URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Upstream section that only uses the given URLs, with test-sized timings.
pub fn upstream(urls: Vec<String>) -> UpstreamConfig {
    UpstreamConfig {
        env_override: None,
        providers: Vec::new(),
        fallbacks: urls,
        attempt_timeout_ms: 500,
        rate_limit_cooldown_ms: 10_000,
        transport_retry_delay_ms: 50,
        ..UpstreamConfig::default()
    }
}

/// Gateway config with every upstream pointed at the given lists.
pub fn gateway_config(
    solana_rpc: Vec<String>,
    dexscreener: Vec<String>,
    jupiter: Vec<String>,
    pump: Vec<String>,
) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;
    config.upstreams.solana_rpc = upstream(solana_rpc);
    config.upstreams.dexscreener = upstream(dexscreener);
    config.upstreams.jupiter = upstream(jupiter);
    config.upstreams.pump = upstream(pump);
    config
}

pub struct RunningGateway {
    pub url: String,
    pub shutdown: Shutdown,
}

impl Drop for RunningGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the full gateway on an ephemeral port. The process environment
/// is never consulted.
pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let state = build_state_with(config, transport(), |_| None);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(state);
    let stop = shutdown.wait();
    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    RunningGateway {
        url: format!("http://{}", addr),
        shutdown,
    }
}

/// Transport that ignores any proxy configured in the environment.
pub fn transport() -> ReqwestTransport {
    ReqwestTransport::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
