//! Outbound HTTP transport.
//!
//! The executor talks to upstreams through the `Transport` trait so the
//! failover logic can be driven by a scripted transport in tests. The
//! production implementation wraps a shared `reqwest::Client`.

use reqwest::Method;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors raised before a response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Description of one logical outbound call, independent of the endpoint.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Appended to the endpoint base URL. Empty for JSON-RPC.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST with a JSON body.
    pub fn post_json(path: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            headers: vec![("content-type".into(), "application/json".into())],
            body: Some(body),
        }
    }

    /// Append a URL-encoded query parameter to the path.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        let sep = if self.path.contains('?') { '&' } else { '?' };
        let encoded: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(key, value)
            .finish();
        self.path.push(sep);
        self.path.push_str(&encoded);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Full URL for a given endpoint base.
    pub fn url_for(&self, endpoint: &str) -> String {
        if self.path.is_empty() {
            endpoint.to_string()
        } else if self.path.starts_with('/') || self.path.starts_with('?') {
            format!("{}{}", endpoint, self.path)
        } else {
            format!("{}/{}", endpoint, self.path)
        }
    }
}

/// Status and body of a completed upstream exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Something that can carry an `OutboundRequest` to an endpoint.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        endpoint: &str,
        request: &OutboundRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport shared by all services.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wallet-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        endpoint: &str,
        request: &OutboundRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url_for(endpoint))
            .timeout(timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::from(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout)
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
