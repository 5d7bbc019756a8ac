//! Response classification.
//!
//! Every attempt ends in exactly one `AttemptOutcome`. Precedence:
//!
//! ```text
//! JSON body with `error: {..}`     → RpcApplicationError (any status, 200 included)
//! 403                              → Blocked
//! 429                              → RateLimited
//! 5xx                              → ServerError
//! 2xx failing the caller's shape   → UnexpectedShape
//! anything else                    → Success (status passed through)
//! no response at all               → TransportError
//! ```
//!
//! An error envelope wins over the status line: application errors are
//! retried on the next node but never start a cooldown. Only a bare 429
//! does.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::upstream::transport::{RawResponse, TransportError};

/// Validates that a 2xx body has the shape a caller expects.
pub type ShapeCheck = fn(&[u8]) -> Result<(), String>;

/// The `error` member of a JSON-RPC style envelope.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RpcErrorDetails {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcErrorDetails {
    /// Read an `error` object leniently. A non-integer `code` (REST upstreams
    /// send strings such as `"SERVER_ERROR"`) becomes 0 and the raw object is
    /// kept in `data`.
    fn from_object(object: Map<String, Value>) -> Self {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let code = object.get("code").and_then(Value::as_i64);
        let data = match (code, object.contains_key("code")) {
            (None, true) => Some(Value::Object(object)),
            _ => object.get("data").cloned(),
        };

        Self {
            code: code.unwrap_or_default(),
            message,
            data,
        }
    }
}

/// Only the member the classifier cares about; every other field is ignored.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    error: Option<Value>,
}

/// Result of a single attempt against a single endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success { status_code: u16, body: Vec<u8> },
    RpcApplicationError { status_code: u16, error: RpcErrorDetails, body: Vec<u8> },
    Blocked { status_code: u16 },
    RateLimited { status_code: u16 },
    ServerError { status_code: u16 },
    UnexpectedShape { status_code: u16, reason: String },
    TransportError { cause: String },
}

/// Discriminant of `AttemptOutcome`, kept after the payload is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    RpcError,
    Blocked,
    RateLimited,
    ServerError,
    UnexpectedShape,
    TransportError,
}

impl OutcomeKind {
    /// Metric/log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::RpcError => "rpc_error",
            OutcomeKind::Blocked => "blocked",
            OutcomeKind::RateLimited => "rate_limited",
            OutcomeKind::ServerError => "server_error",
            OutcomeKind::UnexpectedShape => "unexpected_shape",
            OutcomeKind::TransportError => "transport_error",
        }
    }
}

impl AttemptOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            AttemptOutcome::Success { .. } => OutcomeKind::Success,
            AttemptOutcome::RpcApplicationError { .. } => OutcomeKind::RpcError,
            AttemptOutcome::Blocked { .. } => OutcomeKind::Blocked,
            AttemptOutcome::RateLimited { .. } => OutcomeKind::RateLimited,
            AttemptOutcome::ServerError { .. } => OutcomeKind::ServerError,
            AttemptOutcome::UnexpectedShape { .. } => OutcomeKind::UnexpectedShape,
            AttemptOutcome::TransportError { .. } => OutcomeKind::TransportError,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().as_str()
    }

    /// HTTP status, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AttemptOutcome::Success { status_code, .. }
            | AttemptOutcome::RpcApplicationError { status_code, .. }
            | AttemptOutcome::Blocked { status_code }
            | AttemptOutcome::RateLimited { status_code }
            | AttemptOutcome::ServerError { status_code }
            | AttemptOutcome::UnexpectedShape { status_code, .. } => Some(*status_code),
            AttemptOutcome::TransportError { .. } => None,
        }
    }

    /// Human-readable failure description.
    pub fn describe(&self) -> String {
        match self {
            AttemptOutcome::Success { status_code, .. } => format!("HTTP {}", status_code),
            AttemptOutcome::RpcApplicationError { error, .. } => {
                format!("RPC error {}: {}", error.code, error.message)
            }
            AttemptOutcome::Blocked { status_code } => format!("HTTP {}: blocked by upstream", status_code),
            AttemptOutcome::RateLimited { status_code } => format!("HTTP {}: rate limited", status_code),
            AttemptOutcome::ServerError { status_code } => format!("HTTP {}: upstream server error", status_code),
            AttemptOutcome::UnexpectedShape { status_code, reason } => {
                format!("HTTP {}: unexpected response shape ({})", status_code, reason)
            }
            AttemptOutcome::TransportError { cause } => cause.clone(),
        }
    }
}

/// Extract a JSON-RPC error object from a body, if it has one.
pub fn rpc_error(body: &[u8]) -> Option<RpcErrorDetails> {
    match serde_json::from_slice::<RpcEnvelope>(body).ok()?.error? {
        Value::Object(object) => Some(RpcErrorDetails::from_object(object)),
        _ => None,
    }
}

/// Grade a received response.
pub fn classify(response: RawResponse, shape: Option<ShapeCheck>) -> AttemptOutcome {
    let RawResponse { status, body } = response;

    if let Some(error) = rpc_error(&body) {
        return AttemptOutcome::RpcApplicationError {
            status_code: status,
            error,
            body,
        };
    }

    match status {
        403 => return AttemptOutcome::Blocked { status_code: status },
        429 => return AttemptOutcome::RateLimited { status_code: status },
        500..=599 => return AttemptOutcome::ServerError { status_code: status },
        _ => {}
    }

    if (200..300).contains(&status) {
        if let Some(check) = shape {
            if let Err(reason) = check(&body) {
                return AttemptOutcome::UnexpectedShape {
                    status_code: status,
                    reason,
                };
            }
        }
    }

    AttemptOutcome::Success {
        status_code: status,
        body,
    }
}

/// Grade an attempt that never produced a response.
pub fn classify_transport(error: &TransportError) -> AttemptOutcome {
    AttemptOutcome::TransportError {
        cause: error.to_string(),
    }
}
