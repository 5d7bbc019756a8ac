//! Response shaping and error mapping.
//!
//! Upstream bodies are passed through untouched with the upstream status.
//! Everything the gateway itself rejects is rendered as
//! `{"error": "<code>", "message": "..."}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::stores::StoreError;
use crate::upstream::{FailoverFailure, FailureKind, UpstreamResponse};

/// Header naming the upstream host that produced a proxied body.
pub const X_UPSTREAM_ENDPOINT: &str = "x-upstream-endpoint";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Upstream(#[from] FailoverFailure),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(failure) => {
                StatusCode::from_u16(failure.http_status()).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
            }
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Store(StoreError::NotFound(_)) => "not_found",
            ApiError::Store(StoreError::Conflict(_)) => "conflict",
            ApiError::Store(StoreError::InvalidTransition { .. }) => "invalid_transition",
            ApiError::Store(StoreError::Invalid(_)) => "invalid_record",
            ApiError::Upstream(failure) => match failure.kind {
                FailureKind::AllEndpointsRateLimited => "upstream_rate_limited",
                FailureKind::Exhausted => "upstream_unavailable",
                FailureKind::NoEndpointsConfigured => "upstream_not_configured",
            },
            ApiError::BadGateway(_) => "bad_upstream_response",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Upstream(failure) => json!({
                "error": self.code(),
                "message": failure.message,
                "upstreamStatus": failure.status_code,
                "rpcError": failure.rpc_error,
                "lastOutcome": failure.last_outcome,
                "totalEndpoints": failure.total_endpoints,
                "eligibleEndpoints": failure.eligible_endpoints,
                "attempts": failure.attempts,
            }),
            other => json!({
                "error": other.code(),
                "message": other.to_string(),
            }),
        };

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// Raw JSON body with the given status.
pub fn json_body(status: u16, body: Vec<u8>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

/// Pass an upstream answer through to the client.
pub fn upstream_response(upstream: UpstreamResponse) -> Response {
    let mut response = json_body(upstream.status_code, upstream.body);
    if let Ok(value) = HeaderValue::from_str(&upstream.endpoint) {
        response.headers_mut().insert(X_UPSTREAM_ENDPOINT, value);
    }
    response
}
