//! Request limits.
//!
//! Oversized bodies get 413 before any handler runs. The inbound deadline
//! bounds only what the client waits for: proxy handlers run failover on a
//! detached task, which finishes its attempts even after the deadline fires.

use axum::http::StatusCode;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::schema::{SecurityConfig, TimeoutConfig};

pub fn body_limit_layer(config: &SecurityConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_size)
}

pub fn timeout_layer(config: &TimeoutConfig) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, Duration::from_secs(config.request_secs))
}
