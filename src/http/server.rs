//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, limits, CORS, headers)
//! - Bind server to listener and drain on shutdown

use axum::{
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::admin::setup_admin_router;
use crate::config::GatewayConfig;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer, track_metrics};
use crate::http::{proxy, stores};
use crate::security::headers::{cors_layer, with_security_headers};
use crate::security::limits::{body_limit_layer, timeout_layer};
use crate::services::Services;
use crate::stores::Stores;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub services: Services,
    pub stores: Stores,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: GatewayConfig, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            services,
            stores: Stores::new(),
            started_at: Instant::now(),
        }
    }
}

/// HTTP server for the wallet gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Run until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/rpc", post(proxy::rpc))
        .route("/api/balance/{address}", get(proxy::balance))
        .route("/api/dexscreener/tokens/{address}", get(proxy::dex_tokens))
        .route("/api/dexscreener/search", get(proxy::dex_search))
        .route("/api/jupiter/price", get(proxy::jupiter_price))
        .route("/api/pump/{*path}", get(proxy::pump_proxy))
        .route("/api/orders", post(stores::create_order).get(stores::list_orders))
        .route("/api/orders/{id}", get(stores::get_order))
        .route("/api/orders/{id}/status", patch(stores::update_order_status))
        .route("/api/escrow", post(stores::create_escrow).get(stores::list_escrows))
        .route("/api/escrow/{id}", get(stores::get_escrow))
        .route("/api/escrow/{id}/status", patch(stores::update_escrow_status))
        .route("/api/stakes", post(stores::create_stake).get(stores::list_stakes))
        .route("/api/stakes/{id}", get(stores::get_stake))
        .route("/api/stakes/{id}/status", patch(stores::update_stake_status))
        .route(
            "/api/payment-methods",
            post(stores::create_payment_method).get(stores::list_payment_methods),
        )
        .route(
            "/api/payment-methods/{id}",
            get(stores::get_payment_method).delete(stores::delete_payment_method),
        )
        .route("/health", get(health))
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let mut router = api_routes()
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state.clone());

    if config.admin.enabled {
        router = router.merge(setup_admin_router(state));
    }

    let router = router
        .layer(body_limit_layer(&config.security))
        .layer(timeout_layer(&config.timeouts))
        .layer(cors_layer(&config.security));

    let router = if config.security.enable_headers {
        with_security_headers(router)
    } else {
        router
    };

    router
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(set_request_id_layer())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
