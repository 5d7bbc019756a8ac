//! Upstream-backed routes.

use axum::{
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;

use crate::http::response::{json_body, upstream_response, ApiError};
use crate::http::server::AppState;
use crate::services::jupiter::{parse_ids, MAX_PRICE_IDS};
use crate::services::pump;
use crate::services::solana::{is_valid_address, parse_balance, Balance, JsonRpcRequest};
use crate::upstream::FailoverResult;

/// Most token addresses DexScreener accepts in one lookup.
const MAX_TOKEN_ADDRESSES: usize = 30;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    pub ids: Option<String>,
}

fn require_param<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(format!("missing required query parameter '{}'", name))),
    }
}

fn require_addresses(ids: &[&str], max: usize) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Err(ApiError::BadRequest("at least one address is required".to_string()));
    }
    if ids.len() > max {
        return Err(ApiError::BadRequest(format!("at most {} addresses per request", max)));
    }
    match ids.iter().find(|id| !is_valid_address(id)) {
        Some(bad) => Err(ApiError::BadRequest(format!("'{}' is not a valid Solana address", bad))),
        None => Ok(()),
    }
}

/// Run a failover sequence on its own task. A client that disconnects, or
/// the inbound deadline, then cannot cut it short between an attempt and
/// its health bookkeeping.
async fn detached<F>(sequence: F) -> Result<FailoverResult, ApiError>
where
    F: Future<Output = FailoverResult> + Send + 'static,
{
    tokio::spawn(sequence)
        .await
        .map_err(|e| ApiError::Internal(format!("failover task failed: {}", e)))
}

/// POST /api/rpc
///
/// A JSON-RPC error that survives failover is handed back as the node sent
/// it, so wallet RPC clients see a normal error envelope.
pub async fn rpc(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: JsonRpcRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON-RPC request: {}", e)))?;
    request.validate().map_err(ApiError::BadRequest)?;

    tracing::debug!(method = %request.method, "Forwarding JSON-RPC call");
    let solana = Arc::clone(&state.services.solana);
    match detached(async move { solana.call(&request).await }).await? {
        Ok(upstream) => Ok(upstream_response(upstream)),
        Err(mut failure) => match failure.rpc_error_body.take() {
            Some(envelope) => Ok(json_body(failure.status_code.unwrap_or(200), envelope)),
            None => Err(failure.into()),
        },
    }
}

/// GET /api/balance/{address}
pub async fn balance(State(state): State<AppState>, Path(address): Path<String>) -> Result<Response, ApiError> {
    if !is_valid_address(&address) {
        return Err(ApiError::BadRequest(format!("'{}' is not a valid Solana address", address)));
    }

    let solana = Arc::clone(&state.services.solana);
    let lookup = address.clone();
    let upstream = detached(async move { solana.get_balance(&lookup).await }).await??;
    if !(200..300).contains(&upstream.status_code) {
        return Ok(upstream_response(upstream));
    }

    let lamports = parse_balance(&upstream.body).map_err(ApiError::BadGateway)?;
    Ok(Json(Balance::new(address, lamports)).into_response())
}

/// GET /api/dexscreener/tokens/{address}
pub async fn dex_tokens(State(state): State<AppState>, Path(address): Path<String>) -> Result<Response, ApiError> {
    let ids: Vec<&str> = address.split(',').map(str::trim).filter(|a| !a.is_empty()).collect();
    require_addresses(&ids, MAX_TOKEN_ADDRESSES)?;

    let dexscreener = Arc::clone(&state.services.dexscreener);
    let joined = ids.join(",");
    let upstream = detached(async move { dexscreener.token_pairs(&joined).await }).await??;
    Ok(upstream_response(upstream))
}

/// GET /api/dexscreener/search?q=
pub async fn dex_search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Response, ApiError> {
    let query = require_param("q", &params.q)?;
    let dexscreener = Arc::clone(&state.services.dexscreener);
    let query = query.to_string();
    let upstream = detached(async move { dexscreener.search(&query).await }).await??;
    Ok(upstream_response(upstream))
}

/// GET /api/jupiter/price?ids=
pub async fn jupiter_price(State(state): State<AppState>, Query(params): Query<PriceParams>) -> Result<Response, ApiError> {
    let raw = require_param("ids", &params.ids)?;
    let ids = parse_ids(raw);
    require_addresses(&ids, MAX_PRICE_IDS)?;

    let jupiter = Arc::clone(&state.services.jupiter);
    let ids: Vec<String> = ids.into_iter().map(str::to_string).collect();
    let upstream = detached(async move {
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        jupiter.prices(&ids).await
    })
    .await??;
    Ok(upstream_response(upstream))
}

/// GET /api/pump/{*path}
pub async fn pump_proxy(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let upstream_path = pump::upstream_path(&path, query.as_deref()).map_err(ApiError::BadRequest)?;
    let service = Arc::clone(&state.services.pump);
    let upstream = detached(async move { service.get(&upstream_path).await }).await??;
    Ok(upstream_response(upstream))
}
