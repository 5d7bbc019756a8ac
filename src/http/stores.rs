//! CRUD routes over the in-memory stores.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::stores::{
    Escrow, EscrowStatus, NewEscrow, NewOrder, NewPaymentMethod, NewStake, Order, OrderStatus, PaymentMethod,
    Stake, StakeStatus, StoreError,
};

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

#[derive(Debug, Deserialize)]
pub struct WalletFilter {
    pub wallet: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerFilter {
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

fn id_from(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    let Path(id) = path?;
    Ok(id)
}

// Orders

pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Created<Order> {
    let Json(input) = payload?;
    if let Some(method_id) = input.payment_method_id {
        state.stores.payment_methods.get(method_id).map_err(|_| {
            StoreError::Invalid(format!("payment method {} does not exist", method_id))
        })?;
    }

    let order = state.stores.orders.insert(input.into_record()?)?;
    tracing::info!(order_id = %order.id, side = ?order.side, token = %order.token, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(State(state): State<AppState>, Query(filter): Query<WalletFilter>) -> Json<Vec<Order>> {
    Json(state.stores.orders.list(|o| filter.wallet.as_deref().map_or(true, |w| o.wallet == w)))
}

pub async fn get_order(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Order> {
    Ok(Json(state.stores.orders.get(id_from(path)?)?))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdate<OrderStatus>>, JsonRejection>,
) -> ApiResult<Order> {
    let id = id_from(path)?;
    let Json(update) = payload?;
    let order = state.stores.orders.update(id, |o| o.set_status(update.status))?;
    tracing::info!(order_id = %id, status = ?order.status, "Order status changed");
    Ok(Json(order))
}

// Escrow

pub async fn create_escrow(
    State(state): State<AppState>,
    payload: Result<Json<NewEscrow>, JsonRejection>,
) -> Created<Escrow> {
    let Json(input) = payload?;
    state
        .stores
        .orders
        .get(input.order_id)
        .map_err(|_| StoreError::Invalid(format!("order {} does not exist", input.order_id)))?;

    let escrow = state.stores.escrows.insert(input.into_record()?)?;
    tracing::info!(escrow_id = %escrow.id, order_id = %escrow.order_id, "Escrow locked");
    Ok((StatusCode::CREATED, Json(escrow)))
}

pub async fn list_escrows(State(state): State<AppState>, Query(filter): Query<WalletFilter>) -> Json<Vec<Escrow>> {
    Json(state.stores.escrows.list(|e| filter.wallet.as_deref().map_or(true, |w| e.involves(w))))
}

pub async fn get_escrow(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Escrow> {
    Ok(Json(state.stores.escrows.get(id_from(path)?)?))
}

pub async fn update_escrow_status(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdate<EscrowStatus>>, JsonRejection>,
) -> ApiResult<Escrow> {
    let id = id_from(path)?;
    let Json(update) = payload?;
    let escrow = state.stores.escrows.update(id, |e| e.set_status(update.status))?;
    tracing::info!(escrow_id = %id, status = ?escrow.status, "Escrow status changed");
    Ok(Json(escrow))
}

// Stakes

pub async fn create_stake(
    State(state): State<AppState>,
    payload: Result<Json<NewStake>, JsonRejection>,
) -> Created<Stake> {
    let Json(input) = payload?;
    let stake = state.stores.stakes.insert(input.into_record()?)?;
    tracing::info!(stake_id = %stake.id, amount = stake.amount, "Stake recorded");
    Ok((StatusCode::CREATED, Json(stake)))
}

pub async fn list_stakes(State(state): State<AppState>, Query(filter): Query<WalletFilter>) -> Json<Vec<Stake>> {
    Json(state.stores.stakes.list(|s| filter.wallet.as_deref().map_or(true, |w| s.wallet == w)))
}

pub async fn get_stake(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Stake> {
    Ok(Json(state.stores.stakes.get(id_from(path)?)?))
}

pub async fn update_stake_status(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StatusUpdate<StakeStatus>>, JsonRejection>,
) -> ApiResult<Stake> {
    let id = id_from(path)?;
    let Json(update) = payload?;
    Ok(Json(state.stores.stakes.update(id, |s| s.set_status(update.status))?))
}

// Payment methods

pub async fn create_payment_method(
    State(state): State<AppState>,
    payload: Result<Json<NewPaymentMethod>, JsonRejection>,
) -> Created<PaymentMethod> {
    let Json(input) = payload?;
    let method = state.stores.payment_methods.insert(input.into_record()?)?;
    Ok((StatusCode::CREATED, Json(method)))
}

pub async fn list_payment_methods(
    State(state): State<AppState>,
    Query(filter): Query<OwnerFilter>,
) -> Json<Vec<PaymentMethod>> {
    Json(
        state
            .stores
            .payment_methods
            .list(|m| filter.owner.as_deref().map_or(true, |o| m.owner == o)),
    )
}

pub async fn get_payment_method(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<PaymentMethod> {
    Ok(Json(state.stores.payment_methods.get(id_from(path)?)?))
}

pub async fn delete_payment_method(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = id_from(path)?;
    state.stores.payment_methods.remove(id)?;
    tracing::info!(payment_method_id = %id, "Payment method removed");
    Ok(StatusCode::NO_CONTENT)
}
