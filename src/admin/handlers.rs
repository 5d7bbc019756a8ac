use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::upstream::health::HealthSnapshot;

#[derive(Serialize)]
pub struct StoreCounts {
    pub orders: usize,
    pub escrows: usize,
    pub stakes: usize,
    pub payment_methods: usize,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub stores: StoreCounts,
}

#[derive(Serialize)]
pub struct UpstreamStatus {
    pub service: String,
    /// Hostnames only; provider URLs may embed API keys.
    pub endpoints: Vec<String>,
    pub rotation_index: usize,
    pub preferred: Option<String>,
    pub attempt_timeout_ms: u64,
    pub rate_limit_cooldown_ms: u64,
    pub cooldowns: Vec<HealthSnapshot>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let stores = &state.stores;
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        stores: StoreCounts {
            orders: stores.orders.len(),
            escrows: stores.escrows.len(),
            stakes: stores.stakes.len(),
            payment_methods: stores.payment_methods.len(),
        },
    })
}

pub async fn get_upstreams(State(state): State<AppState>) -> Json<Vec<UpstreamStatus>> {
    let statuses = state
        .services
        .executors()
        .iter()
        .map(|executor| {
            let keys = executor.endpoint_keys();
            let rotation_index = executor.rotation_index();
            UpstreamStatus {
                service: executor.service().to_string(),
                endpoints: keys.to_vec(),
                rotation_index,
                preferred: keys.get(rotation_index).cloned(),
                attempt_timeout_ms: executor.policy().attempt_timeout.as_millis() as u64,
                rate_limit_cooldown_ms: executor.policy().rate_limit_cooldown.as_millis() as u64,
                cooldowns: executor.health().snapshot(),
            }
        })
        .collect();

    Json(statuses)
}
