//! Startup orchestration.
//!
//! Subsystems initialize in order, not concurrently. The listener is bound
//! by the caller after the state is ready.

use thiserror::Error;

use crate::config::{ConfigError, GatewayConfig};
use crate::http::server::AppState;
use crate::services::Services;
use crate::upstream::{ReqwestTransport, TransportError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Build handler state, reading endpoint variables from the process environment.
pub fn build_state(config: GatewayConfig) -> Result<AppState, StartupError> {
    build_state_with_env(config, |key| std::env::var(key).ok())
}

/// Build handler state with an explicit variable lookup.
pub fn build_state_with_env<F>(config: GatewayConfig, env: F) -> Result<AppState, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let transport = ReqwestTransport::new()?;
    Ok(build_state_with(config, transport, env))
}

/// Build handler state over an existing transport.
pub fn build_state_with<F>(config: GatewayConfig, transport: ReqwestTransport, env: F) -> AppState
where
    F: Fn(&str) -> Option<String>,
{
    let services = Services::from_config(&config.upstreams, transport, env);
    tracing::info!("Upstream services ready");
    AppState::new(config, services)
}
