//! Upstream service adapters.
//!
//! Each adapter owns the failover executor for one logical upstream and
//! knows how to phrase that upstream's requests and recognize its
//! responses. Handlers never build URLs themselves.

pub mod dexscreener;
pub mod jupiter;
pub mod pump;
pub mod solana;

use std::sync::Arc;

use crate::config::schema::{UpstreamConfig, UpstreamsConfig};
use crate::upstream::{EndpointList, FailoverExecutor, FailoverPolicy, ReqwestTransport};

pub use dexscreener::DexScreener;
pub use jupiter::Jupiter;
pub use pump::Pump;
pub use solana::SolanaRpc;

/// Executor type used by every production adapter.
pub type Upstream = FailoverExecutor<ReqwestTransport>;

/// All upstream adapters, cheap to clone into handler state.
#[derive(Debug, Clone)]
pub struct Services {
    pub solana: Arc<SolanaRpc>,
    pub dexscreener: Arc<DexScreener>,
    pub jupiter: Arc<Jupiter>,
    pub pump: Arc<Pump>,
}

impl Services {
    /// Build every adapter, resolving endpoint variables through `env`.
    pub fn from_config<F>(config: &UpstreamsConfig, transport: ReqwestTransport, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = config
            .jupiter
            .api_key_env
            .as_deref()
            .and_then(|var| env(var))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|key| (config.jupiter.api_key_header_name().to_string(), key));

        Self {
            solana: Arc::new(SolanaRpc::new(build_executor(
                "solana_rpc",
                &config.solana_rpc,
                transport.clone(),
                &env,
            ))),
            dexscreener: Arc::new(DexScreener::new(build_executor(
                "dexscreener",
                &config.dexscreener,
                transport.clone(),
                &env,
            ))),
            jupiter: Arc::new(Jupiter::new(
                build_executor("jupiter", &config.jupiter, transport.clone(), &env),
                api_key,
            )),
            pump: Arc::new(Pump::new(build_executor("pump", &config.pump, transport, &env))),
        }
    }

    /// Executors in a fixed order, for the admin surface.
    pub fn executors(&self) -> [&Upstream; 4] {
        [
            self.solana.executor(),
            self.dexscreener.executor(),
            self.jupiter.executor(),
            self.pump.executor(),
        ]
    }
}

fn build_executor<F>(service: &str, config: &UpstreamConfig, transport: ReqwestTransport, env: &F) -> Upstream
where
    F: Fn(&str) -> Option<String>,
{
    let endpoints = EndpointList::from_config(config, env);
    let executor = FailoverExecutor::new(service, endpoints, FailoverPolicy::from_config(config), transport);

    if executor.endpoints().is_empty() {
        tracing::warn!(service, "No endpoints resolved; every call will fail");
    } else {
        tracing::info!(
            service,
            endpoints = ?executor.endpoint_keys(),
            attempt_timeout_ms = config.attempt_timeout_ms,
            "Upstream registered"
        );
    }
    executor
}
