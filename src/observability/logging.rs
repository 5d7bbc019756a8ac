//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level is used, either
//! as a bare level ("debug") or as a full filter directive.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;

fn default_directive(level: &str) -> String {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => {
            format!("wallet_gateway={level},tower_http={level},warn")
        }
        other => other.to_string(),
    }
}

/// Build the filter the subscriber will use.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.log_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. A second call is ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let installed = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
