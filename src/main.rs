//! Wallet Gateway
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!   Wallet client        │                 WALLET GATEWAY               │
//!   ─────────────────────┼─▶ http (axum) ──▶ services ──▶ upstream      │
//!                        │    │                           executor ─────┼──▶ RPC node 1..n
//!                        │    └─▶ stores (in-memory)        │  ▲        │    DexScreener
//!                        │                                  ▼  │        │    Jupiter
//!                        │                          health tracker      │    pump API
//!                        │                                              │
//!                        │  config · observability · security · admin   │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use wallet_gateway::config::loader::resolve_config;
use wallet_gateway::lifecycle::{build_state, signals, startup::StartupError, Shutdown};
use wallet_gateway::observability::{logging, metrics};
use wallet_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "wallet-gateway", version, about = "Failover gateway for wallet upstream APIs")]
struct Args {
    /// TOML configuration file (falls back to GATEWAY_CONFIG, then defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    let config = resolve_config(args.config.as_deref()).map_err(StartupError::from)?;
    logging::init_logging(&config.observability);

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        admin_enabled = config.admin.enabled,
        "wallet-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr).map_err(StartupError::from)?;
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let state = build_state(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        on_signal.trigger();
    });

    HttpServer::new(state).run(listener, shutdown.wait()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
