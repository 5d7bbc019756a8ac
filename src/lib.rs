//! Wallet backend gateway: multi-endpoint upstream proxy with health-aware
//! failover for Solana JSON-RPC, DexScreener, Jupiter and pump-style APIs,
//! plus the in-memory stores behind the wallet's trading screens.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod services;
pub mod stores;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
