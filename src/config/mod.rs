//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (dotenvy, optional)
//!     → config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → startup builds one endpoint list per upstream from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; endpoint lists are fixed for the process lifetime
//! - All fields have defaults so the gateway runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::UpstreamConfig;
