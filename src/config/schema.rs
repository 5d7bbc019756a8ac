//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.
//!
//! An `[upstreams.<service>]` table replaces that service's built-in section
//! as a whole; fields it leaves out take the generic `UpstreamConfig`
//! defaults, not the service-specific ones. Loading warns when such a
//! table drops a built-in endpoint source.

use serde::{Deserialize, Serialize};

use crate::upstream::executor::DEFAULT_NON_RETRYABLE_RPC_CODES;

/// Root configuration for the wallet gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream endpoint sources and failover tuning, per service.
    pub upstreams: UpstreamsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on one inbound request, failover included, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// A named provider whose URL (or API key) comes from the environment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProviderSource {
    /// Environment variable holding the URL or key.
    pub env: String,

    /// URL template; `{}` is replaced by the variable's value.
    #[serde(default)]
    pub template: Option<String>,
}

impl ProviderSource {
    fn url(env: &str) -> Self {
        Self {
            env: env.to_string(),
            template: None,
        }
    }

    fn keyed(env: &str, template: &str) -> Self {
        Self {
            env: env.to_string(),
            template: Some(template.to_string()),
        }
    }
}

/// Endpoint sources and failover settings for one logical upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Variable whose value, when set, is tried first.
    pub env_override: Option<String>,

    /// Named providers, tried after the override.
    pub providers: Vec<ProviderSource>,

    /// Public endpoints, tried last.
    pub fallbacks: Vec<String>,

    /// Deadline for a single attempt in milliseconds.
    pub attempt_timeout_ms: u64,

    /// Base cooldown after a 429 in milliseconds.
    pub rate_limit_cooldown_ms: u64,

    /// Pause after a transport failure before the next candidate.
    pub transport_retry_delay_ms: u64,

    /// JSON-RPC error codes that stop failover immediately.
    pub non_retryable_rpc_codes: Vec<i64>,

    /// Variable holding an API key sent as `api_key_header`.
    pub api_key_env: Option<String>,

    /// Header carrying the API key (default "x-api-key").
    pub api_key_header: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            env_override: None,
            providers: Vec::new(),
            fallbacks: Vec::new(),
            attempt_timeout_ms: 20_000,
            rate_limit_cooldown_ms: 10_000,
            transport_retry_delay_ms: 400,
            non_retryable_rpc_codes: DEFAULT_NON_RETRYABLE_RPC_CODES.to_vec(),
            api_key_env: None,
            api_key_header: None,
        }
    }
}

impl UpstreamConfig {
    pub fn solana_rpc() -> Self {
        Self {
            env_override: Some("SOLANA_RPC_URL".to_string()),
            providers: vec![
                ProviderSource::keyed("HELIUS_API_KEY", "https://mainnet.helius-rpc.com/?api-key={}"),
                ProviderSource::url("QUICKNODE_RPC_URL"),
                ProviderSource::keyed("ALCHEMY_API_KEY", "https://solana-mainnet.g.alchemy.com/v2/{}"),
            ],
            fallbacks: vec![
                "https://api.mainnet-beta.solana.com".to_string(),
                "https://solana-rpc.publicnode.com".to_string(),
                "https://rpc.ankr.com/solana".to_string(),
            ],
            ..Self::default()
        }
    }

    pub fn dexscreener() -> Self {
        Self {
            env_override: Some("DEXSCREENER_API_URL".to_string()),
            fallbacks: vec!["https://api.dexscreener.com".to_string()],
            ..Self::default()
        }
    }

    pub fn jupiter() -> Self {
        Self {
            env_override: Some("JUPITER_API_URL".to_string()),
            fallbacks: vec![
                "https://lite-api.jup.ag".to_string(),
                "https://api.jup.ag".to_string(),
            ],
            attempt_timeout_ms: 15_000,
            api_key_env: Some("JUPITER_API_KEY".to_string()),
            ..Self::default()
        }
    }

    pub fn pump() -> Self {
        Self {
            env_override: Some("PUMP_API_URL".to_string()),
            fallbacks: vec![
                "https://frontend-api-v3.pump.fun".to_string(),
                "https://frontend-api.pump.fun".to_string(),
            ],
            attempt_timeout_ms: 15_000,
            ..Self::default()
        }
    }

    /// Header name for the API key, if one is configured.
    pub fn api_key_header_name(&self) -> &str {
        self.api_key_header.as_deref().unwrap_or("x-api-key")
    }
}

/// Upstream services known to the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    #[serde(default = "UpstreamConfig::solana_rpc")]
    pub solana_rpc: UpstreamConfig,

    #[serde(default = "UpstreamConfig::dexscreener")]
    pub dexscreener: UpstreamConfig,

    #[serde(default = "UpstreamConfig::jupiter")]
    pub jupiter: UpstreamConfig,

    #[serde(default = "UpstreamConfig::pump")]
    pub pump: UpstreamConfig,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            solana_rpc: UpstreamConfig::solana_rpc(),
            dexscreener: UpstreamConfig::dexscreener(),
            jupiter: UpstreamConfig::jupiter(),
            pump: UpstreamConfig::pump(),
        }
    }
}

impl UpstreamsConfig {
    /// Sections paired with their service names.
    pub fn iter(&self) -> [(&'static str, &UpstreamConfig); 4] {
        [
            ("solana_rpc", &self.solana_rpc),
            ("dexscreener", &self.dexscreener),
            ("jupiter", &self.jupiter),
            ("pump", &self.pump),
        ]
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable `/admin` routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

/// Placeholder admin key; rejected by validation when admin is enabled.
pub const ADMIN_KEY_PLACEHOLDER: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: ADMIN_KEY_PLACEHOLDER.to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Origins allowed by CORS. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
            cors_allowed_origins: Vec::new(),
        }
    }
}
