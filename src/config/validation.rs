//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check endpoint sources are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Overridden upstream sections that drop built-in sources produce
//!   warnings, not errors

use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::{GatewayConfig, UpstreamConfig, UpstreamsConfig, ADMIN_KEY_PLACEHOLDER};

const MAX_TRANSPORT_RETRY_DELAY_MS: u64 = 5_000;

/// A single semantic problem, tagged with the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled && (config.admin.api_key.is_empty() || config.admin.api_key == ADMIN_KEY_PLACEHOLDER) {
        errors.push(ValidationError::new(
            "admin.api_key",
            "must be set to a real secret when admin is enabled",
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    for (service, upstream) in config.upstreams.iter() {
        validate_upstream(service, upstream, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream(service: &str, upstream: &UpstreamConfig, errors: &mut Vec<ValidationError>) {
    let field = |name: &str| format!("upstreams.{}.{}", service, name);

    if upstream.attempt_timeout_ms == 0 {
        errors.push(ValidationError::new(field("attempt_timeout_ms"), "must be greater than 0"));
    }
    if upstream.rate_limit_cooldown_ms == 0 {
        errors.push(ValidationError::new(field("rate_limit_cooldown_ms"), "must be greater than 0"));
    }
    if upstream.transport_retry_delay_ms > MAX_TRANSPORT_RETRY_DELAY_MS {
        errors.push(ValidationError::new(
            field("transport_retry_delay_ms"),
            format!("must be at most {}", MAX_TRANSPORT_RETRY_DELAY_MS),
        ));
    }
    if upstream.env_override.is_none() && upstream.providers.is_empty() && upstream.fallbacks.is_empty() {
        errors.push(ValidationError::new(field("fallbacks"), "no endpoint source configured"));
    }

    for (i, provider) in upstream.providers.iter().enumerate() {
        if provider.env.trim().is_empty() {
            errors.push(ValidationError::new(
                field(&format!("providers[{}].env", i)),
                "must name an environment variable",
            ));
        }
        if let Some(template) = &provider.template {
            if !template.contains("{}") {
                errors.push(ValidationError::new(
                    field(&format!("providers[{}].template", i)),
                    "must contain a {} placeholder",
                ));
            }
        }
    }

    for fallback in &upstream.fallbacks {
        if Url::parse(fallback.trim()).is_err() {
            errors.push(ValidationError::new(
                field("fallbacks"),
                format!("'{}' is not an absolute URL", fallback),
            ));
        }
    }
}

/// Flag upstream sections that lose built-in endpoint sources.
///
/// A `[upstreams.<service>]` table replaces the built-in section whole, so
/// setting only `fallbacks` silently drops the override variable, the
/// providers and the API key variable.
pub fn override_warnings(config: &GatewayConfig) -> Vec<ValidationError> {
    let builtin = UpstreamsConfig::default();
    let mut warnings = Vec::new();

    for ((service, upstream), (_, default)) in config.upstreams.iter().into_iter().zip(builtin.iter()) {
        let field = |name: &str| format!("upstreams.{}.{}", service, name);

        if let (None, Some(var)) = (&upstream.env_override, &default.env_override) {
            warnings.push(ValidationError::new(
                field("env_override"),
                format!("section overridden without env_override; {} is no longer read", var),
            ));
        }
        if upstream.providers.is_empty() && !default.providers.is_empty() {
            let vars: Vec<&str> = default.providers.iter().map(|p| p.env.as_str()).collect();
            warnings.push(ValidationError::new(
                field("providers"),
                format!("section overridden without providers; {} no longer read", vars.join(", ")),
            ));
        }
        if let (None, Some(var)) = (&upstream.api_key_env, &default.api_key_env) {
            warnings.push(ValidationError::new(
                field("api_key_env"),
                format!("section overridden without api_key_env; {} is no longer sent", var),
            ));
        }
    }

    warnings
}
