//! Endpoint registry.
//!
//! Builds the ordered candidate list for one logical upstream service from
//! configuration. Sources are read in priority order:
//!
//! 1. the explicit override variable (`env_override`)
//! 2. named providers (`providers`), optionally filled into a URL template
//! 3. the public fallback list (`fallbacks`)
//!
//! Blank values are dropped and duplicates keep their first position. The
//! list never changes after construction.

use crate::config::schema::{ProviderSource, UpstreamConfig};

/// Ordered, deduplicated base URLs for one upstream service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointList {
    endpoints: Vec<String>,
}

impl EndpointList {
    /// Build a list from raw candidates, in the given priority order.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut endpoints: Vec<String> = Vec::new();
        for candidate in candidates {
            let normalized = candidate.as_ref().trim().trim_end_matches('/');
            if normalized.is_empty() || endpoints.iter().any(|e| e == normalized) {
                continue;
            }
            endpoints.push(normalized.to_string());
        }
        Self { endpoints }
    }

    /// Build a list from an upstream section, resolving variables through `env`.
    pub fn from_config<F>(config: &UpstreamConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut candidates = Vec::new();

        if let Some(var) = config.env_override.as_deref() {
            if let Some(value) = lookup(&env, var) {
                candidates.push(value);
            }
        }

        for provider in &config.providers {
            if let Some(url) = resolve_provider(provider, &env) {
                candidates.push(url);
            }
        }

        candidates.extend(config.fallbacks.iter().cloned());
        Self::new(candidates)
    }

    pub fn list(&self) -> &[String] {
        &self.endpoints
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.endpoints.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

fn lookup<F>(env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a named provider. With a template, the variable's value replaces
/// `{}`; without one, the value is the URL itself.
fn resolve_provider<F>(provider: &ProviderSource, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(env, &provider.env)?;
    match provider.template.as_deref() {
        Some(template) => Some(template.replace("{}", &value)),
        None => Some(value),
    }
}
