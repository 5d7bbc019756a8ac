//! Per-endpoint rate-limit bookkeeping.
//!
//! # State
//! ```text
//! key (hostname[:port]) → { consecutive_penalties, cooldown_until }
//! ```
//!
//! Entries are created on the first 429 and only ever written by
//! `mark_rate_limited`. There is no reaper: the first check after a
//! cooldown expires drops the entry, so the next 429 starts over at the
//! base delay.

use dashmap::DashMap;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

use crate::resilience::backoff::{cooldown_for, MAX_PENALTY_MULTIPLIER};

/// Health record for one endpoint key.
#[derive(Debug, Clone, Copy)]
pub struct EndpointHealth {
    pub consecutive_penalties: u32,
    pub cooldown_until: Instant,
}

/// Point-in-time view of one entry, for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub endpoint: String,
    pub consecutive_penalties: u32,
    pub cooldown_remaining_ms: u64,
}

/// Rate-limit state for one logical upstream service.
#[derive(Debug, Default)]
pub struct HealthTracker {
    table: DashMap<String, EndpointHealth>,
}

/// Derive the tracking key for an endpoint URL: its hostname (plus the port
/// when one is given explicitly), or the raw string when it does not parse.
///
/// Paths and query strings never reach the key, so provider API keys stay
/// out of logs and metrics.
pub fn endpoint_key(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => url.to_string(),
    }
}

impl HealthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a recorded cooldown has not yet expired.
    pub fn is_rate_limited(&self, key: &str) -> bool {
        let limited = match self.table.get(key) {
            Some(entry) => Instant::now() < entry.cooldown_until,
            None => return false,
        };

        if !limited {
            // A concurrent mark may have landed since the read.
            self.table
                .remove_if(key, |_, entry| Instant::now() >= entry.cooldown_until);
        }
        limited
    }

    /// Record a rate-limit event and start (or extend) the cooldown.
    ///
    /// Returns the cooldown that was applied.
    pub fn mark_rate_limited(&self, key: &str, base_delay: Duration) -> Duration {
        let now = Instant::now();
        let mut entry = self
            .table
            .entry(key.to_string())
            .or_insert(EndpointHealth {
                consecutive_penalties: 0,
                cooldown_until: now,
            });

        let penalties = (entry.consecutive_penalties + 1).min(MAX_PENALTY_MULTIPLIER);
        let cooldown = cooldown_for(base_delay, penalties);

        entry.consecutive_penalties = penalties;
        entry.cooldown_until = now + cooldown;

        tracing::warn!(
            endpoint = %key,
            penalties,
            cooldown_ms = cooldown.as_millis() as u64,
            "Endpoint rate limited, entering cooldown"
        );

        cooldown
    }

    /// Current penalty count for a key (0 when untracked).
    pub fn penalties(&self, key: &str) -> u32 {
        self.table
            .get(key)
            .map(|e| e.consecutive_penalties)
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> Vec<HealthSnapshot> {
        let now = Instant::now();
        let mut entries: Vec<HealthSnapshot> = self
            .table
            .iter()
            .map(|e| HealthSnapshot {
                endpoint: e.key().clone(),
                consecutive_penalties: e.consecutive_penalties,
                cooldown_remaining_ms: e
                    .cooldown_until
                    .saturating_duration_since(now)
                    .as_millis() as u64,
            })
            .collect();
        entries.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        entries
    }
}
