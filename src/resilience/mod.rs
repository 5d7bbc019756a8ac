//! Resilience primitives shared by the upstream executors.
//!
//! # Data Flow
//! ```text
//! attempt → timeouts.rs (per-attempt deadline)
//!     → 429: backoff.rs (cooldown length for the endpoint)
//!     → transport failure: backoff.rs (fixed pause before next candidate)
//! ```

pub mod backoff;
pub mod timeouts;
