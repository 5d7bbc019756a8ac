//! Multi-endpoint upstream proxy with health-aware failover.
//!
//! # Data Flow
//! ```text
//! route handler builds OutboundRequest
//!     → executor.rs asks health.rs which endpoints are out of cooldown
//!     → tries them in rotation order via transport.rs
//!     → classify.rs grades every attempt
//!     → success: rotation pointer moves to the winner, body returned
//!     → exhaustion: FailoverFailure with counts and last error
//! ```
//!
//! # Design Decisions
//! - One executor (and so one health table and rotation pointer) per service
//! - Endpoint lists are fixed at startup (registry.rs)
//! - Cooldowns expire lazily; nothing sweeps the table
//! - Candidates are tried sequentially, never fanned out

pub mod classify;
pub mod executor;
pub mod health;
pub mod registry;
pub mod transport;

pub use classify::{AttemptOutcome, OutcomeKind, RpcErrorDetails};
pub use executor::{
    FailoverExecutor, FailoverFailure, FailoverPolicy, FailoverResult, FailureKind, UpstreamResponse,
};
pub use health::HealthTracker;
pub use registry::EndpointList;
pub use transport::{OutboundRequest, ReqwestTransport, Transport, TransportError};
