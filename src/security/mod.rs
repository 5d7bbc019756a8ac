//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size, inbound deadline)
//!     → headers.rs (CORS preflight and origin checks)
//!     → handlers
//! Outgoing response:
//!     → headers.rs (security response headers)
//! ```
//!
//! # Design Decisions
//! - Limits are applied to every route, admin included
//! - Response headers never overwrite ones a handler already set

pub mod headers;
pub mod limits;
