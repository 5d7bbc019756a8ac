//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, shared layers)
//!     → request.rs (request ID, trace span, metrics)
//!     → proxy.rs (upstream routes → services → failover executor)
//!       stores.rs (CRUD over in-memory stores)
//!     → response.rs (pass-through bodies, error mapping)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod stores;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
