//! Per-attempt deadlines.
//!
//! Every upstream attempt runs under its own deadline; there is no budget
//! spanning the whole failover sequence.

use std::future::Future;
use std::time::Duration;

use crate::upstream::transport::TransportError;

/// Run one attempt, turning an elapsed deadline into `TransportError::Timeout`.
pub async fn with_attempt_timeout<T, F>(limit: Duration, attempt: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(limit)),
    }
}
