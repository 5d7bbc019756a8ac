//! Pump-style REST passthrough.
//!
//! Paths and query strings are forwarded verbatim; any 2xx body is accepted.

use crate::services::Upstream;
use crate::upstream::{FailoverResult, OutboundRequest};

#[derive(Debug)]
pub struct Pump {
    executor: Upstream,
}

/// Build the upstream path for a wildcard capture and raw query string.
pub fn upstream_path(path: &str, query: Option<&str>) -> Result<String, String> {
    let path = path.trim_start_matches('/');
    if path.split('/').any(|segment| segment == "..") {
        return Err("path must not contain '..' segments".to_string());
    }

    let mut full = format!("/{}", path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        full.push('?');
        full.push_str(query);
    }
    Ok(full)
}

impl Pump {
    pub fn new(executor: Upstream) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Upstream {
        &self.executor
    }

    /// Forward a GET for a path built by `upstream_path`.
    pub async fn get(&self, path: &str) -> FailoverResult {
        self.executor.execute(&OutboundRequest::get(path)).await
    }
}
