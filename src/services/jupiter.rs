//! Jupiter price adapter.

use serde::Deserialize;
use std::collections::HashMap;

use crate::services::Upstream;
use crate::upstream::{FailoverResult, OutboundRequest};

/// Most mints a single price request may name.
pub const MAX_PRICE_IDS: usize = 50;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub usd_price: f64,
    #[serde(default)]
    pub block_id: Option<u64>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default, rename = "priceChange24h")]
    pub price_change_24h: Option<f64>,
}

/// Mint → price. Unknown mints are simply absent.
pub type PriceResponse = HashMap<String, PriceEntry>;

pub fn check_prices(body: &[u8]) -> Result<(), String> {
    serde_json::from_slice::<PriceResponse>(body)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Split and clean a comma-separated `ids` parameter.
pub fn parse_ids(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|id| !id.is_empty()).collect()
}

#[derive(Debug)]
pub struct Jupiter {
    executor: Upstream,
    api_key: Option<(String, String)>,
}

impl Jupiter {
    pub fn new(executor: Upstream, api_key: Option<(String, String)>) -> Self {
        Self { executor, api_key }
    }

    pub fn executor(&self) -> &Upstream {
        &self.executor
    }

    /// Name of the header carrying the API key, when one is configured.
    pub fn api_key_header(&self) -> Option<&str> {
        self.api_key.as_ref().map(|(name, _)| name.as_str())
    }

    pub async fn prices(&self, ids: &[&str]) -> FailoverResult {
        let mut request = OutboundRequest::get("/price/v3").query("ids", &ids.join(","));
        if let Some((name, value)) = &self.api_key {
            request = request.header(name.clone(), value.clone());
        }
        self.executor.execute_checked(&request, Some(check_prices)).await
    }
}
