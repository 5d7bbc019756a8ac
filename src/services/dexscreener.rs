//! DexScreener adapter.
//!
//! A 2xx answer only counts when it carries a `pairs` member (an array, or
//! `null` for tokens DexScreener has never seen). Mirrors that serve a
//! maintenance page with status 200 are skipped like any other failure.

use serde::{Deserialize, Deserializer};

use crate::services::Upstream;
use crate::upstream::{FailoverResult, OutboundRequest};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub pair_address: String,
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: String,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub base_token: Option<TokenRef>,
    #[serde(default)]
    pub quote_token: Option<TokenRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairsResponse {
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub pairs: Vec<Pair>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Pair>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Pair>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Shape check for pair lookups and searches.
pub fn check_pairs(body: &[u8]) -> Result<(), String> {
    serde_json::from_slice::<PairsResponse>(body)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[derive(Debug)]
pub struct DexScreener {
    executor: Upstream,
}

impl DexScreener {
    pub fn new(executor: Upstream) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Upstream {
        &self.executor
    }

    /// Pairs for one or more comma-separated token addresses.
    pub async fn token_pairs(&self, address: &str) -> FailoverResult {
        let request = OutboundRequest::get(format!("/latest/dex/tokens/{}", address));
        self.executor.execute_checked(&request, Some(check_pairs)).await
    }

    pub async fn search(&self, query: &str) -> FailoverResult {
        let request = OutboundRequest::get("/latest/dex/search").query("q", query);
        self.executor.execute_checked(&request, Some(check_pairs)).await
    }
}
