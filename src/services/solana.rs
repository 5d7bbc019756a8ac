//! Solana JSON-RPC adapter.
//!
//! Requests are POSTed to the endpoint base URL as-is; provider URLs may
//! carry their API key in the query string, so nothing is appended.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::services::Upstream;
use crate::upstream::{FailoverResult, OutboundRequest};

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// True for a plausible base58 public key (32 to 44 characters).
pub fn is_valid_address(address: &str) -> bool {
    (32..=44).contains(&address.len()) && address.chars().all(|c| BASE58_ALPHABET.contains(c))
}

/// A single JSON-RPC 2.0 request object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default = "default_id")]
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

fn default_id() -> Value {
    json!(1)
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: default_id(),
            method: method.into(),
            params,
        }
    }

    /// Wire form of the request; `params` is omitted when absent.
    pub fn body(&self) -> Vec<u8> {
        let mut envelope = Map::new();
        envelope.insert("jsonrpc".to_string(), Value::String(self.jsonrpc.clone()));
        envelope.insert("id".to_string(), self.id.clone());
        envelope.insert("method".to_string(), Value::String(self.method.clone()));
        if let Some(params) = &self.params {
            envelope.insert("params".to_string(), params.clone());
        }
        Value::Object(envelope).to_string().into_bytes()
    }

    /// Reject envelopes no node would accept.
    pub fn validate(&self) -> Result<(), String> {
        if self.jsonrpc != "2.0" {
            return Err(format!("unsupported jsonrpc version '{}'", self.jsonrpc));
        }
        if self.method.trim().is_empty() {
            return Err("method must not be empty".to_string());
        }
        match &self.params {
            None | Some(Value::Array(_)) | Some(Value::Object(_)) => Ok(()),
            Some(_) => Err("params must be an array or object".to_string()),
        }
    }
}

/// `getBalance` result; some nodes answer with a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BalanceResult {
    WithContext { value: u64 },
    Bare(u64),
}

impl BalanceResult {
    pub fn lamports(self) -> u64 {
        match self {
            BalanceResult::WithContext { value } | BalanceResult::Bare(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BalanceEnvelope {
    result: BalanceResult,
}

/// Extract the lamport balance from a successful `getBalance` body.
pub fn parse_balance(body: &[u8]) -> Result<u64, String> {
    serde_json::from_slice::<BalanceEnvelope>(body)
        .map(|envelope| envelope.result.lamports())
        .map_err(|e| format!("unexpected getBalance response: {}", e))
}

/// Wallet-facing balance view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub address: String,
    pub lamports: u64,
    pub sol: f64,
}

impl Balance {
    pub fn new(address: impl Into<String>, lamports: u64) -> Self {
        Self {
            address: address.into(),
            lamports,
            sol: lamports as f64 / LAMPORTS_PER_SOL as f64,
        }
    }
}

#[derive(Debug)]
pub struct SolanaRpc {
    executor: Upstream,
}

impl SolanaRpc {
    pub fn new(executor: Upstream) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Upstream {
        &self.executor
    }

    /// Send one JSON-RPC request through failover.
    pub async fn call(&self, request: &JsonRpcRequest) -> FailoverResult {
        self.executor
            .execute(&OutboundRequest::post_json("", request.body()))
            .await
    }

    pub async fn get_balance(&self, address: &str) -> FailoverResult {
        let request = JsonRpcRequest::new("getBalance", Some(json!([address, { "commitment": "confirmed" }])));
        tracing::debug!(%address, "Fetching balance");
        self.call(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address("11111111111111111111111111111111"));
        assert!(is_valid_address("So11111111111111111111111111111111111111112"));
        assert!(!is_valid_address("short"));
        assert!(!is_valid_address("0OIl111111111111111111111111111111"));
        assert!(!is_valid_address(&"1".repeat(45)));
    }

    #[test]
    fn test_request_parsing_defaults_id() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"getSlot"}"#).unwrap();
        assert_eq!(request.id, json!(1));
        assert!(request.validate().is_ok());

        let bad: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"1.0","method":"getSlot","params":5}"#).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_request_body() {
        let request = JsonRpcRequest::new("getBalance", Some(json!(["addr"])));
        let sent: Value = serde_json::from_slice(&request.body()).unwrap();
        assert_eq!(
            sent,
            json!({"jsonrpc": "2.0", "id": 1, "method": "getBalance", "params": ["addr"]})
        );

        let bare: Value = serde_json::from_slice(&JsonRpcRequest::new("getSlot", None).body()).unwrap();
        assert_eq!(bare, json!({"jsonrpc": "2.0", "id": 1, "method": "getSlot"}));
        assert!(bare.get("params").is_none());
    }

    #[test]
    fn test_balance_shapes() {
        assert_eq!(parse_balance(br#"{"jsonrpc":"2.0","id":1,"result":12345}"#), Ok(12345));
        assert_eq!(
            parse_balance(br#"{"result":{"context":{"slot":1},"value":2500000000}}"#),
            Ok(2_500_000_000)
        );
        assert!(parse_balance(br#"{"result":"lots"}"#).is_err());

        let balance = Balance::new("addr", 2_500_000_000);
        assert_eq!(balance.sol, 2.5);
    }
}
