//! Minimal Ethereum JSON-RPC 2.0 client.
//!
//! Only `eth_call` against the latest block is needed. No retries and no
//! timeout beyond reqwest's defaults.

use crate::error::{RpcError, RpcResult};
use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Executes a read-only contract call and returns the raw return data.
    ///
    /// # Errors
    ///
    /// Transport failures, JSON-RPC error objects, and malformed hex.
    pub async fn eth_call(&self, to: &Address, data: &[u8]) -> RpcResult<Vec<u8>> {
        let params = serde_json::json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let result = self.request("eth_call", params).await?;
        decode_hex(&result)
    }

    async fn request(&self, method: &str, params: serde_json::Value) -> RpcResult<String> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        tracing::debug!(method, id, "json-rpc request");

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        into_result(response)
    }
}

fn into_result(response: RpcResponse) -> RpcResult<String> {
    match response {
        RpcResponse {
            error: Some(err), ..
        } => Err(RpcError::Rpc {
            code: err.code,
            message: err.message,
        }),
        RpcResponse {
            result: Some(result),
            ..
        } => Ok(result),
        _ => Err(RpcError::MissingResult),
    }
}

/// Decodes a `0x`-prefixed hex string. `"0x"` decodes to no bytes.
pub fn decode_hex(value: &str) -> RpcResult<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    Ok(hex::decode(digits)?)
}
