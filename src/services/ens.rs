//! ENS name handling and the registry/resolver client.
//!
//! # Lookup
//!
//! ```text
//! name ──normalize──▶ namehash ──registry.resolver(node)──▶ resolver
//!                                                              │
//!                               resolver.text(node, key) ◀─────┘
//! ```
//!
//! Only the exact name's resolver is consulted; parent-name (wildcard)
//! resolution is not attempted.

use crate::config::RpcConfig;
use crate::error::{NameError, Result, RpcError, RpcResult};
use crate::services::rpc::RpcClient;
use crate::types::{Address, Namehash};
use async_trait::async_trait;
use sha3::{Digest, Keccak256};

/// `resolver(bytes32)` on the ENS registry.
const RESOLVER_SELECTOR: [u8; 4] = [0x01, 0x78, 0xb8, 0xbf];

/// `text(bytes32,string)` on a public resolver.
const TEXT_SELECTOR: [u8; 4] = [0x59, 0xd1, 0xd4, 0x3c];

const WORD: usize = 32;

/// Read access to an ENS-style name service.
///
/// Nodes are namehashes of normalized names.
#[async_trait]
pub trait NameService: Send + Sync {
    /// Returns the resolver responsible for `node`, if any.
    async fn resolver(&self, node: &Namehash) -> RpcResult<Option<Address>>;

    /// Reads text record `key` of `node` from `resolver`.
    ///
    /// An empty record is reported as `None`.
    async fn text(&self, resolver: &Address, node: &Namehash, key: &str)
        -> RpcResult<Option<String>>;
}

/// [`NameService`] backed by an Ethereum JSON-RPC endpoint.
pub struct EnsClient {
    rpc: RpcClient,
    registry: Address,
}

impl EnsClient {
    pub fn new(rpc: RpcClient, registry: Address) -> Self {
        Self { rpc, registry }
    }

    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Config error when no real RPC endpoint is configured.
    pub fn from_config(config: &RpcConfig) -> Result<Self> {
        let url = config.rpc_url()?;
        tracing::info!(registry = %config.registry, "ENS client using {}", url);
        Ok(Self::new(RpcClient::new(url), config.registry))
    }
}

#[async_trait]
impl NameService for EnsClient {
    async fn resolver(&self, node: &Namehash) -> RpcResult<Option<Address>> {
        let data = self
            .rpc
            .eth_call(&self.registry, &encode_resolver_call(node))
            .await?;
        Ok(decode_address(&data)?.filter(|addr| !addr.is_zero()))
    }

    async fn text(
        &self,
        resolver: &Address,
        node: &Namehash,
        key: &str,
    ) -> RpcResult<Option<String>> {
        let data = self
            .rpc
            .eth_call(resolver, &encode_text_call(node, key))
            .await?;
        let value = decode_string(&data)?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    }
}

/// Normalizes an ENS name: lower-cases it and rejects names that cannot be
/// registered.
///
/// This is a conservative subset of ENSIP-15: labels must be non-empty,
/// contain no whitespace or control characters, and ASCII characters are
/// limited to letters, digits, `-`, and leading `_`.
///
/// # Errors
///
/// Returns the first rule the name violates.
pub fn normalize(name: &str) -> std::result::Result<String, NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    let lowered = name.to_lowercase();

    for label in lowered.split('.') {
        if label.is_empty() {
            return Err(NameError::EmptyLabel {
                name: name.to_string(),
            });
        }

        let leading_underscores = label.chars().take_while(|&c| c == '_').count();
        for (i, ch) in label.chars().enumerate() {
            let allowed = if ch == '_' {
                i < leading_underscores
            } else if ch.is_ascii() {
                ch.is_ascii_alphanumeric() || ch == '-'
            } else {
                !ch.is_whitespace() && !ch.is_control()
            };
            if !allowed {
                return Err(NameError::DisallowedChar {
                    ch,
                    name: name.to_string(),
                });
            }
        }

        if label.is_ascii() && label.get(2..4) == Some("--") {
            return Err(NameError::LabelExtension {
                label: label.to_string(),
            });
        }
    }

    Ok(lowered)
}

/// Computes the ENSIP-1 namehash of a normalized name.
#[must_use]
pub fn namehash(name: &str) -> Namehash {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return Namehash(node);
    }
    for label in name.rsplit('.') {
        let label_hash = Keccak256::digest(label.as_bytes());
        let mut hasher = Keccak256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node.copy_from_slice(&hasher.finalize());
    }
    Namehash(node)
}

/// Calldata for `resolver(bytes32 node)`.
#[must_use]
pub fn encode_resolver_call(node: &Namehash) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&RESOLVER_SELECTOR);
    data.extend_from_slice(node.as_bytes());
    data
}

/// Calldata for `text(bytes32 node, string key)`.
#[must_use]
pub fn encode_text_call(node: &Namehash, key: &str) -> Vec<u8> {
    let key = key.as_bytes();
    let padded_len = key.len().div_ceil(WORD) * WORD;

    let mut data = Vec::with_capacity(4 + 3 * WORD + padded_len);
    data.extend_from_slice(&TEXT_SELECTOR);
    data.extend_from_slice(node.as_bytes());
    // Head: offset of the dynamic string, measured from the start of the args.
    data.extend_from_slice(&encode_usize(2 * WORD));
    data.extend_from_slice(&encode_usize(key.len()));
    data.extend_from_slice(key);
    data.resize(4 + 3 * WORD + padded_len, 0);
    data
}

/// Decodes an ABI `address` return word. Short data decodes to `None`.
///
/// # Errors
///
/// The 12 padding bytes of the word are not zero.
pub fn decode_address(data: &[u8]) -> RpcResult<Option<Address>> {
    let Some(word) = data.get(..WORD) else {
        return Ok(None);
    };
    if word[..12].iter().any(|&b| b != 0) {
        return Err(RpcError::Decode(format!(
            "address word has non-zero padding: 0x{}",
            hex::encode(word)
        )));
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Ok(Some(Address(bytes)))
}

/// Decodes an ABI `string` return value. Empty data decodes to `""`.
///
/// # Errors
///
/// Offsets or lengths outside the data, or invalid UTF-8.
pub fn decode_string(data: &[u8]) -> RpcResult<String> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let offset = read_usize(data, 0)?;
    let len = read_usize(data, offset)?;
    let start = offset + WORD;
    let bytes = start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| RpcError::Decode(format!("string length {len} exceeds return data")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| RpcError::Decode(format!("record is not valid UTF-8: {e}")))
}

fn encode_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn read_usize(data: &[u8], at: usize) -> RpcResult<usize> {
    let word = at
        .checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| RpcError::Decode(format!("word at {at} exceeds return data")))?;
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(RpcError::Decode(format!("word at {at} does not fit in usize")));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(tail))
        .map_err(|_| RpcError::Decode(format!("word at {at} does not fit in usize")))
}
