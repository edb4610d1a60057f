//! Runtime configuration for the name-service connection.

use crate::error::{ResolveError, Result};
use crate::types::Address;

/// Environment variable carrying the Ethereum JSON-RPC URL.
pub const RPC_URL_ENV: &str = "ETH_RPC_URL";

/// Sentinel shipped in sample configs; treated the same as "unset".
pub const PLACEHOLDER_RPC_URL: &str = "YOUR_RPC_URL_HERE";

/// Mainnet ENS registry.
pub const DEFAULT_ENS_REGISTRY: Address = Address([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97,
    0xba, 0x6c, 0x7d, 0x2e, 0x1e,
]);

#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint, `None` when unset or still the placeholder.
    url: Option<String>,
    pub registry: Address,
}

impl RpcConfig {
    /// Builds a config from a raw URL value (CLI flag or environment).
    #[must_use]
    pub fn new(url: Option<String>, registry: Option<Address>) -> Self {
        let url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !is_placeholder(u));
        Self {
            url,
            registry: registry.unwrap_or(DEFAULT_ENS_REGISTRY),
        }
    }

    /// Reads [`RPC_URL_ENV`] from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(RPC_URL_ENV).ok(), None)
    }

    /// Returns the configured endpoint.
    ///
    /// # Errors
    ///
    /// Config error naming the variable to set.
    pub fn rpc_url(&self) -> Result<&str> {
        self.url.as_deref().ok_or_else(unconfigured)
    }
}

/// The error every fetch-dependent tool returns without a real endpoint.
#[must_use]
pub fn unconfigured() -> ResolveError {
    ResolveError::Config(format!(
        "No Ethereum RPC endpoint configured. Set {RPC_URL_ENV} (or pass --rpc-url) \
         to a mainnet JSON-RPC URL, e.g. https://eth.llamarpc.com, and restart the server."
    ))
}

fn is_placeholder(url: &str) -> bool {
    url.is_empty() || url == PLACEHOLDER_RPC_URL
}
