//! Error types for ens-context.
//!
//! Uses thiserror for ergonomic error handling with proper
//! error chain propagation. Every error reaching a caller is one of the
//! three [`ResolveError`] kinds; lower layers convert into it with `From`.

use thiserror::Error;

/// Top-level error returned by every tool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Missing RPC endpoint, or shorthand used before a namespace exists.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input, or the name service has no endpoint/record.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Anything else that failed during the network round trip.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Ethereum JSON-RPC transport errors.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC response carried neither result nor error")]
    MissingResult,

    #[error("Invalid hex in RPC result: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("ABI decode error: {0}")]
    Decode(String),
}

/// ENS name normalization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name is empty")]
    Empty,

    #[error("Empty label in name: {name}")]
    EmptyLabel { name: String },

    #[error("Disallowed character {ch:?} in name: {name}")]
    DisallowedChar { ch: char, name: String },

    #[error("Invalid label extension '--' in label: {label}")]
    LabelExtension { label: String },
}

/// Result type alias for tool operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Result type alias for JSON-RPC operations.
pub type RpcResult<T> = std::result::Result<T, RpcError>;

// Error code implementations for machine-readable error responses
impl ResolveError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Config(m) | Self::Validation(m) | Self::Internal(m) => m,
        }
    }
}

impl RpcError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "HTTP_ERROR",
            Self::Rpc { .. } => "RPC_ERROR",
            Self::MissingResult => "MISSING_RESULT",
            Self::Hex(_) => "HEX_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }
}

impl NameError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_NAME",
            Self::EmptyLabel { .. } => "EMPTY_LABEL",
            Self::DisallowedChar { .. } => "DISALLOWED_CHAR",
            Self::LabelExtension { .. } => "LABEL_EXTENSION",
        }
    }
}

impl From<NameError> for ResolveError {
    fn from(err: NameError) -> Self {
        Self::Validation(format!("Invalid ENS name: {err}"))
    }
}

impl From<RpcError> for ResolveError {
    fn from(err: RpcError) -> Self {
        Self::Internal(err.to_string())
    }
}

// Conversion to rmcp protocol errors
impl From<ResolveError> for rmcp::ErrorData {
    fn from(err: ResolveError) -> Self {
        let data = Some(serde_json::json!({ "kind": err.code() }));
        match err {
            ResolveError::Config(msg) => rmcp::ErrorData::invalid_request(msg, data),
            ResolveError::Validation(msg) => rmcp::ErrorData::invalid_params(msg, data),
            ResolveError::Internal(msg) => rmcp::ErrorData::internal_error(msg, data),
        }
    }
}
