//! Fetches the `root-context` record for an ENS name.

use crate::error::{ResolveError, Result, RpcError};
use crate::services::ens::{self, NameService};
use std::sync::Arc;

/// Text record read for every identifier.
pub const RECORD_KEY: &str = "root-context";

pub struct ContentFetcher {
    names: Arc<dyn NameService>,
}

impl ContentFetcher {
    pub fn new(names: Arc<dyn NameService>) -> Self {
        Self { names }
    }

    /// Resolves `name` and returns its `root-context` record.
    ///
    /// Performs one resolver lookup followed by one record read.
    ///
    /// # Errors
    ///
    /// - Validation: malformed name, no resolver, empty record
    /// - Internal: transport or decoding failures, message preserved
    pub async fn fetch(&self, name: &str) -> Result<String> {
        let normalized = ens::normalize(name).map_err(|e| {
            tracing::debug!(%name, code = e.code(), "rejected name: {e}");
            ResolveError::from(e)
        })?;
        let node = ens::namehash(&normalized);

        let resolver = self
            .names
            .resolver(&node)
            .await
            .map_err(|e| internal(name, e))?
            .ok_or_else(|| ResolveError::Validation(format!("No resolver found for {name}")))?;

        tracing::debug!(%name, %resolver, %node, "reading {RECORD_KEY}");

        let record = self
            .names
            .text(&resolver, &node, RECORD_KEY)
            .await
            .map_err(|e| internal(name, e))?;

        match record {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ResolveError::Validation(format!(
                "No {RECORD_KEY} record found for {name}"
            ))),
        }
    }
}

fn internal(name: &str, err: RpcError) -> ResolveError {
    tracing::warn!(%name, code = err.code(), "name service failure: {err}");
    ResolveError::from(err)
}
