//! Per-connection namespace state.
//!
//! One [`Session`] lives as long as one MCP connection. Resolution parses
//! under the lock and applies the implied namespace update before releasing
//! it, so two calls on the same session never observe a half-applied update.
//! Different sessions share nothing.

use crate::error::{ResolveError, Result};
use crate::identifier::{self, ParsedIdentifier};
use crate::types::Scheme;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct Session {
    /// Current namespace, stored without a scheme prefix.
    namespace: RwLock<Option<String>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an explicit namespace. `raw` must carry a scheme prefix.
    ///
    /// Returns the stored value (prefix stripped).
    ///
    /// # Errors
    ///
    /// Validation error if the prefix is missing or nothing follows it.
    pub fn set_namespace(&self, raw: &str) -> Result<String> {
        let (_, value) = Scheme::strip(raw).ok_or_else(|| {
            ResolveError::Validation(format!(
                "Invalid namespace '{raw}': expected an 'id:' prefix, e.g. 'id:core'"
            ))
        })?;
        if value.is_empty() {
            return Err(ResolveError::Validation(format!(
                "Invalid namespace '{raw}': nothing after the scheme prefix"
            )));
        }
        self.update(value.to_string());
        Ok(value.to_string())
    }

    /// Returns the current namespace with the `id:` prefix re-attached.
    ///
    /// # Errors
    ///
    /// Validation error if no namespace has been set in this session.
    pub fn namespace(&self) -> Result<String> {
        self.current()
            .map(|ns| format!("{}{ns}", Scheme::Plain.prefix()))
            .ok_or_else(|| {
                ResolveError::Validation(
                    "No namespace set. Use namespace-set or resolve a full path first."
                        .to_string(),
                )
            })
    }

    /// Parses `raw` against the current namespace and applies any namespace
    /// update the identifier implies.
    ///
    /// # Errors
    ///
    /// See [`identifier::parse`].
    pub fn resolve(&self, raw: &str) -> Result<ParsedIdentifier> {
        let mut guard = self
            .namespace
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let parsed = identifier::parse(raw, guard.as_deref())?;
        if let Some(update) = &parsed.namespace_update {
            tracing::debug!(namespace = %update, "namespace updated from full path");
            *guard = Some(update.clone());
        }
        Ok(parsed)
    }

    /// Current namespace without prefix.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.namespace
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, value: String) {
        *self
            .namespace
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(value);
    }
}
