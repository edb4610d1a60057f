//! Namespace tools: explicit read/write of the session namespace.

use crate::error::Result;
use crate::session::Session;
use crate::types::Scheme;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for the namespace-set tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetNamespaceInput {
    /// Namespace with scheme prefix, e.g. `id:core` or `id:org.team`
    pub namespace: String,
}

/// Output for both namespace tools.
#[derive(Debug, Serialize)]
pub struct NamespaceOutput {
    /// Current namespace with `id:` prefix
    pub namespace: String,
}

impl NamespaceOutput {
    fn new(value: &str) -> Self {
        Self {
            namespace: format!("{}{value}", Scheme::Plain.prefix()),
        }
    }
}

/// Executes the namespace-set tool.
///
/// # Errors
///
/// Validation error if the scheme prefix is missing or the value is empty.
pub fn execute_set_namespace(
    session: &Session,
    input: SetNamespaceInput,
) -> Result<NamespaceOutput> {
    let stored = session.set_namespace(&input.namespace)?;
    tracing::info!(namespace = %stored, "namespace set");
    Ok(NamespaceOutput::new(&stored))
}

/// Executes the namespace-get tool.
///
/// # Errors
///
/// Validation error if no namespace has been set.
pub fn execute_get_namespace(session: &Session) -> Result<NamespaceOutput> {
    Ok(NamespaceOutput {
        namespace: session.namespace()?,
    })
}
