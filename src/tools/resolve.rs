//! Resolve tools: identifier → ENS name → `root-context` content.
//!
//! # Security
//!
//! Record content is written by whoever controls the ENS name. The rendered
//! block wraps it in boundary markers so consumers can tell tool metadata
//! from untrusted content.

use crate::config;
use crate::content::{slice_lines, suggest_execution, ExecutionHint};
use crate::error::Result;
use crate::services::{ContentFetcher, RECORD_KEY};
use crate::session::Session;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Fixed source tag reported in every response.
pub const SOURCE_TAG: &str = "ENS text record: root-context";

/// Input for both resolve tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ResolveInput {
    /// Identifier: `id:<namespace>.<leaf>`, `id:<leaf>`, or shorthand `id:'<leaf>`
    pub id: String,
    /// First line of content to return (0-indexed, default: 0)
    #[serde(default)]
    pub start_line: usize,
}

/// Which header and trailer a response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Context,
    Execution,
}

/// Output for both resolve tools.
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub kind: ResponseKind,
    /// Identifier as supplied
    pub id: String,
    /// Derived ENS name
    pub ens_name: String,
    pub source: &'static str,
    /// Same as `ens_name`
    pub path: String,
    pub start_line: usize,
    /// Record content from `start_line` on
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_hint: Option<ExecutionHint>,
}

impl ResolveOutput {
    /// Renders the response as the text block returned to MCP callers.
    #[must_use]
    pub fn render(&self) -> String {
        let header = match self.kind {
            ResponseKind::Context => "=== ENS CONTEXT ===",
            ResponseKind::Execution => "=== EXECUTION CONTEXT ===",
        };
        let mut out = String::with_capacity(self.content.len() + 256);
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "{header}\n\
             ID: {}\n\
             ENS Name: {}\n\
             Source: {}\n\
             Path: {}\n\
             Start Line: {}\n\n\
             --- BEGIN CONTENT: {} ---\n\
             {}\n\
             --- END CONTENT: {} ---",
            self.id,
            self.ens_name,
            self.source,
            self.path,
            self.start_line,
            self.ens_name,
            self.content,
            self.ens_name,
        );
        if let Some(hint) = self.execution_hint {
            let _ = write!(out, "\n\nSuggested Execution: {hint}");
        }
        out
    }
}

/// Executes the resolve-plain tool.
///
/// A missing endpoint is reported before the identifier is parsed, so an
/// unconfigured server answers every identifier, valid or not, with the
/// config error.
///
/// # Errors
///
/// Config error when `fetcher` is `None` (checked before the identifier),
/// otherwise any parse or fetch error.
pub async fn execute_resolve(
    fetcher: Option<&ContentFetcher>,
    session: &Session,
    input: ResolveInput,
) -> Result<ResolveOutput> {
    resolve(fetcher, session, input, ResponseKind::Context).await
}

/// Executes the resolve-execute tool: resolve-plain plus an execution hint
/// sniffed from the full record.
///
/// # Errors
///
/// Same as [`execute_resolve`].
pub async fn execute_resolve_exec(
    fetcher: Option<&ContentFetcher>,
    session: &Session,
    input: ResolveInput,
) -> Result<ResolveOutput> {
    resolve(fetcher, session, input, ResponseKind::Execution).await
}

async fn resolve(
    fetcher: Option<&ContentFetcher>,
    session: &Session,
    input: ResolveInput,
    kind: ResponseKind,
) -> Result<ResolveOutput> {
    let fetcher = fetcher.ok_or_else(config::unconfigured)?;

    let parsed = session.resolve(&input.id)?;
    let ens_name = parsed.external_name();
    tracing::info!(id = %input.id, %ens_name, "resolving {RECORD_KEY}");

    let record = fetcher.fetch(&ens_name).await?;
    let execution_hint = match kind {
        ResponseKind::Context => None,
        ResponseKind::Execution => Some(suggest_execution(&record)),
    };
    let content = slice_lines(&record, input.start_line).to_string();

    Ok(ResolveOutput {
        kind,
        id: input.id,
        path: ens_name.clone(),
        ens_name,
        source: SOURCE_TAG,
        start_line: input.start_line,
        content,
        execution_hint,
    })
}
