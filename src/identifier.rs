//! Identifier parsing and ENS name derivation.
//!
//! Grammar:
//!
//! ```text
//! identifier := scheme remainder
//! scheme     := "id:" | "idx:"
//! remainder  := "'" leaf                 (shorthand: current namespace + leaf)
//!             | segment ("." segment)*   (full path, outermost first)
//! ```
//!
//! Parsing is pure. A full path with two or more segments reports the
//! namespace it implies through [`ParsedIdentifier::namespace_update`];
//! applying it is the caller's job (see [`crate::session::Session`]).

use crate::error::{ResolveError, Result};
use crate::types::Scheme;

/// Leading character that marks shorthand notation.
pub const SHORTHAND_MARKER: char = '\'';

/// Top-level domain appended to every external name.
pub const ENS_SUFFIX: &str = ".eth";

/// An identifier split into ordered segments, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    /// The identifier exactly as supplied by the caller.
    pub raw: String,
    pub scheme: Scheme,
    pub segments: Vec<String>,
    /// Namespace implied by a full path of two or more segments.
    pub namespace_update: Option<String>,
}

impl ParsedIdentifier {
    /// Returns the ENS name for these segments.
    #[must_use]
    pub fn external_name(&self) -> String {
        external_name(&self.segments)
    }
}

/// Parses `raw` against the current namespace (stored without prefix).
///
/// # Errors
///
/// - Validation: missing scheme prefix, empty remainder, empty segment
/// - Config: shorthand used while no namespace is set
pub fn parse(raw: &str, namespace: Option<&str>) -> Result<ParsedIdentifier> {
    let (scheme, rest) = Scheme::strip(raw).ok_or_else(|| {
        ResolveError::Validation(format!(
            "Invalid identifier '{raw}': expected an 'id:' or 'idx:' prefix"
        ))
    })?;

    if rest.is_empty() {
        return Err(ResolveError::Validation(format!(
            "Invalid identifier '{raw}': nothing after the scheme prefix"
        )));
    }

    if let Some(leaf) = rest.strip_prefix(SHORTHAND_MARKER) {
        let namespace = namespace.ok_or_else(|| {
            ResolveError::Config(format!(
                "Cannot expand '{raw}': no namespace is set. \
                 Call namespace-set or use a full path such as '{}core.{leaf}'",
                scheme.prefix()
            ))
        })?;
        let segments = split_segments(raw, &format!("{namespace}.{leaf}"))?;
        return Ok(ParsedIdentifier {
            raw: raw.to_string(),
            scheme,
            segments,
            namespace_update: None,
        });
    }

    let segments = split_segments(raw, rest)?;
    let namespace_update = match segments.split_last() {
        Some((_, parents)) if !parents.is_empty() => Some(parents.join(".")),
        _ => None,
    };

    Ok(ParsedIdentifier {
        raw: raw.to_string(),
        scheme,
        segments,
        namespace_update,
    })
}

fn split_segments(raw: &str, path: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(ResolveError::Validation(format!(
            "Invalid identifier '{raw}': empty path segment"
        )));
    }
    Ok(segments)
}

/// Converts outermost-first segments into an ENS name.
///
/// `["core"]` becomes `core.eth`; `["core", "subname"]` becomes
/// `subname.core.eth`.
#[must_use]
pub fn external_name<S: AsRef<str>>(segments: &[S]) -> String {
    let mut name = segments
        .iter()
        .rev()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".");
    name.push_str(ENS_SUFFIX);
    name
}
