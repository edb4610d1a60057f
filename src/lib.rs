//! ens-context: MCP server that resolves namespaced identifiers to ENS
//! `root-context` text records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              MCP Server (rmcp)              │
//! │         JSON-RPC over stdin/stdout          │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │               Tool Router                    │
//! │  resolve-plain, resolve-execute, namespace-* │
//! └───────┬─────────────────────────┬───────────┘
//!         │                         │
//! ┌───────▼────────┐       ┌────────▼───────────┐
//! │    Session     │       │  Content Fetcher   │
//! │ parse+namespace│       │ normalize → lookup │
//! └────────────────┘       └────────┬───────────┘
//!                                   │
//!                          ┌────────▼───────────┐
//!                          │     EnsClient      │
//!                          │ eth_call (reqwest) │
//!                          └────────────────────┘
//! ```
//!
//! # Identifiers
//!
//! `id:core.subname` resolves `subname.core.eth` and makes `core` the session
//! namespace; `id:'other` then resolves `other.core.eth`.

pub mod config;
pub mod content;
pub mod error;
pub mod fmt;
pub mod identifier;
pub mod server;
pub mod services;
pub mod session;
pub mod tools;
pub mod types;

pub use error::{ResolveError, Result};
pub use types::{Address, Namehash, Scheme};
