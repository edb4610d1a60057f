//! MCP tool implementations.

mod namespace;
mod resolve;

// namespace
pub use namespace::{
    execute_get_namespace, execute_set_namespace, NamespaceOutput, SetNamespaceInput,
};

// resolve
pub use resolve::{
    execute_resolve, execute_resolve_exec, ResolveInput, ResolveOutput, ResponseKind, SOURCE_TAG,
};
