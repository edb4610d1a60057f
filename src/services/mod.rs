//! Name-service access: JSON-RPC transport, ENS client, record fetching.

pub mod ens;
mod fetcher;
pub mod rpc;

pub use ens::{EnsClient, NameService};
pub use fetcher::{ContentFetcher, RECORD_KEY};
pub use rpc::RpcClient;
