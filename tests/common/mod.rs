//! Common test utilities for ens-context integration tests.
//!
//! Provides `MemoryNameService`, an in-memory stand-in for the ENS registry
//! and resolvers, and `TestEnv` wiring it to a session and fetcher.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use async_trait::async_trait;
use ens_context::error::{RpcError, RpcResult};
use ens_context::services::{ens, ContentFetcher, NameService};
use ens_context::session::Session;
use ens_context::types::{Address, Namehash};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Resolver address every registered name points at.
pub const RESOLVER: Address = Address([0x42; 20]);

/// In-memory name service keyed by normalized name.
#[derive(Default)]
pub struct MemoryNameService {
    /// name -> (key -> value)
    records: Mutex<HashMap<String, HashMap<String, String>>>,
    /// Names whose lookups fail at the transport layer.
    broken: Mutex<Vec<String>>,
    pub resolver_calls: AtomicUsize,
    pub text_calls: AtomicUsize,
}

impl MemoryNameService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with a `root-context` record.
    pub fn with_context(self, name: &str, content: &str) -> Self {
        self.insert(name, "root-context", content);
        self
    }

    /// Registers `name` with a resolver but no records.
    pub fn with_name(self, name: &str) -> Self {
        self.records
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        self
    }

    /// Makes every lookup of `name` fail with an RPC error.
    pub fn with_broken(self, name: &str) -> Self {
        self.broken.lock().unwrap().push(name.to_string());
        self
    }

    pub fn insert(&self, name: &str, key: &str, value: &str) {
        self.records
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn check_broken(&self, node: &Namehash) -> RpcResult<()> {
        let broken = self.broken.lock().unwrap();
        if let Some(name) = broken.iter().find(|b| ens::namehash(b) == *node) {
            return Err(RpcError::Rpc {
                code: -32603,
                message: format!("upstream unavailable for {name}"),
            });
        }
        Ok(())
    }

    fn name_for(&self, node: &Namehash) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .keys()
            .find(|name| ens::namehash(name) == *node)
            .cloned()
    }
}

#[async_trait]
impl NameService for MemoryNameService {
    async fn resolver(&self, node: &Namehash) -> RpcResult<Option<Address>> {
        self.resolver_calls.fetch_add(1, Ordering::SeqCst);
        self.check_broken(node)?;
        Ok(self.name_for(node).map(|_| RESOLVER))
    }

    async fn text(
        &self,
        resolver: &Address,
        node: &Namehash,
        key: &str,
    ) -> RpcResult<Option<String>> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(*resolver, RESOLVER, "text read from unexpected resolver");
        self.check_broken(node)?;
        let Some(name) = self.name_for(node) else {
            return Ok(None);
        };
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&name)
            .and_then(|records| records.get(key))
            .cloned())
    }
}

/// A session plus a fetcher backed by a `MemoryNameService`.
pub struct TestEnv {
    pub names: Arc<MemoryNameService>,
    pub fetcher: ContentFetcher,
    pub session: Session,
}

impl TestEnv {
    pub fn new(names: MemoryNameService) -> Self {
        let names = Arc::new(names);
        let fetcher = ContentFetcher::new(Arc::clone(&names) as Arc<dyn NameService>);
        Self {
            names,
            fetcher,
            session: Session::new(),
        }
    }

    pub fn fetcher(&self) -> Option<&ContentFetcher> {
        Some(&self.fetcher)
    }
}

/// Name service with a small, realistic set of records.
pub fn sample_names() -> MemoryNameService {
    MemoryNameService::new()
        .with_context("subname.core.eth", "hello world")
        .with_context("core.eth", "core root\nsecond line\nthird line")
        .with_context("subname.idreg.eth", "registry entry")
        .with_context(
            "page.web.eth",
            "<!DOCTYPE html>\n<html><script>alert('python')</script></html>",
        )
        .with_context("install.tools.eth", "#!/bin/bash\nset -e\necho installing")
        .with_context("train.ml.eth", "import torch\n# run with python3")
        .with_context("app.web.eth", "npm install\nnpm start")
        .with_context("data.misc.eth", "just some notes")
        .with_name("empty.core.eth")
}
