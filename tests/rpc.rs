//! `EnsClient` and `RpcClient` against a local JSON-RPC endpoint.
//!
//! A single-purpose HTTP/1.1 listener stands in for an Ethereum node. It
//! answers `eth_call` by dispatching on the calldata selector, so these tests
//! cover request encoding, response decoding, and error translation over a
//! real socket.

use ens_context::config::DEFAULT_ENS_REGISTRY;
use ens_context::error::ResolveError;
use ens_context::services::{ContentFetcher, EnsClient, RpcClient};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const RESOLVER_SELECTOR: &str = "0x0178b8bf";
const TEXT_SELECTOR: &str = "0x59d1d43c";
const RESOLVER_HEX: &str = "4242424242424242424242424242424242424242";

/// Canned reply: HTTP status and JSON body.
type Reply = (u16, String);

/// Local JSON-RPC node. Every request is recorded before it is answered.
struct MockNode {
    url: String,
    calls: Arc<Mutex<Vec<Value>>>,
}

impl MockNode {
    async fn start(handler: impl Fn(&Value) -> Reply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = Arc::clone(&calls);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    serve(stream, |request| {
                        recorded.lock().unwrap().push(request.clone());
                        handler(request)
                    })
                    .await;
                });
            }
        });

        Self { url, calls }
    }

    fn fetcher(&self) -> ContentFetcher {
        let client = EnsClient::new(RpcClient::new(self.url.clone()), DEFAULT_ENS_REGISTRY);
        ContentFetcher::new(Arc::new(client))
    }

    fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

async fn serve(mut stream: TcpStream, handler: impl FnOnce(&Value) -> Reply) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let request: Value =
        serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();
    let (status, body) = handler(&request);

    let response = format!(
        "HTTP/1.1 {status} Mock\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\
         connection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

fn call_target(request: &Value) -> &str {
    request["params"][0]["to"].as_str().unwrap()
}

fn call_data(request: &Value) -> &str {
    request["params"][0]["data"].as_str().unwrap()
}

fn ok(request: &Value, result: &str) -> Reply {
    let body = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result });
    (200, body.to_string())
}

/// ABI-encodes a single `address` return value.
fn abi_address(hex_addr: &str) -> String {
    format!("0x{:0>64}", hex_addr)
}

/// ABI-encodes a single `string` return value.
fn abi_string(value: &str) -> String {
    let bytes = value.as_bytes();
    let padded = bytes.len().div_ceil(32) * 32;
    let mut data = hex::encode(bytes);
    data.push_str(&"0".repeat((padded - bytes.len()) * 2));
    format!("0x{:064x}{:064x}{data}", 32, bytes.len())
}

/// Node where every name has resolver `0x4242..42` holding `record`.
fn answering(record: &'static str) -> impl Fn(&Value) -> Reply + Send + Sync + 'static {
    move |request| {
        let data = call_data(request);
        if data.starts_with(RESOLVER_SELECTOR) {
            ok(request, &abi_address(RESOLVER_HEX))
        } else if data.starts_with(TEXT_SELECTOR) {
            ok(request, &abi_string(record))
        } else {
            panic!("unexpected calldata {data}");
        }
    }
}

#[tokio::test]
async fn test_fetch_over_json_rpc() {
    let node = MockNode::start(answering("hello world")).await;

    let content = node.fetcher().fetch("subname.core.eth").await.unwrap();
    assert_eq!(content, "hello world");

    let calls = node.calls();
    assert_eq!(calls.len(), 2, "one resolver lookup and one record read");

    let lookup = &calls[0];
    assert_eq!(lookup["jsonrpc"], "2.0");
    assert_eq!(lookup["method"], "eth_call");
    assert_eq!(lookup["params"][1], "latest");
    assert_eq!(call_target(lookup), DEFAULT_ENS_REGISTRY.to_string());
    assert!(call_data(lookup).starts_with(RESOLVER_SELECTOR));

    let read = &calls[1];
    assert_eq!(call_target(read), format!("0x{RESOLVER_HEX}"));
    assert!(call_data(read).starts_with(TEXT_SELECTOR));
    // Both calls carry the same node right after the selector.
    assert_eq!(&call_data(lookup)[10..74], &call_data(read)[10..74]);
    // The record key is encoded in the tail of the text call.
    assert!(call_data(read).contains(&hex::encode("root-context")));
}

#[tokio::test]
async fn test_multiline_record_survives_abi_decoding() {
    let node = MockNode::start(answering("#!/bin/sh\necho hi\n")).await;

    let content = node.fetcher().fetch("installer.tools.eth").await.unwrap();
    assert_eq!(content, "#!/bin/sh\necho hi\n");
}

#[tokio::test]
async fn test_zero_resolver_is_validation_error() {
    let node = MockNode::start(|request| ok(request, &abi_address(""))).await;

    let err = node.fetcher().fetch("missing.core.eth").await.unwrap_err();
    assert!(matches!(err, ResolveError::Validation(_)), "{err:?}");
    assert!(err.message().contains("No resolver found for missing.core.eth"));
    assert_eq!(node.calls().len(), 1, "no record read without a resolver");
}

#[tokio::test]
async fn test_empty_record_is_validation_error() {
    let node = MockNode::start(answering("")).await;

    let err = node.fetcher().fetch("blank.core.eth").await.unwrap_err();
    assert!(matches!(err, ResolveError::Validation(_)), "{err:?}");
    assert!(err.message().contains("No root-context record found"));
}

#[tokio::test]
async fn test_rpc_error_object_is_internal_error() {
    let node = MockNode::start(|request| {
        let body = json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": -32000, "message": "execution reverted" }
        });
        (200, body.to_string())
    })
    .await;

    let err = node.fetcher().fetch("subname.core.eth").await.unwrap_err();
    assert!(matches!(err, ResolveError::Internal(_)), "{err:?}");
    assert!(err.message().contains("execution reverted"), "{err}");
}

#[tokio::test]
async fn test_http_failure_is_internal_error() {
    let node = MockNode::start(|_| (500, "{}".to_string())).await;

    let err = node.fetcher().fetch("subname.core.eth").await.unwrap_err();
    assert!(matches!(err, ResolveError::Internal(_)), "{err:?}");
}

#[tokio::test]
async fn test_dirty_address_padding_is_internal_error() {
    let node = MockNode::start(|request| ok(request, &format!("0x{}", "ff".repeat(32)))).await;

    let err = node.fetcher().fetch("subname.core.eth").await.unwrap_err();
    assert!(matches!(err, ResolveError::Internal(_)), "{err:?}");
}

#[tokio::test]
async fn test_request_ids_increase() {
    let node = MockNode::start(answering("x")).await;
    let fetcher = node.fetcher();

    fetcher.fetch("a.core.eth").await.unwrap();
    fetcher.fetch("b.core.eth").await.unwrap();

    let ids: Vec<u64> = node
        .calls()
        .iter()
        .map(|call| call["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}
