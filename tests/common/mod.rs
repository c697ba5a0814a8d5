//! Common utilities for integration tests.

use std::time::Duration;

use contract_session::{Config, ContractSessionServer, DEFAULT_GAS_LIMIT};
use serde_json::{json, Value};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

/// Well-known Hardhat/Anvil development key. DO NOT use in production.
pub const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Path to the ERC20 ABI fixture.
pub fn fixture_abi_path() -> String {
    format!("{}/tests/fixtures/erc20.json", env!("CARGO_MANIFEST_DIR"))
}

/// Configuration pointing at a node that is never contacted.
pub fn offline_config() -> Config {
    Config {
        rpc_url: "http://127.0.0.1:8545".to_string(),
        private_key: DEV_PRIVATE_KEY.to_string(),
        contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        abi_path: fixture_abi_path(),
        gas_limit: DEFAULT_GAS_LIMIT,
        receipt_poll_interval: Duration::from_millis(100),
        log_level: "warn".to_string(),
    }
}

/// Helper to create a server bound to a live node from environment variables.
pub fn create_live_server() -> Option<ContractSessionServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().ok()?;

    ContractSessionServer::new(config).ok()
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_live_server() {
            Some(server) => server,
            None => {
                eprintln!(
                    "Skipping test: ETHEREUM_RPC_URL, ETHEREUM_PRIVATE_KEY, CONTRACT_ADDRESS or CONTRACT_ABI_PATH not set"
                );
                return;
            }
        }
    };
}

/// Start a local JSON-RPC node that accepts transactions but never mines them.
///
/// Returns the node's URL. `eth_call` always answers with the uint 18.
pub async fn spawn_stalled_node() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_connection(stream));
        }
    });

    format!("http://{}", addr)
}

async fn serve_connection(stream: TcpStream) {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        // Request line, then headers until the blank line.
        line.clear();
        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
            return;
        }

        let mut content_length = 0usize;
        loop {
            line.clear();
            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                return;
            }
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        if reader.read_exact(&mut body).await.is_err() {
            return;
        }

        let request: Value = serde_json::from_slice(&body).unwrap_or_default();
        let response = rpc_response(&request).to_string();
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            response.len(),
            response
        );
        if reader.get_mut().write_all(reply.as_bytes()).await.is_err() {
            return;
        }
    }
}

fn rpc_response(request: &Value) -> Value {
    if let Value::Array(batch) = request {
        return Value::Array(batch.iter().map(rpc_response).collect());
    }

    let result = match request["method"].as_str().unwrap_or_default() {
        "eth_chainId" => json!("0x7a69"),
        "eth_getTransactionCount" => json!("0x0"),
        "eth_gasPrice" => json!("0x3b9aca00"),
        "eth_sendRawTransaction" => json!(format!("0x{}", "ab".repeat(32))),
        "eth_call" => json!(format!("0x{:064x}", 18)),
        // eth_getTransactionReceipt: never mined
        _ => Value::Null,
    };

    json!({ "jsonrpc": "2.0", "id": request["id"], "result": result })
}
