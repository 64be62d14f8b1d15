//! Shared helpers for the mock-node integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::time::Duration;
use vaultrpc::prelude::*;
use wiremock::{Request, Respond, ResponseTemplate};

pub const PACKAGE: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const VAULT: &str = "0xabcdef1234567890abcdef1234567890abcdef12";
pub const COIN: &str = "0x00000000000000000000000000000000000000c0";
pub const SENDER: &str = "0x9999999999999999999999999999999999999999";
pub const DIGEST: &str = "5Q6aqkTQ9MnPGQHs9GxwLmbhbQAWZdTNnVEmWBi7Pvd3";

/// Configuration pointed at a mock server, with short backoff.
pub fn mock_config(uri: &str) -> RpcConfig {
    let retry = RetryConfig {
        base_delay_ms: 10,
        max_delay_ms: 50,
        jitter_factor: 0.0,
        ..RetryConfig::default()
    };
    RpcConfig::new(uri)
        .with_timeout(Duration::from_secs(5))
        .with_retry_config(retry)
}

fn request_id(request: &Request) -> Value {
    request
        .body_json::<Value>()
        .ok()
        .and_then(|body| body.get("id").cloned())
        .unwrap_or(Value::Null)
}

/// Echoes the request id back with `result`.
pub fn rpc_result(result: Value) -> impl Respond {
    rpc_result_after(result, Duration::ZERO)
}

/// Like [`rpc_result`], answering only after `delay`.
pub fn rpc_result_after(result: Value, delay: Duration) -> impl Respond {
    move |request: &Request| {
        ResponseTemplate::new(200)
            .set_body_json(json!({
                "jsonrpc": "2.0",
                "id": request_id(request),
                "result": result.clone(),
            }))
            .set_delay(delay)
    }
}

/// Echoes the request id back with a JSON-RPC error object.
pub fn rpc_error(status: u16, code: i64, message: &'static str) -> impl Respond {
    move |request: &Request| {
        ResponseTemplate::new(status).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": request_id(request),
            "error": {"code": code, "message": message},
        }))
    }
}

/// Signer with a fixed address that tags the bytes it signs.
#[derive(Debug)]
pub struct FixedSigner {
    address: Address,
}

impl FixedSigner {
    pub fn new() -> Self {
        Self {
            address: Address::parse(SENDER).expect("valid sender"),
        }
    }
}

#[async_trait::async_trait]
impl Signer for FixedSigner {
    fn address(&self) -> &Address {
        &self.address
    }

    async fn sign(&self, tx_bytes: &str) -> Result<Signature> {
        Ok(Signature {
            signature: format!("signed:{tx_bytes}"),
            scheme: SignatureScheme::Ed25519,
            public_key: "cHVibGljLWtleQ==".to_string(),
        })
    }
}
