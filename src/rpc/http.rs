//! JSON-RPC `eth_call` client over HTTP, with a per-call timeout and bounded
//! retry. RPC-level errors (reverts, bad params) are not retried; transport
//! and decode failures are.

use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::rpc::{abi, ChainClient, RpcError};

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

pub struct HttpChainClient {
    http: Client,
    endpoint: String,
    retries: u32,
    retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl HttpChainClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RpcError> {
        let http = Client::builder()
            .timeout(DEFAULT_CALL_TIMEOUT)
            .build()
            .map_err(|err| RpcError::Transport(err.to_string()))?;
        Ok(HttpChainClient {
            http,
            endpoint: endpoint.into(),
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    pub fn with_retries(mut self, retries: u32, retry_delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = retry_delay;
        self
    }

    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": to.to_checksum(None), "data": abi::encode_hex(&data) },
                "latest",
            ],
        });

        let mut last_error = RpcError::Transport("no attempts made".to_string());
        for attempt in 0..=self.retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay * attempt).await;
            }
            match self.try_call(&payload).await {
                Ok(bytes) => return Ok(bytes),
                Err(err @ RpcError::Rpc { .. }) => return Err(err),
                Err(err) => last_error = err,
            }
        }
        Err(last_error)
    }

    async fn try_call(&self, payload: &serde_json::Value) -> Result<Vec<u8>, RpcError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;
        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;

        if let Some(error) = body.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        let result = body
            .result
            .ok_or_else(|| RpcError::Decode("response carries neither result nor error".to_string()))?;
        abi::decode_hex(&result)
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn erc20_name(&self, token: Address) -> Result<String, RpcError> {
        let data = self.eth_call(token, abi::encode_call("name()")).await?;
        abi::decode_string(&data)
    }

    async fn erc20_symbol(&self, token: Address) -> Result<String, RpcError> {
        let data = self.eth_call(token, abi::encode_call("symbol()")).await?;
        abi::decode_string(&data)
    }

    async fn erc20_decimals(&self, token: Address) -> Result<u8, RpcError> {
        let data = self.eth_call(token, abi::encode_call("decimals()")).await?;
        abi::decode_u8(&data)
    }

    async fn vault_for_staking_token(
        &self,
        factory: Address,
        staking_token: Address,
    ) -> Result<Address, RpcError> {
        let data = self
            .eth_call(factory, abi::encode_call_address("getVault(address)", staking_token))
            .await?;
        abi::decode_address(&data)
    }
}
