//! On-chain read interface. The validator only ever issues view calls: the
//! ERC-20 metadata trio and the reward-vault-factory lookup.

use std::collections::HashMap;

use alloy_primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

use crate::chain::{self, ChainName, VALID_CHAIN_NAMES};

pub mod abi;
pub mod http;

pub use http::HttpChainClient;

#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Read calls the checker needs. Implementations must tolerate many calls in
/// flight at once; every call is independent and stateless.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn erc20_name(&self, token: Address) -> Result<String, RpcError>;
    async fn erc20_symbol(&self, token: Address) -> Result<String, RpcError>;
    async fn erc20_decimals(&self, token: Address) -> Result<u8, RpcError>;
    async fn vault_for_staking_token(
        &self,
        factory: Address,
        staking_token: Address,
    ) -> Result<Address, RpcError>;
}

/// Explicit per-chain client map handed to the checker at construction time.
/// Keeps the clients out of global state and lets tests substitute doubles.
#[derive(Default)]
pub struct ChainClients {
    clients: HashMap<ChainName, Box<dyn ChainClient>>,
}

impl ChainClients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain: ChainName, client: Box<dyn ChainClient>) {
        self.clients.insert(chain, client);
    }

    pub fn get(&self, chain: ChainName) -> Option<&dyn ChainClient> {
        self.clients.get(&chain).map(Box::as_ref)
    }
}

/// One HTTP client per known chain, endpoints taken from the environment or
/// the chain defaults.
pub fn clients_from_env() -> Result<ChainClients, RpcError> {
    let mut clients = ChainClients::new();
    for chain in VALID_CHAIN_NAMES {
        let client = HttpChainClient::new(chain::rpc_endpoint(*chain))?;
        clients.insert(*chain, Box::new(client));
    }
    Ok(clients)
}
