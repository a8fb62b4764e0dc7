//! Chain identity and per-chain constants: reward vault factories, RPC endpoints.

use std::fmt;

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainName {
    Mainnet,
    Bepolia,
}

pub const VALID_CHAIN_NAMES: &[ChainName] = &[ChainName::Mainnet, ChainName::Bepolia];

/// Repository-wide default for checksum-casing enforcement. The runtime policy
/// lives in [crate::validate::ValidationOptions]; this is only the default.
pub const CASE_SENSITIVE_ADDRESSES: bool = true;

/// The native gas token is declared with the zero address and has no contract
/// to read; on-chain checks skip records carrying it.
pub const NATIVE_TOKEN_SENTINEL: Address = Address::ZERO;

impl ChainName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Bepolia => "bepolia",
        }
    }

    /// Parse a chain name as it appears in registry file stems. Returns None
    /// for anything that is not a recognized chain.
    pub fn parse(value: &str) -> Option<ChainName> {
        match value {
            "mainnet" => Some(Self::Mainnet),
            "bepolia" => Some(Self::Bepolia),
            _ => None,
        }
    }
}

impl fmt::Display for ChainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Factory contract mapping a staking token to its deployed reward vault.
/// Deployed at the same address on both chains.
pub fn reward_vault_factory(chain: ChainName) -> Address {
    match chain {
        ChainName::Mainnet | ChainName::Bepolia => {
            address!("0x94Ad6Ac84f6C6FbA8b8CCbD71d9f4f101def52a8")
        }
    }
}

/// Default public JSON-RPC endpoint for a chain. Overridable per chain via
/// CHAINMETA_RPC_MAINNET / CHAINMETA_RPC_BEPOLIA.
pub fn default_rpc_endpoint(chain: ChainName) -> &'static str {
    match chain {
        ChainName::Mainnet => "https://rpc.berachain.com",
        ChainName::Bepolia => "https://bepolia.rpc.berachain.com",
    }
}

pub fn rpc_endpoint_env_var(chain: ChainName) -> &'static str {
    match chain {
        ChainName::Mainnet => "CHAINMETA_RPC_MAINNET",
        ChainName::Bepolia => "CHAINMETA_RPC_BEPOLIA",
    }
}

pub fn rpc_endpoint(chain: ChainName) -> String {
    std::env::var(rpc_endpoint_env_var(chain))
        .unwrap_or_else(|_| default_rpc_endpoint(chain).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_valid_chain() {
        for chain in VALID_CHAIN_NAMES {
            assert_eq!(ChainName::parse(chain.as_str()), Some(*chain));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(ChainName::parse("testnet"), None);
        assert_eq!(ChainName::parse("Mainnet"), None);
        assert_eq!(ChainName::parse(""), None);
    }
}
