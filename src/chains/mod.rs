//! Static chain registry: chain id -> display metadata.
//!
//! Constant for the process lifetime; every other component resolves chain
//! ids against this table before touching the provider.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Display metadata for a supported chain.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChainInfo {
    pub id: u64,
    pub name: &'static str,
    pub explorer_url: &'static str,
}

const CHAINS: &[ChainInfo] = &[
    ChainInfo { id: 1, name: "Ethereum Mainnet", explorer_url: "https://etherscan.io" },
    ChainInfo { id: 10, name: "Optimism Mainnet", explorer_url: "https://optimistic.etherscan.io" },
    ChainInfo { id: 137, name: "Polygon Mainnet", explorer_url: "https://polygonscan.com" },
    ChainInfo { id: 42161, name: "Arbitrum One", explorer_url: "https://arbiscan.io" },
    ChainInfo { id: 8453, name: "Base Mainnet", explorer_url: "https://basescan.org" },
    ChainInfo { id: 11155111, name: "Sepolia Testnet", explorer_url: "https://sepolia.etherscan.io" },
    ChainInfo {
        id: 11155420,
        name: "Optimism Sepolia",
        explorer_url: "https://sepolia-optimism.etherscan.io",
    },
    ChainInfo { id: 80002, name: "Polygon Amoy", explorer_url: "https://amoy.polygonscan.com" },
    ChainInfo { id: 421614, name: "Arbitrum Sepolia", explorer_url: "https://sepolia.arbiscan.io" },
    ChainInfo { id: 84532, name: "Base Sepolia", explorer_url: "https://sepolia.basescan.org" },
];

static BY_ID: Lazy<HashMap<u64, &'static ChainInfo>> =
    Lazy::new(|| CHAINS.iter().map(|c| (c.id, c)).collect());

/// Looks up a chain by id. Absence means the chain is unsupported.
pub fn lookup(chain_id: u64) -> Option<&'static ChainInfo> {
    BY_ID.get(&chain_id).copied()
}

/// All supported chains, in table order.
pub fn supported() -> &'static [ChainInfo] {
    CHAINS
}

/// Block explorer URL for a transaction hash on the given chain.
pub fn explorer_tx_url(chain_id: u64, tx_hash: &str) -> Option<String> {
    lookup(chain_id).map(|chain| format!("{}/tx/{}", chain.explorer_url, tx_hash))
}
