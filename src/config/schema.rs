//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a greeter
//! session. All types derive Serde traits for deserialization from config files.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Chain ID of the zkSync Era testnet.
pub const DEFAULT_CHAIN_ID: u64 = 280;

/// Address of the deployed Greeter contract on the testnet.
pub const DEFAULT_GREETER_ADDRESS: Address = address!("cA265A121192796216BcC6A991BccF523c72b55e");

/// Root configuration for the greeter session.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GreeterConfig {
    /// Chain RPC settings.
    pub network: NetworkConfig,

    /// Wallet endpoint settings.
    pub wallet: WalletConfig,

    /// Greeter contract location.
    pub contract: ContractConfig,

    /// Tokens offered for fee payment, besides the native asset.
    pub tokens: Vec<TokenConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// The single chain ID a wallet must be connected to.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Receipt polling interval while waiting for inclusion.
    pub confirmation_poll_ms: u64,

    /// Maximum time to wait for a transaction to be included.
    pub confirmation_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://testnet.era.zksync.dev".to_string(),
            failover_urls: Vec::new(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_timeout_secs: 10,
            confirmation_poll_ms: 1000,
            confirmation_timeout_secs: 120,
        }
    }
}

/// Wallet endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// URL of the wallet's JSON-RPC endpoint (EIP-1193 methods over HTTP).
    pub rpc_url: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:1248".to_string(),
        }
    }
}

/// Greeter contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the Greeter contract on the execution chain.
    pub greeter_address: Address,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            greeter_address: DEFAULT_GREETER_ADDRESS,
        }
    }
}

/// An entry of the fee token list, keyed by its origin-chain address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Token contract address on the origin chain.
    pub address: Address,

    /// Number of decimals used for display.
    pub decimals: u8,

    /// Ticker symbol.
    pub symbol: String,

    /// Human readable name.
    #[serde(default)]
    pub name: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
