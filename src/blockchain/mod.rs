//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet endpoint (account access, chain id, signing)
//!     → wallet.rs (EIP-1193 connector, binds the connection)
//!     → client.rs (chain RPC with timeouts and failover)
//!     → contract.rs (Greeter reads, estimates, dispatch, inclusion)
//!     → paymaster.rs (approval-based fee relay params)
//! ```
//!
//! # Security Constraints
//! - No private keys in this process; the wallet signs
//! - All chain RPC calls have configurable timeouts
//! - Graceful degradation when a paymaster is unavailable

pub mod client;
pub mod contract;
pub mod paymaster;
pub mod traits;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::RpcChainProvider;
pub use contract::RpcGreeter;
pub use traits::{ChainProvider, ConnectionContext, GreeterContract, PendingTransaction, WalletConnector};
pub use types::{BlockchainError, BlockchainResult, ChainId, FeeOverrides, PaymasterParams};
pub use wallet::Eip1193Wallet;
