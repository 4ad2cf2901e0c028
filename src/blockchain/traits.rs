//! Collaborator seams consumed by the session controller.
//!
//! The controller never talks to a wallet, RPC node or contract directly; it
//! is handed implementations of these traits. The alloy-backed adapters live
//! next to this module, tests supply in-memory fakes.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainResult, ChainId, FeeOverrides};

/// Account access and network identity of the user's wallet.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Ask the wallet to authorize its accounts.
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    /// Bind provider and contract handles for an authorized account.
    fn bind(&self, account: Address) -> BlockchainResult<ConnectionContext>;
}

/// Read access to the execution chain.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Current gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<U256>;

    /// Native asset balance of `owner`.
    async fn native_balance(&self, owner: Address) -> BlockchainResult<U256>;

    /// Balance of `owner` in the token deployed at `token` on this chain.
    async fn token_balance(&self, owner: Address, token: Address) -> BlockchainResult<U256>;

    /// Map a token's origin-chain address to its address on this chain.
    async fn target_token_address(&self, origin: Address) -> BlockchainResult<Address>;

    /// Paymaster available on this network, if any.
    async fn fee_relay_address(&self) -> BlockchainResult<Option<Address>>;
}

/// Handle to the Greeter contract, bound to the signing account.
#[async_trait]
pub trait GreeterContract: Send + Sync {
    /// Read the stored greeting.
    async fn greet(&self) -> BlockchainResult<String>;

    /// Estimate gas for `setGreeting(text)` with `overrides` attached.
    async fn estimate_set_greeting(&self, text: &str, overrides: &FeeOverrides) -> BlockchainResult<U256>;

    /// Dispatch `setGreeting(text)`; resolves once the network accepted it.
    async fn set_greeting(
        &self,
        text: &str,
        overrides: FeeOverrides,
    ) -> BlockchainResult<Box<dyn PendingTransaction>>;
}

/// A dispatched transaction awaiting inclusion.
#[async_trait]
pub trait PendingTransaction: Send + Sync {
    fn tx_hash(&self) -> TxHash;

    /// Wait until the transaction is included; fails if it reverted.
    async fn wait(&self) -> BlockchainResult<()>;
}

/// Handles bound on a successful connect.
///
/// Built in one piece so the provider, account and contract are always present
/// together.
#[derive(Clone)]
pub struct ConnectionContext {
    pub provider: Arc<dyn ChainProvider>,
    pub account: Address,
    pub contract: Arc<dyn GreeterContract>,
}

impl std::fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}
