//! Chain-specific types and error definitions.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gas-per-pubdata limit attached to every zkSync EIP-712 transaction.
pub const DEFAULT_GAS_PER_PUBDATA_LIMIT: u64 = 50_000;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not included within the configured wait.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// The wallet refused or failed a request.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The wallet authorized no accounts.
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// Contract call data could not be decoded.
    #[error("ABI error: {0}")]
    Abi(String),

    /// An amount did not fit in 256 bits.
    #[error("Amount overflow: {0}")]
    Overflow(String),

    /// Blockchain client not initialized or disabled.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Paymaster parameters attached to a zkSync transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterParams {
    /// Paymaster contract that fronts the fee.
    pub paymaster: Address,
    /// Encoded paymaster flow call.
    pub paymaster_input: Bytes,
}

/// Fee overrides for a `setGreeting` transaction.
///
/// `FeeOverrides::default()` means "pay natively, let the wallet fill in fees".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeOverrides {
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub gas_limit: Option<U256>,
    pub gas_per_pubdata: Option<U256>,
    pub paymaster_params: Option<PaymasterParams>,
}

impl FeeOverrides {
    /// Overrides that only attach paymaster params, used for gas estimation.
    pub fn with_paymaster(params: PaymasterParams) -> Self {
        Self {
            gas_per_pubdata: Some(U256::from(DEFAULT_GAS_PER_PUBDATA_LIMIT)),
            paymaster_params: Some(params),
            ..Self::default()
        }
    }

    /// True when nothing is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
