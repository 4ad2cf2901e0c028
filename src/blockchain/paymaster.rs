//! Paymaster flow encoding.
//!
//! zkSync paymasters receive their instructions as ABI-encoded calls of the
//! `IPaymasterFlow` interface in the transaction's `paymasterInput`. The
//! approval-based flow lets the paymaster pull up to `minAllowance` of `token`
//! from the sender as repayment for the fee it covers.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult, PaymasterParams};

sol! {
    interface IPaymasterFlow {
        function general(bytes input) external;
        function approvalBased(address _token, uint256 _minAllowance, bytes _innerInput) external;
    }
}

/// Allowance used for the first, estimation-only pass.
pub const MINIMAL_ALLOWANCE: U256 = U256::from_limbs([1, 0, 0, 0]);

/// Build approval-based paymaster params.
pub fn approval_based_params(
    paymaster: Address,
    token: Address,
    min_allowance: U256,
    inner_input: Bytes,
) -> PaymasterParams {
    let call = IPaymasterFlow::approvalBasedCall {
        _token: token,
        _minAllowance: min_allowance,
        _innerInput: inner_input,
    };
    PaymasterParams {
        paymaster,
        paymaster_input: Bytes::from(call.abi_encode()),
    }
}

/// Decoded approval-based flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalBased {
    pub token: Address,
    pub min_allowance: U256,
    pub inner_input: Bytes,
}

/// Decode the approval-based flow carried in `params`.
pub fn decode_approval_based(params: &PaymasterParams) -> BlockchainResult<ApprovalBased> {
    let call = IPaymasterFlow::approvalBasedCall::abi_decode(&params.paymaster_input)
        .map_err(|e| BlockchainError::Abi(format!("Not an approval-based paymaster input: {}", e)))?;
    Ok(ApprovalBased {
        token: call._token,
        min_allowance: call._minAllowance,
        inner_input: call._innerInput,
    })
}
