//! Fee arithmetic and display formatting for token amounts.

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Fee for `gas_limit` units of gas at `gas_price`.
pub fn fee_amount(gas_limit: U256, gas_price: U256) -> BlockchainResult<U256> {
    gas_limit
        .checked_mul(gas_price)
        .ok_or_else(|| BlockchainError::Overflow(format!("{} gas at {} per gas", gas_limit, gas_price)))
}

/// Format `amount` shifted by `decimals`, trimming trailing zeros.
///
/// Always keeps at least one fractional digit: `0` → `"0.0"`,
/// `1.5e18` with 18 decimals → `"1.5"`.
pub fn format_amount(amount: U256, decimals: u8) -> BlockchainResult<String> {
    let formatted = format_units(amount, decimals)
        .map_err(|e| BlockchainError::Abi(format!("Cannot format with {} decimals: {}", decimals, e)))?;

    let Some((whole, fraction)) = formatted.split_once('.') else {
        return Ok(format!("{}.0", formatted));
    };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(format!("{}.0", whole))
    } else {
        Ok(format!("{}.{}", whole, fraction))
    }
}
