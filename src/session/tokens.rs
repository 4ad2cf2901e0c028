//! Fee token catalogue.

use alloy::primitives::Address;
use serde::Serialize;

use crate::config::TokenConfig;

/// Origin address used as the native asset placeholder.
pub const NATIVE_ASSET_ADDRESS: Address = Address::ZERO;

/// A token resolved for fee payment on the execution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDescriptor {
    /// Address on the token's origin chain.
    pub origin_address: Address,
    /// Address on the execution chain.
    pub target_address: Address,
    pub decimals: u8,
    pub symbol: String,
}

impl TokenDescriptor {
    pub fn is_native(&self) -> bool {
        self.origin_address == NATIVE_ASSET_ADDRESS
    }
}

/// The configured token list plus the implicit native asset.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: Vec<TokenConfig>,
}

impl TokenList {
    pub fn new(tokens: Vec<TokenConfig>) -> Self {
        Self { tokens }
    }

    /// The native asset entry.
    pub fn native() -> TokenConfig {
        TokenConfig {
            address: NATIVE_ASSET_ADDRESS,
            decimals: 18,
            symbol: "ETH".to_string(),
            name: "Ether".to_string(),
        }
    }

    /// Look up an entry by origin-chain address.
    pub fn find(&self, origin: Address) -> Option<TokenConfig> {
        if origin == NATIVE_ASSET_ADDRESS {
            return Some(Self::native());
        }
        self.tokens.iter().find(|t| t.address == origin).cloned()
    }

    /// Selectable entries, native asset first.
    pub fn entries(&self) -> Vec<TokenConfig> {
        std::iter::once(Self::native())
            .chain(self.tokens.iter().cloned())
            .collect()
    }
}
