//! Wallet connector over an EIP-1193 JSON-RPC endpoint.
//!
//! # Security
//! - This crate never holds private keys
//! - Account access and signing are requested from the wallet endpoint
//! - The wallet must understand zkSync `eip712Meta` to sign paymaster transactions

use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::client::{connect_http, DynProvider, RpcChainProvider};
use crate::blockchain::contract::RpcGreeter;
use crate::blockchain::traits::{ConnectionContext, WalletConnector};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::GreeterConfig;

/// A wallet reached through its JSON-RPC endpoint.
#[derive(Clone)]
pub struct Eip1193Wallet {
    /// Provider pointed at the wallet endpoint.
    wallet: DynProvider,
    /// Chain reads bypass the wallet and use the configured node.
    chain: RpcChainProvider,
    /// Contract bound on connect.
    greeter_address: Address,
}

impl Eip1193Wallet {
    /// Create a connector from the session configuration.
    pub fn from_config(config: &GreeterConfig) -> BlockchainResult<Self> {
        let wallet = connect_http(&config.wallet.rpc_url)
            .map_err(|e| BlockchainError::Wallet(format!("Invalid wallet endpoint: {}", e)))?;
        let chain = RpcChainProvider::new(config.network.clone())?;

        tracing::info!(
            wallet_url = %config.wallet.rpc_url,
            greeter = %config.contract.greeter_address,
            "Wallet connector initialized"
        );

        Ok(Self {
            wallet,
            chain,
            greeter_address: config.contract.greeter_address,
        })
    }
}

#[async_trait]
impl WalletConnector for Eip1193Wallet {
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.wallet
            .client()
            .request_noparams::<Vec<Address>>("eth_requestAccounts")
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Account access denied: {}", e)))
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.wallet
            .get_chain_id()
            .await
            .map(ChainId)
            .map_err(|e| BlockchainError::Wallet(e.to_string()))
    }

    fn bind(&self, account: Address) -> BlockchainResult<ConnectionContext> {
        let greeter = RpcGreeter::new(self.greeter_address, account, self.chain.clone(), self.wallet.clone());
        Ok(ConnectionContext {
            provider: Arc::new(self.chain.clone()),
            account,
            contract: Arc::new(greeter),
        })
    }
}

impl std::fmt::Debug for Eip1193Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eip1193Wallet")
            .field("chain", &self.chain)
            .field("greeter_address", &self.greeter_address)
            .finish()
    }
}
