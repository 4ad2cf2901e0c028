//! Chain RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Query chain state (gas price, balances, token mapping, paymaster)
//! - Handle timeouts and network errors gracefully

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::timeout;

use crate::blockchain::traits::ChainProvider;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::NetworkConfig;

sol! {
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }

    interface IL2Bridge {
        function l2TokenAddress(address _l1Token) external view returns (address);
    }
}

/// Bridge addresses reported by `zks_getBridgeContracts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeContracts {
    pub l2_erc20_default_bridge: Option<Address>,
}

pub(crate) type DynProvider = Arc<dyn Provider + Send + Sync>;

pub(crate) fn rpc_err(e: impl std::fmt::Display) -> BlockchainError {
    BlockchainError::Rpc(e.to_string())
}

/// Build an HTTP provider for `url`.
pub(crate) fn connect_http(url: &str) -> BlockchainResult<DynProvider> {
    let parsed: url::Url = url
        .parse()
        .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", url, e)))?;
    Ok(Arc::new(ProviderBuilder::new().connect_http(parsed)) as DynProvider)
}

/// Chain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct RpcChainProvider {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: NetworkConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcChainProvider {
    /// Create a new client from the network configuration.
    ///
    /// Invalid failover URLs are skipped; an invalid primary URL is an error.
    pub fn new(config: NetworkConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = vec![connect_http(&config.rpc_url)?];

        for url_str in &config.failover_urls {
            match connect_http(url_str) {
                Ok(provider) => providers.push(provider),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            chain_id = config.chain_id,
            "Chain provider initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Run `op` against each provider in turn until one answers in time.
    pub(crate) async fn with_failover<T, F, Fut>(&self, what: &str, op: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = BlockchainResult<T>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, what, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, what, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc(format!("All RPC providers failed to get {}", what)))
    }

    /// Bridge contracts of the connected network.
    pub async fn bridge_contracts(&self) -> BlockchainResult<BridgeContracts> {
        self.with_failover("bridge contracts", |p| async move {
            p.client()
                .request_noparams::<BridgeContracts>("zks_getBridgeContracts")
                .await
                .map_err(rpc_err)
        })
        .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[async_trait]
impl ChainProvider for RpcChainProvider {
    async fn gas_price(&self) -> BlockchainResult<U256> {
        self.with_failover("gas price", |p| async move {
            p.get_gas_price().await.map(U256::from).map_err(rpc_err)
        })
        .await
    }

    async fn native_balance(&self, owner: Address) -> BlockchainResult<U256> {
        self.with_failover("balance", |p| async move {
            p.get_balance(owner).await.map_err(rpc_err)
        })
        .await
    }

    async fn token_balance(&self, owner: Address, token: Address) -> BlockchainResult<U256> {
        let input = IERC20::balanceOfCall { account: owner }.abi_encode();
        self.with_failover("token balance", |p| {
            let tx = TransactionRequest::default()
                .with_to(token)
                .with_input(input.clone());
            async move {
                let out = p.call(tx).await.map_err(rpc_err)?;
                IERC20::balanceOfCall::abi_decode_returns(&out)
                    .map_err(|e| BlockchainError::Abi(e.to_string()))
            }
        })
        .await
    }

    async fn target_token_address(&self, origin: Address) -> BlockchainResult<Address> {
        // The native asset keeps its placeholder address on both chains.
        if origin == Address::ZERO {
            return Ok(Address::ZERO);
        }

        let bridge = self
            .bridge_contracts()
            .await?
            .l2_erc20_default_bridge
            .ok_or_else(|| BlockchainError::NotAvailable("no default ERC-20 bridge".to_string()))?;

        let input = IL2Bridge::l2TokenAddressCall { _l1Token: origin }.abi_encode();
        self.with_failover("token address", |p| {
            let tx = TransactionRequest::default()
                .with_to(bridge)
                .with_input(input.clone());
            async move {
                let out = p.call(tx).await.map_err(rpc_err)?;
                IL2Bridge::l2TokenAddressCall::abi_decode_returns(&out)
                    .map_err(|e| BlockchainError::Abi(e.to_string()))
            }
        })
        .await
    }

    async fn fee_relay_address(&self) -> BlockchainResult<Option<Address>> {
        self.with_failover("testnet paymaster", |p| async move {
            p.client()
                .request_noparams::<Option<Address>>("zks_getTestnetPaymaster")
                .await
                .map_err(rpc_err)
        })
        .await
    }
}

impl std::fmt::Debug for RpcChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainProvider")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
