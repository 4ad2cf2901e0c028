//! Greeter contract binding.
//!
//! # Responsibilities
//! - Read the greeting through `eth_call`
//! - Estimate `setGreeting` gas with zkSync `eip712Meta` attached
//! - Dispatch `setGreeting` through the wallet, which signs
//! - Poll for inclusion
//!
//! Receipts are read as loose JSON: zkSync EIP-712 receipts carry a
//! transaction type the Ethereum receipt envelope does not know.

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256, U64};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::{interval, timeout};

use crate::blockchain::client::{rpc_err, DynProvider, RpcChainProvider};
use crate::blockchain::traits::{GreeterContract, PendingTransaction};
use crate::blockchain::types::{BlockchainError, BlockchainResult, FeeOverrides, PaymasterParams};

sol! {
    interface IGreeter {
        function greet() external view returns (string);
        function setGreeting(string _greeting) external;
    }
}

/// zkSync EIP-712 transaction type.
pub const EIP712_TX_TYPE: u64 = 0x71;

/// zkSync-specific transaction metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Meta {
    pub gas_per_pubdata: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster_params: Option<PaymasterParams>,
}

/// Call/transaction request in the shape zkSync nodes and wallets accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkCallRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip712_meta: Option<Eip712Meta>,
}

impl ZkCallRequest {
    /// Build a request for `data` sent to `to`, applying `overrides`.
    pub fn new(from: Address, to: Address, data: Bytes, overrides: &FeeOverrides) -> Self {
        let eip712_meta = overrides.gas_per_pubdata.map(|gas_per_pubdata| Eip712Meta {
            gas_per_pubdata,
            paymaster_params: overrides.paymaster_params.clone(),
        });
        Self {
            from,
            to,
            data,
            tx_type: eip712_meta.as_ref().map(|_| U64::from(EIP712_TX_TYPE)),
            gas: overrides.gas_limit,
            max_fee_per_gas: overrides.max_fee_per_gas,
            max_priority_fee_per_gas: overrides.max_priority_fee_per_gas,
            eip712_meta,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptStatus {
    status: Option<U64>,
    block_number: Option<U64>,
}

/// Greeter contract reached over JSON-RPC.
#[derive(Clone)]
pub struct RpcGreeter {
    address: Address,
    account: Address,
    chain: RpcChainProvider,
    wallet: DynProvider,
}

impl RpcGreeter {
    /// Bind the contract at `address` to `account`.
    ///
    /// Reads and estimates go to `chain`; transactions go to `wallet`.
    pub fn new(address: Address, account: Address, chain: RpcChainProvider, wallet: DynProvider) -> Self {
        Self {
            address,
            account,
            chain,
            wallet,
        }
    }

    fn set_greeting_request(&self, text: &str, overrides: &FeeOverrides) -> ZkCallRequest {
        let data = IGreeter::setGreetingCall {
            _greeting: text.to_string(),
        }
        .abi_encode();
        ZkCallRequest::new(self.account, self.address, Bytes::from(data), overrides)
    }
}

#[async_trait]
impl GreeterContract for RpcGreeter {
    async fn greet(&self) -> BlockchainResult<String> {
        let input = IGreeter::greetCall {}.abi_encode();
        let to = self.address;
        self.chain
            .with_failover("greeting", |p| {
                let tx = TransactionRequest::default().with_to(to).with_input(input.clone());
                async move {
                    let out = p.call(tx).await.map_err(rpc_err)?;
                    IGreeter::greetCall::abi_decode_returns(&out)
                        .map_err(|e| BlockchainError::Abi(e.to_string()))
                }
            })
            .await
    }

    async fn estimate_set_greeting(&self, text: &str, overrides: &FeeOverrides) -> BlockchainResult<U256> {
        let request = self.set_greeting_request(text, overrides);
        self.chain
            .with_failover("gas estimate", |p| {
                let request = request.clone();
                async move {
                    p.client()
                        .request::<_, U256>("eth_estimateGas", (request,))
                        .await
                        .map_err(rpc_err)
                }
            })
            .await
    }

    async fn set_greeting(
        &self,
        text: &str,
        overrides: FeeOverrides,
    ) -> BlockchainResult<Box<dyn PendingTransaction>> {
        let request = self.set_greeting_request(text, &overrides);
        let tx_hash: TxHash = self
            .wallet
            .client()
            .request::<_, TxHash>("eth_sendTransaction", (request,))
            .await
            .map_err(|e| BlockchainError::Wallet(e.to_string()))?;

        tracing::info!(tx_hash = %tx_hash, contract = %self.address, "setGreeting dispatched");

        let network = self.chain.config();
        Ok(Box::new(RpcPendingTransaction {
            tx_hash,
            chain: self.chain.clone(),
            poll_interval: Duration::from_millis(network.confirmation_poll_ms),
            max_wait: Duration::from_secs(network.confirmation_timeout_secs),
        }))
    }
}

impl std::fmt::Debug for RpcGreeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcGreeter")
            .field("address", &self.address)
            .field("account", &self.account)
            .finish()
    }
}

/// A transaction polled for its receipt.
struct RpcPendingTransaction {
    tx_hash: TxHash,
    chain: RpcChainProvider,
    poll_interval: Duration,
    max_wait: Duration,
}

#[async_trait]
impl PendingTransaction for RpcPendingTransaction {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn wait(&self) -> BlockchainResult<()> {
        let tx_hash = self.tx_hash;
        let result = timeout(self.max_wait, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                let receipt = self
                    .chain
                    .with_failover("receipt", |p| async move {
                        p.client()
                            .request::<_, Option<ReceiptStatus>>("eth_getTransactionReceipt", (tx_hash,))
                            .await
                            .map_err(rpc_err)
                    })
                    .await?;

                let Some(receipt) = receipt else {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                };
                // Receipts exist before the block is sealed on zkSync.
                let Some(block_number) = receipt.block_number else {
                    continue;
                };

                if receipt.status != Some(U64::from(1)) {
                    return Err(BlockchainError::Reverted(tx_hash.to_string()));
                }

                tracing::info!(tx_hash = %tx_hash, block_number = %block_number, "Transaction included");
                return Ok(());
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(self.max_wait.as_secs())),
        }
    }
}
