//! In-memory collaborators for session tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, TxHash, B256, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use greeter_session::blockchain::{
    BlockchainError, BlockchainResult, ChainId, ChainProvider, ConnectionContext, FeeOverrides,
    GreeterContract, PendingTransaction, WalletConnector,
};
use greeter_session::config::TokenConfig;
use greeter_session::session::{SessionController, TokenList};

pub const TARGET_CHAIN: u64 = 280;
pub const ACCOUNT: Address = address!("36615Cf349d7F6344891B1e7CA7C72883F5dc049");
pub const PAYMASTER: Address = address!("8f0ea1312da29f17eabeb2f484fd3c112cccdd63");

pub const DAI_L1: Address = address!("5C221E77624690fff6dd741493D735a17716c26B");
pub const DAI_L2: Address = address!("3e7676937A7E96CFB7616f255b9AD9FF47363D4b");
pub const USDC_L1: Address = address!("d35CCeEAD182dcee0F148EbaC9447DA2c4D449c4");
pub const USDC_L2: Address = address!("0faF6df7054946141266420b43783387A78d82A9");

/// 0.25 gwei
pub const GAS_PRICE: u64 = 250_000_000;
/// Gas for `setGreeting` paid natively.
pub const BASE_GAS: u64 = 30_000;
/// Extra gas the paymaster flow costs.
pub const PAYMASTER_GAS: u64 = 12_000;

pub fn token_list() -> TokenList {
    TokenList::new(vec![
        TokenConfig {
            address: DAI_L1,
            decimals: 18,
            symbol: "DAI".to_string(),
            name: "DAI".to_string(),
        },
        TokenConfig {
            address: USDC_L1,
            decimals: 6,
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
        },
    ])
}

/// Fake chain provider with call counters and failure switches.
pub struct FakeChain {
    pub paymaster: Mutex<Option<Address>>,
    pub gas_price: U256,
    pub native_balance: U256,
    pub token_balances: HashMap<Address, U256>,
    pub token_map: HashMap<Address, Address>,
    pub fail_gas_price: AtomicBool,
    pub fail_token_mapping: AtomicBool,
    pub native_balance_calls: AtomicUsize,
    pub token_balance_calls: Mutex<Vec<Address>>,
    /// When set, `native_balance()` blocks until notified.
    pub hold_native_balance: Option<Arc<Notify>>,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            paymaster: Mutex::new(Some(PAYMASTER)),
            gas_price: U256::from(GAS_PRICE),
            native_balance: U256::from(1_500_000_000_000_000_000u128),
            token_balances: HashMap::from([
                (DAI_L2, U256::from(25_000_000_000_000_000_000u128)),
                (USDC_L2, U256::from(12_340_000u64)),
            ]),
            token_map: HashMap::from([
                (Address::ZERO, Address::ZERO),
                (DAI_L1, DAI_L2),
                (USDC_L1, USDC_L2),
            ]),
            fail_gas_price: AtomicBool::new(false),
            fail_token_mapping: AtomicBool::new(false),
            native_balance_calls: AtomicUsize::new(0),
            token_balance_calls: Mutex::new(Vec::new()),
            hold_native_balance: None,
        }
    }
}

#[async_trait]
impl ChainProvider for FakeChain {
    async fn gas_price(&self) -> BlockchainResult<U256> {
        if self.fail_gas_price.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("gas price unavailable".to_string()));
        }
        Ok(self.gas_price)
    }

    async fn native_balance(&self, owner: Address) -> BlockchainResult<U256> {
        assert_eq!(owner, ACCOUNT);
        self.native_balance_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.hold_native_balance {
            hold.notified().await;
        }
        Ok(self.native_balance)
    }

    async fn token_balance(&self, owner: Address, token: Address) -> BlockchainResult<U256> {
        assert_eq!(owner, ACCOUNT);
        self.token_balance_calls.lock().unwrap().push(token);
        self.token_balances
            .get(&token)
            .copied()
            .ok_or_else(|| BlockchainError::Rpc(format!("no balance for {}", token)))
    }

    async fn target_token_address(&self, origin: Address) -> BlockchainResult<Address> {
        if self.fail_token_mapping.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("bridge unavailable".to_string()));
        }
        self.token_map
            .get(&origin)
            .copied()
            .ok_or_else(|| BlockchainError::Rpc(format!("unmapped {}", origin)))
    }

    async fn fee_relay_address(&self) -> BlockchainResult<Option<Address>> {
        Ok(*self.paymaster.lock().unwrap())
    }
}

/// Fake Greeter contract. Inclusion of a transaction stores its greeting.
pub struct FakeGreeter {
    pub greeting: Arc<Mutex<String>>,
    pub estimates: Mutex<Vec<FeeOverrides>>,
    pub submitted: Mutex<Vec<(String, FeeOverrides)>>,
    pub fail_greet: AtomicBool,
    pub fail_estimate: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_wait: AtomicBool,
    /// When set, `wait()` blocks until notified.
    pub hold_wait: Option<Arc<Notify>>,
}

impl FakeGreeter {
    pub fn new(greeting: &str) -> Self {
        Self {
            greeting: Arc::new(Mutex::new(greeting.to_string())),
            estimates: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            fail_greet: AtomicBool::new(false),
            fail_estimate: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fail_wait: AtomicBool::new(false),
            hold_wait: None,
        }
    }

    pub fn estimate_count(&self) -> usize {
        self.estimates.lock().unwrap().len()
    }
}

#[async_trait]
impl GreeterContract for FakeGreeter {
    async fn greet(&self) -> BlockchainResult<String> {
        if self.fail_greet.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("call failed".to_string()));
        }
        Ok(self.greeting.lock().unwrap().clone())
    }

    async fn estimate_set_greeting(&self, _text: &str, overrides: &FeeOverrides) -> BlockchainResult<U256> {
        self.estimates.lock().unwrap().push(overrides.clone());
        if self.fail_estimate.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("execution reverted".to_string()));
        }
        let gas = if overrides.paymaster_params.is_some() {
            BASE_GAS + PAYMASTER_GAS
        } else {
            BASE_GAS
        };
        Ok(U256::from(gas))
    }

    async fn set_greeting(
        &self,
        text: &str,
        overrides: FeeOverrides,
    ) -> BlockchainResult<Box<dyn PendingTransaction>> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(BlockchainError::Wallet("user rejected".to_string()));
        }
        self.submitted.lock().unwrap().push((text.to_string(), overrides));
        Ok(Box::new(FakePending {
            tx_hash: B256::repeat_byte(0xab),
            text: text.to_string(),
            greeting: self.greeting.clone(),
            fail: self.fail_wait.load(Ordering::SeqCst),
            hold: self.hold_wait.clone(),
        }))
    }
}

struct FakePending {
    tx_hash: TxHash,
    text: String,
    greeting: Arc<Mutex<String>>,
    fail: bool,
    hold: Option<Arc<Notify>>,
}

#[async_trait]
impl PendingTransaction for FakePending {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn wait(&self) -> BlockchainResult<()> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if self.fail {
            return Err(BlockchainError::Reverted(self.tx_hash.to_string()));
        }
        *self.greeting.lock().unwrap() = self.text.clone();
        Ok(())
    }
}

/// Fake wallet connector.
pub struct FakeWallet {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub deny_access: bool,
    pub chain: Arc<FakeChain>,
    pub greeter: Arc<FakeGreeter>,
    pub binds: AtomicUsize,
}

impl FakeWallet {
    pub fn new(chain: Arc<FakeChain>, greeter: Arc<FakeGreeter>) -> Self {
        Self {
            chain_id: TARGET_CHAIN,
            accounts: vec![ACCOUNT],
            deny_access: false,
            chain,
            greeter,
            binds: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WalletConnector for FakeWallet {
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        if self.deny_access {
            return Err(BlockchainError::Wallet("User rejected the request".to_string()));
        }
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        Ok(ChainId(self.chain_id))
    }

    fn bind(&self, account: Address) -> BlockchainResult<ConnectionContext> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        Ok(ConnectionContext {
            provider: self.chain.clone(),
            account,
            contract: self.greeter.clone(),
        })
    }
}

/// A session wired to fresh fakes.
pub struct Harness {
    pub session: SessionController,
    pub wallet: Arc<FakeWallet>,
    pub chain: Arc<FakeChain>,
    pub greeter: Arc<FakeGreeter>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FakeChain::default(), FakeGreeter::new("hello"), |_| {})
    }

    pub fn with(chain: FakeChain, greeter: FakeGreeter, tweak: impl FnOnce(&mut FakeWallet)) -> Self {
        let chain = Arc::new(chain);
        let greeter = Arc::new(greeter);
        let mut wallet = FakeWallet::new(chain.clone(), greeter.clone());
        tweak(&mut wallet);
        let wallet = Arc::new(wallet);
        let session = SessionController::new(wallet.clone(), token_list(), ChainId(TARGET_CHAIN));
        Self {
            session,
            wallet,
            chain,
            greeter,
        }
    }

    /// A connected session with `origin` selected as fee token.
    pub async fn connected_with(origin: Address) -> Self {
        let harness = Self::new();
        harness.session.connect().await.unwrap();
        harness.session.select_token(origin).await.unwrap();
        harness
    }
}
