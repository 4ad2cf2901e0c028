//! Session controller.
//!
//! # Responsibilities
//! - Connect the wallet and bind provider/contract handles
//! - Keep the greeting, selected fee token and derived quotes current
//! - Drive one greeting update at a time through its phases
//!
//! # Reactive quotes
//! Balance and fee depend on `{selected token, greeting}`. Every operation
//! that touches either dependency runs a re-evaluation pass; when the pair
//! differs from the last evaluated one both quotes are recomputed
//! concurrently, each with its own loading flag. Selecting a token always
//! recomputes. Responses are applied in
//! completion order, a slow stale answer may overwrite a newer one.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use arc_swap::ArcSwapOption;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::paymaster::{approval_based_params, MINIMAL_ALLOWANCE};
use crate::blockchain::units::{fee_amount, format_amount};
use crate::blockchain::{BlockchainError, BlockchainResult, ChainId, ConnectionContext, FeeOverrides, WalletConnector};
use crate::config::GreeterConfig;
use crate::session::error::{SessionError, SessionResult};
use crate::session::events::SessionEvent;
use crate::session::state::{SessionSnapshot, SubmissionPhase};
use crate::session::tokens::{TokenDescriptor, TokenList, NATIVE_ASSET_ADDRESS};

const EVENT_CAPACITY: usize = 64;

/// Dependencies of the derived quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuoteDeps {
    token: Option<TokenDescriptor>,
    greeting: String,
}

struct Inner {
    connector: Arc<dyn WalletConnector>,
    tokens: TokenList,
    target_chain: ChainId,
    connection: ArcSwapOption<ConnectionContext>,
    evaluated: ArcSwapOption<QuoteDeps>,
    state: watch::Sender<SessionSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

/// Orchestrates one user's greeter session.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    /// Create a disconnected session.
    pub fn new(connector: Arc<dyn WalletConnector>, tokens: TokenList, target_chain: ChainId) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::new(tokens.entries()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                connector,
                tokens,
                target_chain,
                connection: ArcSwapOption::empty(),
                evaluated: ArcSwapOption::empty(),
                state,
                events,
            }),
        }
    }

    /// Create a session for the configured network and token list.
    pub fn from_config(config: &GreeterConfig, connector: Arc<dyn WalletConnector>) -> Self {
        Self::new(
            connector,
            TokenList::new(config.tokens.clone()),
            ChainId(config.network.chain_id),
        )
    }

    /// Current view state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Observe view state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Observe discrete session events.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    fn connection(&self) -> Option<Arc<ConnectionContext>> {
        self.inner.connection.load_full()
    }

    fn selected_token(&self) -> Option<TokenDescriptor> {
        self.inner.state.borrow().selected_token.clone()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    fn update(&self, f: impl FnOnce(&mut SessionSnapshot)) {
        self.inner.state.send_modify(f);
    }

    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Connect the wallet.
    ///
    /// On the supported network this binds the connection, reads the greeting
    /// and selects the native asset as fee token. On any other network an
    /// advisory event is emitted and nothing changes.
    pub async fn connect(&self) -> SessionResult<()> {
        let ctx = match self.bind_wallet().await {
            Ok(ctx) => ctx,
            Err(e) => {
                match &e {
                    SessionError::WrongNetwork { expected, actual } => {
                        tracing::warn!(expected, actual, "Please switch network to zkSync");
                    }
                    _ => tracing::error!(error = %e, "Wallet connection failed"),
                }
                return Err(e);
            }
        };

        let account = ctx.account;
        self.inner.connection.store(Some(Arc::new(ctx)));
        self.update(|s| {
            s.connected = true;
            s.account = Some(account);
        });
        self.emit(SessionEvent::Connected { account });
        tracing::info!(account = %account, chain_id = %self.inner.target_chain, "Wallet connected");

        if let Err(e) = self.refresh_greeting().await {
            tracing::warn!(error = %e, "Initial greeting read failed");
        }
        if let Err(e) = self.select_token(NATIVE_ASSET_ADDRESS).await {
            tracing::warn!(error = %e, "Default fee token selection failed");
        }
        Ok(())
    }

    async fn bind_wallet(&self) -> SessionResult<ConnectionContext> {
        let accounts = self.inner.connector.request_accounts().await?;
        let chain_id = self.inner.connector.chain_id().await?;

        if chain_id != self.inner.target_chain {
            let (expected, actual) = (self.inner.target_chain.0, chain_id.0);
            self.emit(SessionEvent::WrongNetwork { expected, actual });
            return Err(SessionError::WrongNetwork { expected, actual });
        }

        let account = *accounts.first().ok_or(BlockchainError::NoAccounts)?;
        Ok(self.inner.connector.bind(account)?)
    }

    // ------------------------------------------------------------------
    // Greeting
    // ------------------------------------------------------------------

    /// Read the greeting from the contract.
    pub async fn read_greeting(&self) -> SessionResult<String> {
        let ctx = self.connection().ok_or(SessionError::NotConnected)?;
        Ok(ctx.contract.greet().await?)
    }

    /// Re-read the greeting and apply it; the shown value is kept on failure.
    pub async fn refresh_greeting(&self) -> SessionResult<String> {
        let greeting = self.read_greeting().await?;
        self.apply_greeting(greeting.clone());
        self.reevaluate(false).await;
        Ok(greeting)
    }

    fn apply_greeting(&self, greeting: String) {
        let changed = self.inner.state.send_if_modified(|s| {
            if s.greeting == greeting {
                return false;
            }
            s.greeting = greeting.clone();
            true
        });
        if changed {
            tracing::debug!(greeting = %greeting, "Greeting changed");
            self.emit(SessionEvent::GreetingChanged(greeting));
        }
    }

    /// Store the text being typed as the next greeting.
    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| s.draft = text);
    }

    // ------------------------------------------------------------------
    // Fee token
    // ------------------------------------------------------------------

    /// Select the fee token with the given origin-chain address.
    ///
    /// On failure the selection and both quotes are cleared along with both
    /// loading flags.
    pub async fn select_token(&self, origin: Address) -> SessionResult<()> {
        let ctx = self.connection().ok_or(SessionError::NotConnected)?;

        self.update(|s| {
            s.retrieving_balance = true;
            s.retrieving_fee = true;
        });

        let resolved = self.resolve_token(&ctx, origin).await;
        self.update(|s| {
            s.retrieving_balance = false;
            s.retrieving_fee = false;
        });

        let token = match resolved {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Fee token selection failed");
                self.clear_selection();
                return Err(e);
            }
        };

        tracing::info!(
            symbol = %token.symbol,
            origin = %token.origin_address,
            target = %token.target_address,
            "Fee token selected"
        );
        let selected = token.clone();
        self.update(|s| s.selected_token = Some(selected));
        self.emit(SessionEvent::TokenSelected(token));

        // A selection always recomputes, even of the token already selected.
        self.reevaluate(true).await;
        Ok(())
    }

    fn clear_selection(&self) {
        self.inner.evaluated.store(None);
        self.update(|s| {
            s.selected_token = None;
            s.current_balance.clear();
            s.current_fee.clear();
        });
        self.emit(SessionEvent::BalanceUpdated(String::new()));
        self.emit(SessionEvent::FeeUpdated(String::new()));
    }

    async fn resolve_token(&self, ctx: &ConnectionContext, origin: Address) -> SessionResult<TokenDescriptor> {
        let entry = self.inner.tokens.find(origin).ok_or(SessionError::UnknownToken(origin))?;
        let target_address = ctx.provider.target_token_address(entry.address).await?;
        Ok(TokenDescriptor {
            origin_address: entry.address,
            target_address,
            decimals: entry.decimals,
            symbol: entry.symbol,
        })
    }

    // ------------------------------------------------------------------
    // Derived quotes
    // ------------------------------------------------------------------

    /// Estimated fee of `setGreeting(candidate)` in the selected token.
    ///
    /// Empty when not connected, no token is selected, or any call fails.
    pub async fn quote_fee(&self, candidate: &str) -> String {
        let (Some(ctx), Some(token)) = (self.connection(), self.selected_token()) else {
            return String::new();
        };

        let quote: BlockchainResult<String> = async {
            let gas = ctx
                .contract
                .estimate_set_greeting(candidate, &FeeOverrides::default())
                .await?;
            let gas_price = ctx.provider.gas_price().await?;
            format_amount(fee_amount(gas, gas_price)?, token.decimals)
        }
        .await;

        quote.unwrap_or_else(|e| {
            tracing::warn!(error = %e, symbol = %token.symbol, "Fee quote failed");
            String::new()
        })
    }

    /// Balance of the connected account in the selected token.
    ///
    /// Empty when not connected, no token is selected, or any call fails.
    pub async fn quote_balance(&self) -> String {
        let (Some(ctx), Some(token)) = (self.connection(), self.selected_token()) else {
            return String::new();
        };

        let quote: BlockchainResult<String> = async {
            let balance = if token.is_native() {
                ctx.provider.native_balance(ctx.account).await?
            } else {
                ctx.provider.token_balance(ctx.account, token.target_address).await?
            };
            format_amount(balance, token.decimals)
        }
        .await;

        quote.unwrap_or_else(|e| {
            tracing::warn!(error = %e, symbol = %token.symbol, "Balance quote failed");
            String::new()
        })
    }

    /// Recompute the balance shown in the snapshot.
    pub async fn update_balance(&self) {
        self.update(|s| s.retrieving_balance = true);
        let balance = self.quote_balance().await;
        let shown = balance.clone();
        self.update(|s| {
            s.current_balance = shown;
            s.retrieving_balance = false;
        });
        self.emit(SessionEvent::BalanceUpdated(balance));
    }

    /// Recompute the fee for the current draft.
    pub async fn update_fee(&self) {
        self.update(|s| s.retrieving_fee = true);
        let draft = self.inner.state.borrow().draft.clone();
        let fee = self.quote_fee(&draft).await;
        let shown = fee.clone();
        self.update(|s| {
            s.current_fee = shown;
            s.retrieving_fee = false;
        });
        self.emit(SessionEvent::FeeUpdated(fee));
    }

    /// Manual fee refresh.
    pub async fn refresh_fee(&self) {
        self.update_fee().await;
    }

    /// Recompute both quotes if their dependencies changed, or when forced.
    async fn reevaluate(&self, force: bool) {
        let current = {
            let s = self.inner.state.borrow();
            QuoteDeps {
                token: s.selected_token.clone(),
                greeting: s.greeting.clone(),
            }
        };
        let previous = self.inner.evaluated.swap(Some(Arc::new(current.clone())));
        if !force && previous.as_deref() == Some(&current) {
            return;
        }
        tokio::join!(self.update_balance(), self.update_fee());
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Transaction overrides for paying the fee in the selected token.
    ///
    /// Native asset, no selection or no paymaster on the network yield empty
    /// overrides. Otherwise gas is estimated with approval-based params
    /// attached and the params are rebuilt to allow exactly
    /// `gas price × gas limit`.
    pub async fn build_fee_overrides(&self, candidate: &str) -> SessionResult<FeeOverrides> {
        let (Some(ctx), Some(token)) = (self.connection(), self.selected_token()) else {
            return Ok(FeeOverrides::default());
        };
        if token.is_native() {
            return Ok(FeeOverrides::default());
        }

        let Some(paymaster) = ctx.provider.fee_relay_address().await? else {
            tracing::debug!("No paymaster on this network, paying natively");
            return Ok(FeeOverrides::default());
        };

        let gas_price = ctx.provider.gas_price().await?;

        let estimation_params =
            approval_based_params(paymaster, token.target_address, MINIMAL_ALLOWANCE, Bytes::new());
        let gas_limit = ctx
            .contract
            .estimate_set_greeting(candidate, &FeeOverrides::with_paymaster(estimation_params))
            .await?;

        let fee = fee_amount(gas_limit, gas_price)?;
        let params = approval_based_params(paymaster, token.target_address, fee, Bytes::new());

        tracing::debug!(
            paymaster = %paymaster,
            token = %token.symbol,
            gas_limit = %gas_limit,
            fee = %fee,
            "Paymaster overrides built"
        );

        Ok(FeeOverrides {
            max_fee_per_gas: Some(gas_price),
            max_priority_fee_per_gas: Some(U256::ZERO),
            gas_limit: Some(gas_limit),
            ..FeeOverrides::with_paymaster(params)
        })
    }

    /// Update the greeting to `candidate`.
    ///
    /// Whatever happens, the phase ends at Idle with both loading flags
    /// cleared. Rejected while another submission is running.
    pub async fn submit_greeting(&self, candidate: &str) -> SessionResult<TxHash> {
        let ctx = self.connection().ok_or(SessionError::NotConnected)?;

        let mut busy = SubmissionPhase::Idle;
        let claimed = self.inner.state.send_if_modified(|s| {
            if s.phase != SubmissionPhase::Idle {
                busy = s.phase;
                return false;
            }
            s.phase = SubmissionPhase::Submitting;
            true
        });
        if !claimed {
            return Err(SessionError::SubmissionInProgress(busy));
        }
        self.emit(SessionEvent::PhaseChanged(SubmissionPhase::Submitting));

        let span = tracing::info_span!("submission", submission_id = %Uuid::new_v4());
        let result = self.run_submission(&ctx, candidate).instrument(span).await;

        self.update(|s| {
            s.retrieving_fee = false;
            s.retrieving_balance = false;
        });
        self.set_phase(SubmissionPhase::Idle);

        if let Err(e) = &result {
            tracing::error!(error = %e, "Greeting update failed");
        }
        result
    }

    async fn run_submission(&self, ctx: &ConnectionContext, candidate: &str) -> SessionResult<TxHash> {
        let overrides = self.build_fee_overrides(candidate).await?;
        let pending = ctx.contract.set_greeting(candidate, overrides).await?;
        let tx_hash = pending.tx_hash();

        self.set_phase(SubmissionPhase::AwaitingConfirmation);
        pending.wait().await?;

        self.set_phase(SubmissionPhase::Refreshing);
        let greeting = ctx.contract.greet().await?;
        self.apply_greeting(greeting);
        self.reevaluate(true).await;

        tracing::info!(tx_hash = %tx_hash, "Greeting updated");
        Ok(tx_hash)
    }

    fn set_phase(&self, to: SubmissionPhase) {
        let mut from = to;
        let moved = self.inner.state.send_if_modified(|s| {
            from = s.phase;
            if s.phase == to || !s.phase.can_transition(to) {
                return false;
            }
            s.phase = to;
            true
        });
        if moved {
            tracing::debug!(from = ?from, to = ?to, "Submission phase changed");
            self.emit(SessionEvent::PhaseChanged(to));
        } else if from != to {
            tracing::error!(from = ?from, to = ?to, "Rejected out-of-order phase change");
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("target_chain", &self.inner.target_chain)
            .field("connected", &self.inner.connection.load().is_some())
            .finish()
    }
}
