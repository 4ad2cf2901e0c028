//! Discrete session events for observers.

use alloy::primitives::Address;

use crate::session::state::SubmissionPhase;
use crate::session::tokens::TokenDescriptor;

/// Something observable happened in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A wallet account was connected on the supported network.
    Connected { account: Address },
    /// Advisory: the wallet is on an unsupported network.
    WrongNetwork { expected: u64, actual: u64 },
    /// A new fee token was selected.
    TokenSelected(TokenDescriptor),
    /// The on-chain greeting value changed.
    GreetingChanged(String),
    /// Balance recomputation finished (empty on failure).
    BalanceUpdated(String),
    /// Fee recomputation finished (empty on failure).
    FeeUpdated(String),
    /// The submission phase moved.
    PhaseChanged(SubmissionPhase),
}
