//! Session-level errors.

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::session::state::SubmissionPhase;

/// Errors surfaced by session operations.
///
/// None of these are fatal: the session is always left in a usable state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs a connected wallet.
    #[error("Wallet not connected")]
    NotConnected,

    /// The wallet is on a chain other than the supported one.
    #[error("Please switch network: wallet is on chain {actual}, expected {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The requested fee token is not in the token list.
    #[error("Unknown fee token {0}")]
    UnknownToken(Address),

    /// Another greeting update is still running.
    #[error("A submission is already in progress ({0:?})")]
    SubmissionInProgress(SubmissionPhase),

    /// A collaborator call failed.
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
