//! Session view state.
//!
//! # Submission phases
//! ```text
//! Idle → Submitting → AwaitingConfirmation → Refreshing → Idle
//!   ↑________________________|______________________|  (reset on failure)
//! ```
//!
//! # Design Decisions
//! - Phases only move forward; the single way back is a reset to Idle
//! - The snapshot is a plain value; observers receive clones

use serde::Serialize;

use crate::config::TokenConfig;
use crate::session::tokens::TokenDescriptor;

/// Greeting shown before the first successful read.
pub const UNKNOWN_GREETING: &str = "unknown";

/// Label shown while a quote is being recomputed.
pub const LOADING: &str = "Loading...";

/// Lifecycle of one greeting update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation,
    Refreshing,
}

impl SubmissionPhase {
    /// The phase that follows this one on success.
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::Submitting,
            Self::Submitting => Self::AwaitingConfirmation,
            Self::AwaitingConfirmation => Self::Refreshing,
            Self::Refreshing => Self::Idle,
        }
    }

    /// Whether moving to `to` is allowed.
    pub fn can_transition(self, to: Self) -> bool {
        to == Self::Idle || self.next() == to
    }
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub connected: bool,
    pub account: Option<alloy::primitives::Address>,
    pub greeting: String,
    pub draft: String,
    pub tokens: Vec<TokenConfig>,
    pub selected_token: Option<TokenDescriptor>,
    pub current_balance: String,
    pub current_fee: String,
    pub retrieving_balance: bool,
    pub retrieving_fee: bool,
    pub phase: SubmissionPhase,
}

impl SessionSnapshot {
    pub fn new(tokens: Vec<TokenConfig>) -> Self {
        Self {
            connected: false,
            account: None,
            greeting: UNKNOWN_GREETING.to_string(),
            draft: String::new(),
            tokens,
            selected_token: None,
            current_balance: String::new(),
            current_fee: String::new(),
            retrieving_balance: false,
            retrieving_fee: false,
            phase: SubmissionPhase::Idle,
        }
    }

    /// Whether the draft input accepts edits.
    pub fn can_edit(&self) -> bool {
        self.selected_token.is_some() && self.phase == SubmissionPhase::Idle
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.can_edit() && !self.retrieving_fee
    }

    /// Text of the submit action for the current state.
    pub fn action_label(&self) -> &'static str {
        if self.selected_token.is_none() {
            return "Select token to pay fee first";
        }
        match self.phase {
            SubmissionPhase::Idle => "Change greeting",
            SubmissionPhase::Submitting => "Sending tx...",
            SubmissionPhase::AwaitingConfirmation => "Waiting until tx is committed...",
            SubmissionPhase::Refreshing => "Updating the page...",
        }
    }

    /// Balance line, or the loading label while refreshing.
    pub fn balance_display(&self) -> String {
        self.quote_display(self.retrieving_balance, &self.current_balance)
    }

    /// Expected fee line, or the loading label while refreshing.
    pub fn fee_display(&self) -> String {
        self.quote_display(self.retrieving_fee, &self.current_fee)
    }

    fn quote_display(&self, loading: bool, value: &str) -> String {
        if loading {
            return LOADING.to_string();
        }
        match &self.selected_token {
            Some(token) => format!("{} {}", value, token.symbol),
            None => value.to_string(),
        }
    }
}
