//! Greeter session subsystem.
//!
//! # Data Flow
//! ```text
//! user action (connect / pick token / type / submit)
//!     → controller.rs (calls wallet, provider, contract)
//!     → state.rs snapshot updated (watch channel)
//!     → events.rs notifications (broadcast channel)
//!     → presentation layer re-renders
//! ```
//!
//! # State Machine
//! ```text
//! Disconnected → Connected(no token) → Connected(token) × SubmissionPhase
//! ```
//! There is no disconnect; a new `connect()` rebinds the session.

pub mod controller;
pub mod error;
pub mod events;
pub mod state;
pub mod tokens;

pub use controller::SessionController;
pub use error::{SessionError, SessionResult};
pub use events::SessionEvent;
pub use state::{SessionSnapshot, SubmissionPhase};
pub use tokens::{TokenDescriptor, TokenList, NATIVE_ASSET_ADDRESS};
