//! Greeter session library.
//!
//! Connects a wallet, reads and updates the `Greeter` contract's greeting on
//! zkSync Era, and pays the fee in a chosen token through the network's
//! paymaster.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod session;

pub use config::GreeterConfig;
pub use session::{SessionController, SessionEvent, SessionSnapshot, SubmissionPhase};
