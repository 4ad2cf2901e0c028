//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → submission spans carrying a submission ID
//!
//! Consumers:
//!     → stderr (fmt layer)
//! ```

pub mod logging;

pub use logging::init_logging;
