//! Shared utilities for the Tally token ledger.

pub mod error;
pub mod logging;

pub use error::UtilsError;
pub use logging::{init_logging, LogFormat};
