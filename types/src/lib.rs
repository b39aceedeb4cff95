//! Fundamental types for the Tally token ledger.
//!
//! This crate defines the types shared across the workspace: account
//! identities, raw amount helpers, token metadata and the common error type.

pub mod address;
pub mod amount;
pub mod error;
pub mod metadata;

pub use address::Address;
pub use amount::{format_units, raw_serde, UNLIMITED_ALLOWANCE};
pub use error::TypesError;
pub use metadata::TokenMetadata;
