//! Ledger errors.

use tally_types::Address;
use thiserror::Error;

/// Every way a ledger operation can be rejected.
///
/// All variants are raised before any state is touched, so a failed call
/// leaves the ledger exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("recipient is the zero address")]
    InvalidRecipient,

    #[error("sender is the zero address")]
    InvalidSender,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("decreased allowance below zero: requested {requested}, current {current}")]
    AllowanceUnderflow { requested: u128, current: u128 },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("caller {caller} is not the ledger owner")]
    Unauthorized { caller: Address },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
