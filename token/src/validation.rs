//! Pre-mutation checks shared by every ledger operation.
//!
//! Each helper is pure: it inspects values and either returns the value to
//! write or an error. Operations run all of them before touching state.

use tally_types::Address;

use crate::error::TokenError;

/// The source of value must be a real account.
pub fn ensure_sender(from: &Address) -> Result<(), TokenError> {
    if from.is_zero() {
        return Err(TokenError::InvalidSender);
    }
    Ok(())
}

/// The destination of value must be a real account.
pub fn ensure_recipient(to: &Address) -> Result<(), TokenError> {
    if to.is_zero() {
        return Err(TokenError::InvalidRecipient);
    }
    Ok(())
}

/// Balance left after removing `amount`, or `InsufficientBalance`.
pub fn debit(available: u128, amount: u128) -> Result<u128, TokenError> {
    available
        .checked_sub(amount)
        .ok_or(TokenError::InsufficientBalance {
            needed: amount,
            available,
        })
}

/// Value after adding `amount`, or `Overflow`.
pub fn credit(current: u128, amount: u128) -> Result<u128, TokenError> {
    current.checked_add(amount).ok_or(TokenError::Overflow)
}

/// Allowance left after a delegated spend of `amount`.
///
/// An allowance equal to `unlimited` is returned unchanged.
pub fn spend_allowance(current: u128, amount: u128, unlimited: u128) -> Result<u128, TokenError> {
    if current < amount {
        return Err(TokenError::InsufficientAllowance {
            needed: amount,
            available: current,
        });
    }
    if current == unlimited {
        return Ok(current);
    }
    Ok(current - amount)
}

/// Allowance after an explicit decrease, or `AllowanceUnderflow`.
pub fn reduce_allowance(current: u128, subtracted: u128) -> Result<u128, TokenError> {
    current
        .checked_sub(subtracted)
        .ok_or(TokenError::AllowanceUnderflow {
            requested: subtracted,
            current,
        })
}
