//! Fungible-token ledger core.
//!
//! A single [`TokenLedger`] owns every balance, every allowance and the total
//! supply. Callers pass their identity explicitly to each mutating operation:
//!
//! - `transfer`, `transfer_from` — move value, directly or via an allowance
//! - `approve`, `increase_allowance`, `decrease_allowance` — manage allowances
//! - `mint` (owner only), `burn` — change the supply
//!
//! Each operation validates everything before writing, so a returned error
//! means the ledger is unchanged. Successful mutations emit [`LedgerEvent`]s,
//! recorded in the ledger and fanned out to subscribers.

pub mod access;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod genesis;
pub mod snapshot;
pub mod validation;

pub use access::Ownership;
pub use config::LedgerConfig;
pub use engine::TokenLedger;
pub use error::TokenError;
pub use event::{EventBus, LedgerEvent};
pub use genesis::{GenesisConfig, DEFAULT_INITIAL_SUPPLY};
pub use snapshot::{AllowanceEntry, BalanceEntry, LedgerSnapshot};
