//! Notifications emitted by completed ledger mutations.

use serde::{Deserialize, Serialize};
use tally_types::{raw_serde, Address};

/// An immutable record of a completed balance or allowance change.
///
/// Mints are reported as transfers from [`Address::ZERO`], burns as transfers
/// to it. Approvals always carry the new absolute allowance. Amounts
/// serialize as decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "raw_serde")]
        amount: u128,
    },
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "raw_serde")]
        amount: u128,
    },
}

impl LedgerEvent {
    /// Whether this event created new supply.
    pub fn is_mint(&self) -> bool {
        matches!(self, Self::Transfer { from, .. } if from.is_zero())
    }

    /// Whether this event destroyed supply.
    pub fn is_burn(&self) -> bool {
        matches!(self, Self::Transfer { to, .. } if to.is_zero())
    }
}

type Listener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Synchronous fan-out of ledger events to external observers.
///
/// Listeners run inline on the mutating call, after the mutation is final,
/// in subscription order. Keep them fast.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
