//! Core ledger engine: balances, allowances, supply.

use std::collections::HashMap;

use tally_types::{Address, TokenMetadata, UNLIMITED_ALLOWANCE};

use crate::access::Ownership;
use crate::error::TokenError;
use crate::event::{EventBus, LedgerEvent};
use crate::genesis::GenesisConfig;
use crate::snapshot::LedgerSnapshot;
use crate::validation::{
    credit, debit, ensure_recipient, ensure_sender, reduce_allowance, spend_allowance,
};

/// A validated balance move, ready to be written.
struct BalanceMove {
    from: Address,
    to: Address,
    from_after: u128,
    to_after: u128,
}

/// The token ledger — sole owner of balances, allowances and total supply.
///
/// Every mutating operation takes the caller identity explicitly, validates
/// everything first, then writes. A returned error means nothing changed.
/// Accounts and allowance pairs with a zero value are not stored.
///
/// Invariants after every public call:
/// - `total_supply == Σ balances`
/// - the zero address holds nothing
pub struct TokenLedger {
    metadata: TokenMetadata,
    access: Ownership,
    total_supply: u128,
    balances: HashMap<Address, u128>,
    /// Keyed by `(owner, spender)`.
    allowances: HashMap<(Address, Address), u128>,
    /// Every event emitted since creation or the last `drain_events`.
    events: Vec<LedgerEvent>,
    record_events: bool,
    bus: EventBus,
}

impl TokenLedger {
    /// Create a ledger with `initial_supply` credited to `owner`.
    ///
    /// `owner` becomes the only identity allowed to mint. The genesis credit
    /// is recorded as a mint event.
    pub fn new(
        metadata: TokenMetadata,
        owner: Address,
        initial_supply: u128,
    ) -> Result<Self, TokenError> {
        ensure_recipient(&owner)?;

        let mut ledger = Self {
            metadata,
            access: Ownership::new(owner),
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
            record_events: true,
            bus: EventBus::new(),
        };
        ledger.total_supply = initial_supply;
        ledger.set_balance(owner, initial_supply);
        ledger.emit(LedgerEvent::Transfer {
            from: Address::ZERO,
            to: owner,
            amount: initial_supply,
        });

        tracing::info!(
            name = %ledger.metadata.name,
            symbol = %ledger.metadata.symbol,
            owner = %owner,
            supply = initial_supply,
            "token ledger created"
        );
        Ok(ledger)
    }

    /// Create a ledger from a genesis configuration.
    pub fn from_genesis(genesis: &GenesisConfig) -> Result<Self, TokenError> {
        Self::new(genesis.metadata(), genesis.owner, genesis.initial_supply)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Balance of `account`; zero for unknown accounts.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Accounts holding a non-zero balance, sorted by address.
    pub fn holders(&self) -> Vec<(Address, u128)> {
        let mut holders: Vec<_> = self.balances.iter().map(|(a, b)| (*a, *b)).collect();
        holders.sort_unstable_by_key(|(addr, _)| *addr);
        holders
    }

    /// Non-zero allowances as `(owner, spender, amount)`, sorted by owner then spender.
    pub fn allowances(&self) -> Vec<(Address, Address, u128)> {
        let mut entries: Vec<_> = self
            .allowances
            .iter()
            .map(|((owner, spender), amount)| (*owner, *spender, *amount))
            .collect();
        entries.sort_unstable_by_key(|(owner, spender, _)| (*owner, *spender));
        entries
    }

    /// Events emitted since creation or the last [`drain_events`](Self::drain_events).
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Turn the in-ledger event log on or off. On by default.
    ///
    /// While off, events still reach subscribers but are not retained.
    /// Entries already logged stay until drained.
    pub fn set_event_log(&mut self, enabled: bool) {
        self.record_events = enabled;
    }

    /// Register an observer invoked for every future event.
    ///
    /// The event log keeps growing until drained; a host that only observes
    /// through listeners should call [`set_event_log(false)`](Self::set_event_log).
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    /// Capture the current state for export or comparison.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(self)
    }

    // ── Transfers ──────────────────────────────────────────────────────

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        let mv = self.plan_move(caller, to, amount)?;
        self.apply_move(mv, amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `caller`, consuming allowance.
    ///
    /// The allowance is checked first, then the spender itself: the zero
    /// address can never act as a spender. An allowance of
    /// [`UNLIMITED_ALLOWANCE`] is never decremented.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let current = self.allowance(&from, &caller);
        let remaining = spend_allowance(current, amount, UNLIMITED_ALLOWANCE)?;
        ensure_recipient(&caller)?;
        let mv = self.plan_move(from, to, amount)?;

        if remaining != current {
            self.set_allowance(from, caller, remaining);
        }
        self.apply_move(mv, amount);
        Ok(())
    }

    // ── Allowances ─────────────────────────────────────────────────────

    /// Set `spender`'s allowance over `caller`'s balance to exactly `amount`.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: u128) -> Result<(), TokenError> {
        ensure_sender(&caller)?;
        ensure_recipient(&spender)?;

        self.set_allowance(caller, spender, amount);
        self.emit(LedgerEvent::Approval {
            owner: caller,
            spender,
            amount,
        });
        tracing::debug!(owner = %caller, spender = %spender, amount, "approval set");
        Ok(())
    }

    /// Raise `spender`'s allowance by `added`. Returns the new allowance.
    pub fn increase_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        added: u128,
    ) -> Result<u128, TokenError> {
        ensure_sender(&caller)?;
        ensure_recipient(&spender)?;
        let updated = credit(self.allowance(&caller, &spender), added)?;

        self.set_allowance(caller, spender, updated);
        self.emit(LedgerEvent::Approval {
            owner: caller,
            spender,
            amount: updated,
        });
        tracing::debug!(owner = %caller, spender = %spender, added, updated, "allowance increased");
        Ok(updated)
    }

    /// Lower `spender`'s allowance by `subtracted`. Returns the new allowance.
    pub fn decrease_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        subtracted: u128,
    ) -> Result<u128, TokenError> {
        ensure_sender(&caller)?;
        ensure_recipient(&spender)?;
        let updated = reduce_allowance(self.allowance(&caller, &spender), subtracted)?;

        self.set_allowance(caller, spender, updated);
        self.emit(LedgerEvent::Approval {
            owner: caller,
            spender,
            amount: updated,
        });
        tracing::debug!(owner = %caller, spender = %spender, subtracted, updated, "allowance decreased");
        Ok(updated)
    }

    // ── Supply ─────────────────────────────────────────────────────────

    /// Create `amount` new tokens for `to`. Owner only. Returns the new total supply.
    pub fn mint(&mut self, caller: Address, to: Address, amount: u128) -> Result<u128, TokenError> {
        self.access.ensure_owner(&caller)?;
        ensure_recipient(&to)?;
        let supply = credit(self.total_supply, amount)?;
        let balance = credit(self.balance_of(&to), amount)?;

        self.total_supply = supply;
        self.set_balance(to, balance);
        self.emit(LedgerEvent::Transfer {
            from: Address::ZERO,
            to,
            amount,
        });
        tracing::debug!(
            to = %to,
            amount,
            display = %self.metadata.display_amount(amount),
            supply,
            "minted"
        );
        Ok(supply)
    }

    /// Destroy `amount` of `caller`'s own tokens. Returns the new total supply.
    pub fn burn(&mut self, caller: Address, amount: u128) -> Result<u128, TokenError> {
        ensure_sender(&caller)?;
        let balance = debit(self.balance_of(&caller), amount)?;
        let supply = self.total_supply.checked_sub(amount).ok_or_else(|| {
            TokenError::InvariantViolation("burn exceeds total supply".into())
        })?;

        self.total_supply = supply;
        self.set_balance(caller, balance);
        self.emit(LedgerEvent::Transfer {
            from: caller,
            to: Address::ZERO,
            amount,
        });
        tracing::debug!(
            from = %caller,
            amount,
            display = %self.metadata.display_amount(amount),
            supply,
            "burned"
        );
        Ok(supply)
    }

    // ── Consistency ────────────────────────────────────────────────────

    /// Recompute the ledger invariants from scratch.
    ///
    /// Balances are maintained incrementally; this verifies the incremental
    /// bookkeeping still matches reality.
    pub fn check_invariants(&self) -> Result<(), TokenError> {
        if self.balance_of(&Address::ZERO) != 0 {
            return Err(TokenError::InvariantViolation(
                "zero address holds a balance".into(),
            ));
        }
        let sum = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or_else(|| TokenError::InvariantViolation("balance sum overflows".into()))?;
        if sum != self.total_supply {
            return Err(TokenError::InvariantViolation(format!(
                "balances sum to {sum}, total supply is {}",
                self.total_supply
            )));
        }
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Validate a move of `amount` from `from` to `to` without writing anything.
    fn plan_move(&self, from: Address, to: Address, amount: u128) -> Result<BalanceMove, TokenError> {
        ensure_sender(&from)?;
        ensure_recipient(&to)?;
        let from_after = debit(self.balance_of(&from), amount)?;
        let to_after = if from == to {
            from_after.checked_add(amount).ok_or(TokenError::Overflow)?
        } else {
            credit(self.balance_of(&to), amount)?
        };
        Ok(BalanceMove {
            from,
            to,
            from_after,
            to_after,
        })
    }

    fn apply_move(&mut self, mv: BalanceMove, amount: u128) {
        self.set_balance(mv.from, mv.from_after);
        self.set_balance(mv.to, mv.to_after);
        self.emit(LedgerEvent::Transfer {
            from: mv.from,
            to: mv.to,
            amount,
        });
        tracing::debug!(
            from = %mv.from,
            to = %mv.to,
            amount,
            display = %self.metadata.display_amount(amount),
            "transfer"
        );
    }

    fn set_balance(&mut self, account: Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.bus.emit(&event);
        if self.record_events {
            self.events.push(event);
        }
    }
}

impl std::fmt::Debug for TokenLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenLedger")
            .field("symbol", &self.metadata.symbol)
            .field("owner", &self.access.owner())
            .field("total_supply", &self.total_supply)
            .field("holders", &self.balances.len())
            .field("allowances", &self.allowances.len())
            .field("bus", &self.bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::from_seed(0)
    }

    fn ledger() -> TokenLedger {
        TokenLedger::new(TokenMetadata::default(), owner(), 1_000).unwrap()
    }

    #[test]
    fn genesis_credits_owner_and_records_mint() {
        let ledger = ledger();
        assert_eq!(ledger.total_supply(), 1_000);
        assert_eq!(ledger.balance_of(&owner()), 1_000);
        assert_eq!(ledger.owner(), owner());
        assert_eq!(
            ledger.events(),
            &[LedgerEvent::Transfer {
                from: Address::ZERO,
                to: owner(),
                amount: 1_000
            }]
        );
    }

    #[test]
    fn zero_owner_rejected() {
        let err = TokenLedger::new(TokenMetadata::default(), Address::ZERO, 1).unwrap_err();
        assert_eq!(err, TokenError::InvalidRecipient);
    }

    #[test]
    fn self_transfer_keeps_balance() {
        let mut ledger = ledger();
        ledger.drain_events();
        ledger.transfer(owner(), owner(), 400).unwrap();
        assert_eq!(ledger.balance_of(&owner()), 1_000);
        assert_eq!(ledger.drain_events().len(), 1);
        ledger.check_invariants().unwrap();
    }

    #[test]
    fn self_transfer_still_checks_balance() {
        let mut ledger = ledger();
        let err = ledger.transfer(owner(), owner(), 1_001).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
    }

    #[test]
    fn zero_balances_are_not_stored() {
        let mut ledger = ledger();
        let a = Address::from_seed(1);
        ledger.transfer(owner(), a, 1_000).unwrap();
        assert_eq!(ledger.holders(), vec![(a, 1_000)]);
    }

    #[test]
    fn revoked_allowance_disappears() {
        let mut ledger = ledger();
        let spender = Address::from_seed(1);
        ledger.approve(owner(), spender, 10).unwrap();
        assert_eq!(ledger.allowances().len(), 1);
        ledger.approve(owner(), spender, 0).unwrap();
        assert!(ledger.allowances().is_empty());
    }

    #[test]
    fn sender_checked_before_recipient() {
        let mut ledger = ledger();
        let err = ledger.transfer(Address::ZERO, Address::ZERO, 100).unwrap_err();
        assert_eq!(err, TokenError::InvalidSender);
    }

    #[test]
    fn mint_overflow_rejected_atomically() {
        let mut ledger = ledger();
        let err = ledger.mint(owner(), Address::from_seed(1), u128::MAX).unwrap_err();
        assert_eq!(err, TokenError::Overflow);
        assert_eq!(ledger.total_supply(), 1_000);
        assert_eq!(ledger.balance_of(&Address::from_seed(1)), 0);
    }

    #[test]
    fn burn_from_zero_address_rejected() {
        let mut ledger = ledger();
        assert_eq!(ledger.burn(Address::ZERO, 0), Err(TokenError::InvalidSender));
    }

    #[test]
    fn subscribers_see_events_in_order() {
        use std::sync::{Arc, Mutex};

        let mut ledger = ledger();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ledger.subscribe(Box::new(move |e| sink.lock().unwrap().push(e.clone())));

        let spender = Address::from_seed(1);
        ledger.approve(owner(), spender, 5).unwrap();
        ledger.burn(owner(), 5).unwrap();
        assert!(ledger.transfer(spender, owner(), 1).is_err());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], LedgerEvent::Approval { amount: 5, .. }));
        assert!(seen[1].is_burn());
    }

    #[test]
    fn disabled_log_still_feeds_subscribers() {
        use std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        };

        let mut ledger = ledger();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        ledger.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        ledger.set_event_log(false);

        for _ in 0..10 {
            ledger.transfer(owner(), Address::from_seed(1), 1).unwrap();
        }
        assert_eq!(seen.load(Ordering::SeqCst), 10);
        // Only the genesis mint, logged before the switch.
        assert_eq!(ledger.drain_events().len(), 1);
        assert!(ledger.events().is_empty());

        ledger.set_event_log(true);
        ledger.burn(owner(), 1).unwrap();
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn zero_spender_rejected_after_allowance() {
        let mut ledger = ledger();
        ledger.drain_events();
        let recipient = Address::from_seed(2);

        assert_eq!(
            ledger.transfer_from(Address::ZERO, owner(), recipient, 0),
            Err(TokenError::InvalidRecipient)
        );
        assert!(matches!(
            ledger.transfer_from(Address::ZERO, owner(), recipient, 1),
            Err(TokenError::InsufficientAllowance { .. })
        ));
        assert!(ledger.events().is_empty());
        assert_eq!(ledger.balance_of(&owner()), 1_000);
    }

    #[test]
    fn mutation_logs_carry_display_amount() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut ledger = TokenLedger::new(TokenMetadata::new("Test", "TST", 2), owner(), 1_000).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            ledger.transfer(owner(), Address::from_seed(1), 150).unwrap();
            ledger.mint(owner(), Address::from_seed(1), 25).unwrap();
            ledger.burn(owner(), 200).unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("display=1.5 TST"), "{output}");
        assert!(output.contains("display=0.25 TST"), "{output}");
        assert!(output.contains("display=2 TST"), "{output}");
    }

    #[test]
    fn check_invariants_detects_tampering() {
        let mut ledger = ledger();
        ledger.total_supply += 1;
        assert!(matches!(
            ledger.check_invariants(),
            Err(TokenError::InvariantViolation(_))
        ));
    }
}
