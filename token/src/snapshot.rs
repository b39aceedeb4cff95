//! Ledger snapshots — the complete queryable state at a point in time.
//!
//! A snapshot lists every non-zero balance and allowance in a canonical
//! order together with a Blake2b-256 digest of that content, so two ledgers
//! in the same state produce the same digest and an indexer can detect drift.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use tally_types::{raw_serde, Address, TokenMetadata};

use crate::engine::TokenLedger;
use crate::error::TokenError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub account: Address,
    #[serde(with = "raw_serde")]
    pub amount: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: Address,
    pub spender: Address,
    #[serde(with = "raw_serde")]
    pub amount: u128,
}

/// Full ledger state in canonical order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub metadata: TokenMetadata,
    pub owner: Address,
    #[serde(with = "raw_serde")]
    pub total_supply: u128,
    /// Sorted by account.
    pub balances: Vec<BalanceEntry>,
    /// Sorted by owner, then spender.
    pub allowances: Vec<AllowanceEntry>,
    /// Blake2b-256 over every field above.
    pub digest: [u8; 32],
}

impl LedgerSnapshot {
    /// Capture the current state of `ledger`.
    pub fn capture(ledger: &TokenLedger) -> Self {
        let balances = ledger
            .holders()
            .into_iter()
            .map(|(account, amount)| BalanceEntry { account, amount })
            .collect();
        let allowances = ledger
            .allowances()
            .into_iter()
            .map(|(owner, spender, amount)| AllowanceEntry {
                owner,
                spender,
                amount,
            })
            .collect();

        let mut snap = Self {
            metadata: ledger.metadata().clone(),
            owner: ledger.owner(),
            total_supply: ledger.total_supply(),
            balances,
            allowances,
            digest: [0u8; 32],
        };
        snap.digest = snap.compute_digest();
        tracing::debug!(summary = %snap.summary(), "snapshot captured");
        snap
    }

    fn compute_digest(&self) -> [u8; 32] {
        let mut hasher = Blake2b::<U32>::new();
        for text in [&self.metadata.name, &self.metadata.symbol] {
            hasher.update((text.len() as u64).to_le_bytes());
            hasher.update(text.as_bytes());
        }
        hasher.update([self.metadata.decimals]);
        hasher.update(self.owner.as_bytes());
        hasher.update(self.total_supply.to_le_bytes());

        hasher.update((self.balances.len() as u64).to_le_bytes());
        for entry in &self.balances {
            hasher.update(entry.account.as_bytes());
            hasher.update(entry.amount.to_le_bytes());
        }
        hasher.update((self.allowances.len() as u64).to_le_bytes());
        for entry in &self.allowances {
            hasher.update(entry.owner.as_bytes());
            hasher.update(entry.spender.as_bytes());
            hasher.update(entry.amount.to_le_bytes());
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the digest matches the content.
    pub fn verify(&self) -> bool {
        self.digest == self.compute_digest()
    }

    /// Balance recorded for `account`; zero when absent.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances
            .binary_search_by_key(account, |e| e.account)
            .map(|i| self.balances[i].amount)
            .unwrap_or(0)
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// One-line human summary, e.g. `"Test (TST): supply 10.5 TST, holders 2, allowances 1"`.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): supply {}, holders {}, allowances {}",
            self.metadata.name,
            self.metadata.symbol,
            self.metadata.display_amount(self.total_supply),
            self.holder_count(),
            self.allowances.len()
        )
    }

    /// Pretty JSON for indexers. Amounts are decimal strings.
    pub fn to_json(&self) -> Result<String, TokenError> {
        serde_json::to_string_pretty(self).map_err(|e| TokenError::Serialization(e.to_string()))
    }

    /// Parse a snapshot previously produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        serde_json::from_str(json).map_err(|e| TokenError::Serialization(e.to_string()))
    }
}
