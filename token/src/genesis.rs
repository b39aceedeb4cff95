//! Genesis parameters — everything fixed at ledger creation.

use serde::{Deserialize, Serialize};
use tally_types::{Address, TokenMetadata};

/// Initial supply of the deployed token, in raw units.
pub const DEFAULT_INITIAL_SUPPLY: u128 = 100_000;

/// Parameters used once to create a ledger.
///
/// The `owner` is the deploying identity: it receives the whole initial
/// supply and is the only identity allowed to mint. When omitted it defaults
/// to the zero address, which ledger creation rejects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Raw units. Written as a decimal string; integers are accepted on input.
    #[serde(default = "default_initial_supply", with = "tally_types::raw_serde")]
    pub initial_supply: u128,

    #[serde(default = "default_owner")]
    pub owner: Address,
}

fn default_name() -> String {
    TokenMetadata::DEFAULT_NAME.to_string()
}

fn default_symbol() -> String {
    TokenMetadata::DEFAULT_SYMBOL.to_string()
}

fn default_decimals() -> u8 {
    TokenMetadata::DEFAULT_DECIMALS
}

fn default_initial_supply() -> u128 {
    DEFAULT_INITIAL_SUPPLY
}

fn default_owner() -> Address {
    Address::ZERO
}

impl GenesisConfig {
    /// Default token parameters owned by `owner`.
    pub fn with_owner(owner: Address) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            initial_supply: default_initial_supply(),
            owner: default_owner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TokenError, TokenLedger};

    #[test]
    fn default_genesis_matches_deployed_token() {
        let genesis = GenesisConfig::with_owner(Address::from_seed(1));
        let ledger = TokenLedger::from_genesis(&genesis).unwrap();
        assert_eq!(ledger.name(), "IMISS");
        assert_eq!(ledger.symbol(), "MSS");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.total_supply(), 100_000);
        assert_eq!(ledger.balance_of(&Address::from_seed(1)), 100_000);
    }

    #[test]
    fn missing_owner_is_rejected() {
        let err = TokenLedger::from_genesis(&GenesisConfig::default()).unwrap_err();
        assert_eq!(err, TokenError::InvalidRecipient);
    }

    #[test]
    fn metadata_reflects_overrides() {
        let genesis = GenesisConfig {
            name: "Other".into(),
            symbol: "OTH".into(),
            decimals: 6,
            ..GenesisConfig::default()
        };
        assert_eq!(genesis.metadata(), TokenMetadata::new("Other", "OTH", 6));
    }
}
