//! Static token metadata.

use serde::{Deserialize, Serialize};

use crate::amount::format_units;

/// Display metadata fixed at ledger creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Number of fractional digits used when displaying raw amounts.
    pub decimals: u8,
}

impl TokenMetadata {
    pub const DEFAULT_NAME: &'static str = "IMISS";
    pub const DEFAULT_SYMBOL: &'static str = "MSS";
    pub const DEFAULT_DECIMALS: u8 = 18;

    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Format a raw amount with this token's decimals and symbol, e.g. `"1.5 MSS"`.
    pub fn display_amount(&self, raw: u128) -> String {
        format!("{} {}", format_units(raw, self.decimals), self.symbol)
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, Self::DEFAULT_SYMBOL, Self::DEFAULT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_token() {
        let meta = TokenMetadata::default();
        assert_eq!(meta.name, "IMISS");
        assert_eq!(meta.symbol, "MSS");
        assert_eq!(meta.decimals, 18);
    }

    #[test]
    fn display_amount_uses_symbol() {
        let meta = TokenMetadata::new("Test", "TST", 2);
        assert_eq!(meta.display_amount(150), "1.5 TST");
    }
}
