//! Ledger configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_utils::LogFormat;

use crate::engine::TokenLedger;
use crate::error::TokenError;
use crate::genesis::GenesisConfig;

/// Configuration for hosting a ledger instance.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Token parameters applied once at creation.
    #[serde(default)]
    pub genesis: GenesisConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            genesis: GenesisConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TokenError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TokenError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TokenError> {
        toml::from_str(s).map_err(|e| TokenError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TokenError> {
        toml::to_string_pretty(self).map_err(|e| TokenError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber described by this config.
    pub fn init_logging(&self) -> Result<(), TokenError> {
        tally_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| TokenError::Config(e.to_string()))
    }

    /// Create the ledger described by the genesis section.
    pub fn build_ledger(&self) -> Result<TokenLedger, TokenError> {
        TokenLedger::from_genesis(&self.genesis)
    }
}
