//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::signal::Direction;
use crate::patterns::CollectionName;

/// Main configuration for sigparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigparseConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Signal assembly configuration.
    pub signal: SignalConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound on a compiled rule pattern, in bytes.
    pub regex_size_limit: usize,

    /// Upper bound on the lazy DFA cache per rule, in bytes.
    pub dfa_size_limit: usize,

    /// Patterns longer than this are rejected as regex errors.
    pub max_pattern_len: usize,

    /// Pick rules from the message itself when no template is given.
    pub smart_detect: bool,

    /// Collection used when no template is given and smart detect is off.
    pub default_collection: Option<CollectionName>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: 10 << 20,
            dfa_size_limit: 10 << 20,
            max_pattern_len: 4096,
            smart_detect: true,
            default_collection: Some(CollectionName::Standard),
        }
    }
}

/// Signal assembly configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Direction used when the extracted type is missing or unrecognised.
    pub default_direction: Direction,

    /// Decimal places kept in risk/reward ratios.
    pub rr_decimal_places: u32,

    /// Result keys searched, in order, for the stop loss.
    pub stop_loss_keys: Vec<String>,

    /// Result keys searched, in order, for take profit levels.
    pub take_profit_keys: Vec<String>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            default_direction: Direction::Buy,
            rr_decimal_places: 2,
            stop_loss_keys: ["sl", "stop_loss", "stop"].map(String::from).to_vec(),
            take_profit_keys: ["tp", "tp1", "tp2", "tp3", "take_profit", "take_profits"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl SigparseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
