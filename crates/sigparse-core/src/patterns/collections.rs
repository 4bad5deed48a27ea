//! Named rule collections, one per message format convention.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SigparseError;
use crate::models::rule::{FieldRule, RuleSeed, ValueType};

/// Name of a built-in pattern collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CollectionName {
    /// `GOLD BUY NOW @ 2045.50\nSL: 2040\nTP1: 2050\nTP2: 2055`
    Standard,
    /// `Short BTC/USD\nEntry: 64500\nStop: 65200`
    Crypto,
    /// `EURUSD BUY @1.0845 SL:1.0820 TP:1.0900`
    Compact,
    /// Standard layout plus timeframe and risk/reward lines.
    Detailed,
}

impl CollectionName {
    pub const ALL: [CollectionName; 4] = [
        CollectionName::Standard,
        CollectionName::Crypto,
        CollectionName::Compact,
        CollectionName::Detailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionName::Standard => "STANDARD",
            CollectionName::Crypto => "CRYPTO",
            CollectionName::Compact => "COMPACT",
            CollectionName::Detailed => "DETAILED",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = SigparseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        CollectionName::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| SigparseError::UnknownCollection(s.to_string()))
    }
}

/// A named, ordered list of rule seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCollection {
    pub name: CollectionName,
    pub seeds: &'static [RuleSeed],
}

impl PatternCollection {
    /// Owned rules ready for editing or extraction.
    pub fn materialize(&self) -> Vec<FieldRule> {
        self.seeds.iter().map(RuleSeed::materialize).collect()
    }
}

const fn seed(
    name: &'static str,
    key: &'static str,
    value_type: ValueType,
    pattern: &'static str,
    required: bool,
) -> RuleSeed {
    RuleSeed {
        name,
        key,
        value_type,
        pattern,
        required,
        description: None,
    }
}

const STANDARD: &[RuleSeed] = &[
    seed(
        "Symbol",
        "symbol",
        ValueType::String,
        r"(?:^|\s)(GOLD|SILVER|OIL|XAU|XAG|US30|SPX|BTC|ETH|[A-Z]{3,6}(?:USD|JPY|EUR|GBP|CHF|CAD|AUD|NZD|USDT)?)(?:\s|$|BUY|SELL|LONG|SHORT)",
        true,
    ),
    seed("Type", "type", ValueType::String, r"(BUY|SELL|LONG|SHORT)", true),
    seed(
        "Entry",
        "entry",
        ValueType::Array,
        r"(?:Entry|EP|Entry\s*Price|@|(?:BUY|SELL|LONG|SHORT))\s*:?\s*([0-9]+\.?[0-9]*)(?:\s+(?:[-–—]|to)?\s*([0-9]+\.?[0-9]*))?",
        true,
    ),
    seed(
        "Stop Loss",
        "sl",
        ValueType::Number,
        r"(?:SL|Stop)\s*:?\s*([0-9]+\.?[0-9]*)",
        true,
    ),
    seed(
        "Take Profit",
        "tp",
        ValueType::Array,
        r"(?:TP|Target)\d?\s*:?\s*([0-9]+\.?[0-9]*)",
        false,
    ),
];

const CRYPTO: &[RuleSeed] = &[
    seed(
        "Symbol",
        "symbol",
        ValueType::String,
        r"(?:Long|Short|Buy|Sell)\s+([A-Z]+(?:\/[A-Z]+)?)",
        true,
    ),
    seed("Type", "type", ValueType::String, r"(Long|Short|Buy|Sell)", true),
    seed(
        "Entry",
        "entry",
        ValueType::Array,
        r"(?:Entry|EP|Entry\s*Price|(?:BUY|SELL|LONG|SHORT))\s*:?\s*([0-9]+\.?[0-9]*)(?:\s+(?:[-–—]|to)?\s*([0-9]+\.?[0-9]*))?",
        true,
    ),
    seed(
        "Stop Loss",
        "sl",
        ValueType::Number,
        r"(?:Stop|SL)\s*:?\s*([0-9]+\.?[0-9]*)",
        true,
    ),
];

const COMPACT: &[RuleSeed] = &[
    seed(
        "Symbol",
        "symbol",
        ValueType::String,
        r"(?:^|\s)([A-Z]{3,8}(?:USD|JPY|EUR|GBP|CHF|CAD|AUD|NZD|USDT)?)(?:\s|BUY|SELL)",
        true,
    ),
    seed("Type", "type", ValueType::String, r"(BUY|SELL)", true),
    seed(
        "Entry",
        "entry",
        ValueType::Array,
        r"(?:@|Entry|EP|(?:BUY|SELL))\s*:?\s*([0-9]+\.?[0-9]*)(?:\s+(?:[-–—]|to)?\s*([0-9]+\.?[0-9]*))?",
        true,
    ),
    seed(
        "Stop Loss",
        "sl",
        ValueType::Number,
        r"SL:([0-9]+\.?[0-9]*)",
        true,
    ),
    seed(
        "Take Profit",
        "tp",
        ValueType::Array,
        r"TP:([0-9]+\.?[0-9]*)",
        false,
    ),
];

const DETAILED: &[RuleSeed] = &[
    seed(
        "Symbol",
        "symbol",
        ValueType::String,
        r"(?:^|\s)(GOLD|SILVER|OIL|XAU|XAG|US30|SPX|BTC|ETH|[A-Z]{3,6}(?:USD|JPY|EUR|GBP|CHF|CAD|AUD|NZD|USDT)?)(?:\s|$|BUY|SELL|LONG|SHORT)",
        true,
    ),
    seed("Type", "type", ValueType::String, r"(BUY|SELL|LONG|SHORT)", true),
    seed(
        "Entry",
        "entry",
        ValueType::Array,
        r"(?:Entry|EP|@|(?:BUY|SELL|LONG|SHORT))\s*:?\s*([0-9]+\.?[0-9]*)(?:\s+(?:[-–—]|to)?\s*([0-9]+\.?[0-9]*))?",
        true,
    ),
    seed(
        "Stop Loss",
        "sl",
        ValueType::Number,
        r"(?:SL|Stop\s*Loss)\s*:?\s*([0-9]+\.?[0-9]*)",
        true,
    ),
    seed(
        "Take Profit",
        "tp",
        ValueType::Array,
        r"(?:TP|Take\s*Profit|Target)\d?\s*:?\s*([0-9]+\.?[0-9]*)",
        false,
    ),
    seed(
        "Timeframe",
        "timeframe",
        ValueType::String,
        r"(?:TF|Timeframe)\s*:?\s*([1-9]\d*[MHDW])",
        false,
    ),
    seed(
        "Risk Reward",
        "risk_reward",
        ValueType::String,
        r"(?:R:R|RR)\s*:?\s*([0-9]+\.?[0-9]*)\s*:?\s*([0-9]+\.?[0-9]*)",
        false,
    ),
];

/// Described default rules for callers starting from an empty template.
pub const COMMON_RULES: &[RuleSeed] = &[
    RuleSeed {
        name: "Symbol",
        key: "symbol",
        value_type: ValueType::String,
        pattern: super::library::SYMBOL_COMPREHENSIVE,
        required: true,
        description: Some("Trading pair symbol (e.g., GOLD, XAUUSD, BTCUSD, EURUSD, US30)"),
    },
    RuleSeed {
        name: "Signal Type",
        key: "type",
        value_type: ValueType::String,
        pattern: super::library::SIGNAL_TYPE_COMPREHENSIVE,
        required: true,
        description: Some("Trade direction"),
    },
    RuleSeed {
        name: "Entry Price",
        key: "entry",
        value_type: ValueType::Array,
        pattern: super::library::ENTRY_COMPREHENSIVE,
        required: true,
        description: Some("Entry price level (single value or range)"),
    },
    RuleSeed {
        name: "Stop Loss",
        key: "sl",
        value_type: ValueType::Number,
        pattern: super::library::STOP_LOSS_COMPREHENSIVE,
        required: true,
        description: Some("Stop loss price level"),
    },
    RuleSeed {
        name: "Take Profit",
        key: "tp",
        value_type: ValueType::Array,
        pattern: super::library::TAKE_PROFIT_COMPREHENSIVE,
        required: false,
        description: Some("Take profit levels (can be multiple)"),
    },
    RuleSeed {
        name: "Timeframe",
        key: "timeframe",
        value_type: ValueType::String,
        pattern: super::library::TIMEFRAME_COMPREHENSIVE,
        required: false,
        description: Some("Chart timeframe (e.g., 1H, 4H, 1D)"),
    },
    RuleSeed {
        name: "Risk Reward Ratio",
        key: "risk_reward",
        value_type: ValueType::String,
        pattern: super::library::RISK_REWARD_COMPREHENSIVE,
        required: false,
        description: Some("Risk to reward ratio"),
    },
];

/// Look up a built-in collection.
pub fn collection(name: CollectionName) -> PatternCollection {
    let seeds = match name {
        CollectionName::Standard => STANDARD,
        CollectionName::Crypto => CRYPTO,
        CollectionName::Compact => COMPACT,
        CollectionName::Detailed => DETAILED,
    };
    PatternCollection { name, seeds }
}

/// The default rule list, materialized.
pub fn common_rules() -> Vec<FieldRule> {
    COMMON_RULES.iter().map(RuleSeed::materialize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;

    #[test]
    fn test_collection_names_round_trip() {
        for name in CollectionName::ALL {
            assert_eq!(name.as_str().parse::<CollectionName>().unwrap(), name);
        }
        assert_eq!("crypto".parse::<CollectionName>().unwrap(), CollectionName::Crypto);
        assert!("SWING".parse::<CollectionName>().is_err());
    }

    #[test]
    fn test_collections_compile_with_unique_keys() {
        for name in CollectionName::ALL {
            let rules = collection(name).materialize();
            assert!(!rules.is_empty());
            for (i, rule) in rules.iter().enumerate() {
                assert_unique_key(&rules, i);
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .unwrap_or_else(|e| panic!("{name}/{}: {e}", rule.key));
            }
        }
    }

    fn assert_unique_key(rules: &[FieldRule], i: usize) {
        assert!(
            rules[..i].iter().all(|r| r.key != rules[i].key),
            "duplicate key {}",
            rules[i].key
        );
    }

    #[test]
    fn test_common_rules_described() {
        let rules = common_rules();
        assert_eq!(rules.len(), 7);
        assert!(rules.iter().all(|r| r.description.is_some()));
        assert_eq!(rules[2].key, "entry");
        assert!(rules[2].required);
        assert!(!rules[4].required);
    }
}
