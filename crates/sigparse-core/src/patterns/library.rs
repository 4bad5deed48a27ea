//! Catalog of regex sources per semantic field.
//!
//! Every entry is plain pattern text with no inline flags. Callers pick the
//! flags: case-insensitive for everything, all-matches for array fields.
//! No entry uses look-around, which the `regex` crate does not support; a
//! "followed by" condition is written as a consuming non-capturing group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bumped whenever a pattern in this module changes meaning.
pub const LIBRARY_VERSION: u32 = 1;

/// Price-shaped token: digits, optional dot, optional decimals.
pub const PRICE: &str = r"[0-9]+\.?[0-9]*";

/// A named pattern variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternVariant {
    pub name: &'static str,
    pub source: &'static str,
}

const fn variant(name: &'static str, source: &'static str) -> PatternVariant {
    PatternVariant { name, source }
}

// Symbol

pub const SYMBOL_COMPREHENSIVE: &str = r"(?:^|\s)(GOLD|SILVER|OIL|CRUDE|BRENT|WTI|XAU|XAG|XPT|XPD|US30|SPX|SP500|NAS100|NASDAQ|DXY|VIX|FTSE|DAX|NIKKEI|BTC|ETH|BNB|ADA|SOL|XRP|DOT|DOGE|MATIC|AVAX|[A-Z]{3,6}(?:USD|JPY|EUR|GBP|CHF|CAD|AUD|NZD|USDT|SEK|NOK|ZAR|MXN|TRY)?)(?:\s|$|BUY|SELL|LONG|SHORT)";

const SYMBOL: &[PatternVariant] = &[
    variant(
        "commodity_names",
        r"(GOLD|SILVER|OIL|CRUDE|BRENT|WTI|PLATINUM|PALLADIUM)",
    ),
    variant("commodity_codes", r"(XAU|XAG|XPT|XPD)(?:USD)?"),
    variant(
        "forex_pairs",
        r"([A-Z]{3}(?:USD|JPY|EUR|GBP|CHF|CAD|AUD|NZD|SEK|NOK|ZAR|MXN|TRY))",
    ),
    variant(
        "crypto",
        r"(BTC|ETH|BNB|ADA|SOL|XRP|DOT|DOGE|MATIC|AVAX|LINK|UNI|LTC|BCH|XLM|ATOM|ALGO|VET|FIL|TRX|EOS|AAVE|COMP|MKR|SNX|SUSHI|YFI|1INCH|GRT|ENJ|MANA|SAND|AXS|GALA|RUNE|THETA|FLOW|NEAR|FTM|LUNA|UST)(?:USDT|USD)?",
    ),
    variant(
        "indices",
        r"(US30|SPX|SP500|NAS100|NASDAQ|DXY|VIX|FTSE|DAX|NIKKEI|CAC|ASX|HSI|SSE)",
    ),
    variant(
        "standard",
        r"(?:^|\s)([A-Z]{2,8}(?:USD|JPY|EUR|GBP|CHF|CAD|AUD|NZD|USDT)?)(?:\s|$|BUY|SELL|LONG|SHORT)",
    ),
    variant("comprehensive", SYMBOL_COMPREHENSIVE),
];

// Direction

pub const SIGNAL_TYPE_COMPREHENSIVE: &str = r"(BUY|SELL|LONG|SHORT)";

const SIGNAL_TYPE: &[PatternVariant] = &[
    variant("standard", SIGNAL_TYPE_COMPREHENSIVE),
    variant("with_order", r"(BUY|SELL|LONG|SHORT)\s+(?:NOW|LIMIT|MARKET|STOP)?"),
    variant(
        "alternative",
        r"(GO\s+LONG|GO\s+SHORT|OPEN\s+LONG|OPEN\s+SHORT)",
    ),
    variant("comprehensive", SIGNAL_TYPE_COMPREHENSIVE),
];

// Entry

/// Single entry value with an optional second bound.
pub const ENTRY_COMPREHENSIVE: &str = r"(?:Entry|EP|Entry\s*Price|@|Price|(?:BUY|SELL|LONG|SHORT))\s*:?\s*([0-9]+\.?[0-9]*)(?:\s+(?:[-–—]|to)?\s*([0-9]+\.?[0-9]*))?";

/// Two whitespace-separated prices after an entry-style marker.
pub const ENTRY_RANGE_DETECTION: &str = r"(?:Entry|EP|Entry\s*Price|@|(?:BUY|SELL|LONG|SHORT))\s*:?\s*([0-9]+\.?[0-9]*)\s+([0-9]+\.?[0-9]*)";

const ENTRY: &[PatternVariant] = &[
    variant("at_symbol", r"@\s*([0-9]+\.?[0-9]*)"),
    variant(
        "entry_label",
        r"(?:Entry|EP|Entry\s*Price)\s*:?\s*([0-9]+\.?[0-9]*)",
    ),
    variant("price_only", r"(?:Price|P)\s*:?\s*([0-9]+\.?[0-9]*)"),
    variant(
        "range_after_direction",
        r"(?:BUY|SELL|LONG|SHORT)\s+([0-9]+\.?[0-9]*)\s+([0-9]+\.?[0-9]*)",
    ),
    variant(
        "range_with_label",
        r"(?:Entry|EP|Entry\s*Price)\s*:?\s*([0-9]+\.?[0-9]*)\s+([0-9]+\.?[0-9]*)",
    ),
    variant(
        "range_with_at",
        r"@\s*([0-9]+\.?[0-9]*)\s+([0-9]+\.?[0-9]*)",
    ),
    variant(
        "range_with_dash",
        r"(?:Entry|EP|@)\s*:?\s*([0-9]+\.?[0-9]*)\s*[-–—]\s*([0-9]+\.?[0-9]*)",
    ),
    variant(
        "range_with_to",
        r"(?:Entry|EP)\s*:?\s*([0-9]+\.?[0-9]*)\s+to\s+([0-9]+\.?[0-9]*)",
    ),
    variant("range_detection", ENTRY_RANGE_DETECTION),
    variant("comprehensive", ENTRY_COMPREHENSIVE),
];

// Stop loss

pub const STOP_LOSS_COMPREHENSIVE: &str =
    r"(?:SL|Stop\s*Loss|Stop|S\.L\.|S\/L)\s*:?\s*([0-9]+\.?[0-9]*)";

const STOP_LOSS: &[PatternVariant] = &[
    variant(
        "standard",
        r"(?:SL|Stop\s*Loss|Stop)\s*:?\s*([0-9]+\.?[0-9]*)",
    ),
    variant(
        "with_pips",
        r"(?:SL|Stop)\s*:?\s*([0-9]+\.?[0-9]*)\s*(?:pips?)?",
    ),
    variant(
        "alternative",
        r"(?:Stop|S\.L\.|S\/L)\s*:?\s*([0-9]+\.?[0-9]*)",
    ),
    variant("comprehensive", STOP_LOSS_COMPREHENSIVE),
];

// Take profit

/// Matches every TP level: `TP`, `TP1`, `Target`, `Take Profit 2`, ...
pub const TAKE_PROFIT_COMPREHENSIVE: &str =
    r"(?:TP|Take\s*Profit|Target)\d?\s*:?\s*([0-9]+\.?[0-9]*)";

const TAKE_PROFIT: &[PatternVariant] = &[
    variant(
        "single",
        r"(?:TP|Take\s*Profit|Target)\s*:?\s*([0-9]+\.?[0-9]*)",
    ),
    variant(
        "numbered",
        r"(?:TP|Take\s*Profit|Target)\s*(\d+)\s*:?\s*([0-9]+\.?[0-9]*)",
    ),
    variant("with_pips", r"(?:TP|Target)\s*:?\s*([0-9]+\.?[0-9]*)\s*(?:pips?)?"),
    variant("comprehensive", TAKE_PROFIT_COMPREHENSIVE),
];

// Timeframe

pub const TIMEFRAME_COMPREHENSIVE: &str =
    r"(?:TF|Timeframe|Time|Chart)\s*:?\s*([1-9]\d*[MHDW])";

const TIMEFRAME: &[PatternVariant] = &[
    variant("standard", r"(?:TF|Timeframe|Time)\s*:?\s*([1-9]\d*[MHDW])"),
    variant("inline", r"\b([1-9]\d*[MHDW])\b"),
    variant("comprehensive", TIMEFRAME_COMPREHENSIVE),
];

// Risk/reward

pub const RISK_REWARD_COMPREHENSIVE: &str = r"(?:R:R|RR|Risk:Reward|Risk\/Reward)\s*:?\s*([0-9]+\.?[0-9]*)\s*:?\s*([0-9]+\.?[0-9]*)";

const RISK_REWARD: &[PatternVariant] = &[
    variant("standard", RISK_REWARD_COMPREHENSIVE),
    variant("ratio_only", r"(?:R:R|RR)\s*:?\s*([0-9]+\.?[0-9]*)"),
    variant("comprehensive", RISK_REWARD_COMPREHENSIVE),
];

// Position sizing

const LOT_SIZE: &[PatternVariant] = &[
    variant("standard", r"(?:Lot|Size|Position)\s*:?\s*([0-9]+\.?[0-9]*)"),
    variant("alternative", r"([0-9]+\.?[0-9]*)\s*(?:lots?|units?)"),
];

const LEVERAGE: &[PatternVariant] = &[
    variant("standard", r"(?:Leverage|Lev|L)\s*:?\s*([0-9]+)\s*(?:x|:1)?"),
    variant("compact", r"([0-9]+)x"),
];

/// Semantic field a pattern targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticField {
    Symbol,
    SignalType,
    Entry,
    StopLoss,
    TakeProfit,
    Timeframe,
    RiskReward,
    LotSize,
    Leverage,
}

impl SemanticField {
    /// Every field in the catalog.
    pub const ALL: [SemanticField; 9] = [
        SemanticField::Symbol,
        SemanticField::SignalType,
        SemanticField::Entry,
        SemanticField::StopLoss,
        SemanticField::TakeProfit,
        SemanticField::Timeframe,
        SemanticField::RiskReward,
        SemanticField::LotSize,
        SemanticField::Leverage,
    ];

    /// All named variants for this field.
    pub fn variants(self) -> &'static [PatternVariant] {
        match self {
            SemanticField::Symbol => SYMBOL,
            SemanticField::SignalType => SIGNAL_TYPE,
            SemanticField::Entry => ENTRY,
            SemanticField::StopLoss => STOP_LOSS,
            SemanticField::TakeProfit => TAKE_PROFIT,
            SemanticField::Timeframe => TIMEFRAME,
            SemanticField::RiskReward => RISK_REWARD,
            SemanticField::LotSize => LOT_SIZE,
            SemanticField::Leverage => LEVERAGE,
        }
    }

    /// A variant by name.
    pub fn variant(self, name: &str) -> Option<&'static str> {
        self.variants()
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.source)
    }

    /// The broadest variant for this field.
    pub fn comprehensive(self) -> &'static str {
        match self {
            SemanticField::Symbol => SYMBOL_COMPREHENSIVE,
            SemanticField::SignalType => SIGNAL_TYPE_COMPREHENSIVE,
            SemanticField::Entry => ENTRY_COMPREHENSIVE,
            SemanticField::StopLoss => STOP_LOSS_COMPREHENSIVE,
            SemanticField::TakeProfit => TAKE_PROFIT_COMPREHENSIVE,
            SemanticField::Timeframe => TIMEFRAME_COMPREHENSIVE,
            SemanticField::RiskReward => RISK_REWARD_COMPREHENSIVE,
            SemanticField::LotSize => LOT_SIZE[0].source,
            SemanticField::Leverage => LEVERAGE[0].source,
        }
    }

    /// Output key used for this field in generated rules.
    pub fn key(self) -> &'static str {
        match self {
            SemanticField::Symbol => "symbol",
            SemanticField::SignalType => "type",
            SemanticField::Entry => "entry",
            SemanticField::StopLoss => "sl",
            SemanticField::TakeProfit => "tp",
            SemanticField::Timeframe => "timeframe",
            SemanticField::RiskReward => "risk_reward",
            SemanticField::LotSize => "lot_size",
            SemanticField::Leverage => "leverage",
        }
    }

    /// Human label used for this field in generated rules.
    pub fn label(self) -> &'static str {
        match self {
            SemanticField::Symbol => "Symbol",
            SemanticField::SignalType => "Type",
            SemanticField::Entry => "Entry",
            SemanticField::StopLoss => "Stop Loss",
            SemanticField::TakeProfit => "Take Profit",
            SemanticField::Timeframe => "Timeframe",
            SemanticField::RiskReward => "Risk Reward",
            SemanticField::LotSize => "Lot Size",
            SemanticField::Leverage => "Leverage",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl SemanticField {
    /// Snake-case name, as serialised.
    pub fn name(self) -> &'static str {
        match self {
            SemanticField::Symbol => "symbol",
            SemanticField::SignalType => "signal_type",
            SemanticField::Entry => "entry",
            SemanticField::StopLoss => "stop_loss",
            SemanticField::TakeProfit => "take_profit",
            SemanticField::Timeframe => "timeframe",
            SemanticField::RiskReward => "risk_reward",
            SemanticField::LotSize => "lot_size",
            SemanticField::Leverage => "leverage",
        }
    }
}

impl FromStr for SemanticField {
    type Err = String;

    /// Accepts the field name or its output key, e.g. `stop_loss` or `sl`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        SemanticField::ALL
            .into_iter()
            .find(|f| f.name() == normalized || f.key() == normalized)
            .ok_or_else(|| format!("unknown field: {}", s))
    }
}
