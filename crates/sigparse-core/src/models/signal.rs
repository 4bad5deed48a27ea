//! Normalised trade signal produced from extracted fields.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete trade signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Traded instrument, as written in the message.
    pub symbol: String,

    /// Trade direction.
    pub direction: Direction,

    /// Entry price. For ranges this is the first bound.
    pub entry_price: Decimal,

    /// Every extracted entry value, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry_zone: Vec<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<StopLoss>,

    #[serde(default)]
    pub take_profits: Vec<TakeProfit>,

    /// Chart timeframe, e.g. `4H`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

/// Trade direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Buy,
    Sell,
}

impl Direction {
    /// Normalise a direction word. LONG counts as BUY, SHORT as SELL.
    pub fn from_word(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "LONG" => Some(Self::Buy),
            "SELL" | "SHORT" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => f.write_str("BUY"),
            Direction::Sell => f.write_str("SELL"),
        }
    }
}

/// Stop loss level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLoss {
    pub price: Decimal,
    #[serde(default)]
    pub hit: bool,
}

impl StopLoss {
    pub fn new(price: Decimal) -> Self {
        Self { price, hit: false }
    }
}

/// Take profit level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfit {
    /// Level label: `TP1`, `TP2`, ...
    pub level: String,
    pub price: Decimal,
    #[serde(default)]
    pub hit: bool,
    /// Reward over risk for this level; absent without a usable stop loss.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reward_ratio: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::from_word("buy"), Some(Direction::Buy));
        assert_eq!(Direction::from_word("LONG"), Some(Direction::Buy));
        assert_eq!(Direction::from_word(" Short "), Some(Direction::Sell));
        assert_eq!(Direction::from_word("SELL"), Some(Direction::Sell));
        assert_eq!(Direction::from_word("hold"), None);
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(serde_json::to_string(&Direction::Sell).unwrap(), "\"SELL\"");
        let d: Direction = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(d, Direction::Buy);
    }
}
