//! Trade signal assembly from extraction results.

mod parser;

pub use parser::{ParsedSignal, SignalParser};

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::SignalError;
use crate::extract::{ExtractedValue, ExtractionMap};
use crate::models::config::SignalConfig;
use crate::models::signal::{Direction, Signal, StopLoss, TakeProfit};

/// Keys read for the trade direction, in order.
const DIRECTION_KEYS: [&str; 2] = ["type", "signal_type"];

fn value<'a>(results: &'a ExtractionMap, key: &str) -> Option<&'a ExtractedValue> {
    results.get(key).and_then(|r| r.value.as_ref())
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, SignalError> {
    value
        .to_string()
        .parse::<Decimal>()
        .map_err(|_| SignalError::InvalidPrice {
            field: field.to_string(),
            value,
        })
}

fn to_decimals(field: &str, values: &[f64]) -> Result<Vec<Decimal>, SignalError> {
    values.iter().map(|v| to_decimal(field, *v)).collect()
}

/// Reward over risk for one take profit level, rounded to `decimal_places`
/// with banker's rounding. `None` when the stop loss sits at the entry.
pub fn risk_reward(
    direction: Direction,
    entry: Decimal,
    stop_loss: Decimal,
    take_profit: Decimal,
    decimal_places: u32,
) -> Option<Decimal> {
    let (risk, reward) = match direction {
        Direction::Buy => (entry - stop_loss, take_profit - entry),
        Direction::Sell => (stop_loss - entry, entry - take_profit),
    };

    if risk.is_zero() {
        return None;
    }

    reward
        .checked_div(risk)
        .map(|ratio| ratio.round_dp(decimal_places))
}

/// Build a [`Signal`] from extraction results.
///
/// `symbol` and `entry` must be present. The direction falls back to the
/// configured default; stop loss and take profits are read from the keys
/// listed in `config`.
pub fn assemble(results: &ExtractionMap, config: &SignalConfig) -> Result<Signal, SignalError> {
    let symbol = value(results, "symbol")
        .map(|v| v.to_string().trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(SignalError::MissingSymbol)?;

    let entry_zone = value(results, "entry")
        .map(ExtractedValue::numbers)
        .map(|values| to_decimals("entry", &values))
        .transpose()?
        .unwrap_or_default();
    let entry_price = *entry_zone.first().ok_or(SignalError::MissingEntry)?;

    let direction = DIRECTION_KEYS
        .iter()
        .find_map(|key| value(results, key))
        .and_then(|v| v.as_text().and_then(Direction::from_word))
        .unwrap_or(config.default_direction);

    let stop_loss = config
        .stop_loss_keys
        .iter()
        .find_map(|key| {
            let price = value(results, key)?.numbers().first().copied()?;
            Some(to_decimal(key, price))
        })
        .transpose()?
        .map(StopLoss::new);

    let mut take_profits = Vec::new();
    for key in &config.take_profit_keys {
        let Some(values) = value(results, key).map(ExtractedValue::numbers) else {
            continue;
        };

        for (i, price) in to_decimals(key, &values)?.into_iter().enumerate() {
            let risk_reward_ratio = stop_loss.as_ref().and_then(|sl| {
                risk_reward(direction, entry_price, sl.price, price, config.rr_decimal_places)
            });
            take_profits.push(TakeProfit {
                level: format!("TP{}", i + 1),
                price,
                hit: false,
                risk_reward_ratio,
            });
        }
    }

    let timeframe = value(results, "timeframe").map(|v| v.to_string());

    debug!(
        "Assembled {} {} @ {} with {} take profits",
        direction,
        symbol,
        entry_price,
        take_profits.len()
    );

    Ok(Signal {
        symbol,
        direction,
        entry_price,
        entry_zone,
        stop_loss,
        take_profits,
        timeframe,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, ExtractionResult, FieldError};
    use crate::patterns::{collection, CollectionName};
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_assemble_gold_signal() {
        let text = "GOLD BUY NOW @ 2045.50\nSL: 2040\nTP1: 2050\nTP2: 2055";
        let results = extract(text, &collection(CollectionName::Standard).materialize());
        let signal = assemble(&results, &SignalConfig::default()).unwrap();

        assert_eq!(signal.symbol, "GOLD");
        assert_eq!(signal.direction, Direction::Buy);
        assert_eq!(signal.entry_price, dec("2045.5"));
        assert_eq!(signal.stop_loss, Some(StopLoss::new(dec("2040"))));
        assert_eq!(signal.take_profits.len(), 2);
        assert_eq!(signal.take_profits[0].level, "TP1");
        assert_eq!(signal.take_profits[1].price, dec("2055"));
        // (2050 - 2045.5) / (2045.5 - 2040) = 0.818...
        assert_eq!(signal.take_profits[0].risk_reward_ratio, Some(dec("0.82")));
        assert_eq!(signal.take_profits[1].risk_reward_ratio, Some(dec("1.73")));
    }

    #[test]
    fn test_sell_risk_reward() {
        let rr = risk_reward(Direction::Sell, dec("64500"), dec("65200"), dec("62400"), 2);
        assert_eq!(rr, Some(dec("3.00")));
        assert_eq!(risk_reward(Direction::Buy, dec("10"), dec("10"), dec("12"), 2), None);
    }

    #[test]
    fn test_bankers_rounding() {
        // 1.125 rounds to even.
        let rr = risk_reward(Direction::Buy, dec("100"), dec("92"), dec("109"), 2);
        assert_eq!(rr, Some(dec("1.12")));
    }

    #[test]
    fn test_short_maps_to_sell() {
        let text = "Short BTC/USD\nEntry: 64500\nStop: 65200";
        let results = extract(text, &collection(CollectionName::Crypto).materialize());
        let signal = assemble(&results, &SignalConfig::default()).unwrap();

        assert_eq!(signal.symbol, "BTC/USD");
        assert_eq!(signal.direction, Direction::Sell);
        assert_eq!(signal.stop_loss.map(|sl| sl.price), Some(dec("65200")));
        assert!(signal.take_profits.is_empty());
    }

    #[test]
    fn test_entry_range_zone() {
        let mut results = ExtractionMap::new();
        results.insert(
            "symbol".into(),
            ExtractionResult::found(ExtractedValue::Text("EURUSD".into()), Some(0)),
        );
        results.insert(
            "entry".into(),
            ExtractionResult::found(ExtractedValue::Numbers(vec![1.0845, 1.087]), None),
        );

        let signal = assemble(&results, &SignalConfig::default()).unwrap();
        assert_eq!(signal.entry_price, dec("1.0845"));
        assert_eq!(signal.entry_zone, vec![dec("1.0845"), dec("1.087")]);
        assert_eq!(signal.direction, Direction::Buy);
        assert_eq!(signal.stop_loss, None);
    }

    #[test]
    fn test_missing_required_parts() {
        let mut results = ExtractionMap::new();
        results.insert("symbol".into(), ExtractionResult::failed(FieldError::NotFound));
        assert_eq!(
            assemble(&results, &SignalConfig::default()),
            Err(SignalError::MissingSymbol)
        );

        results.insert(
            "symbol".into(),
            ExtractionResult::found(ExtractedValue::Text("GOLD".into()), Some(0)),
        );
        assert_eq!(
            assemble(&results, &SignalConfig::default()),
            Err(SignalError::MissingEntry)
        );
    }

    #[test]
    fn test_configured_default_direction() {
        let mut results = ExtractionMap::new();
        results.insert(
            "symbol".into(),
            ExtractionResult::found(ExtractedValue::Text("GOLD".into()), Some(0)),
        );
        results.insert(
            "entry".into(),
            ExtractionResult::found(ExtractedValue::Number(2045.0), None),
        );
        results.insert(
            "type".into(),
            ExtractionResult::found(ExtractedValue::Text("HOLD".into()), None),
        );

        let config = SignalConfig {
            default_direction: Direction::Sell,
            ..SignalConfig::default()
        };
        assert_eq!(assemble(&results, &config).unwrap().direction, Direction::Sell);
    }
}
