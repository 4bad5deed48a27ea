//! Field auto-detection: one rule per semantic field present in a sample.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::models::rule::{FieldRule, ValueType};
use crate::patterns::library::ENTRY_RANGE_DETECTION;
use crate::patterns::SemanticField;

lazy_static! {
    static ref SYMBOL: Regex = detector(SemanticField::Symbol.comprehensive());
    static ref SIGNAL_TYPE: Regex = detector(SemanticField::SignalType.comprehensive());
    static ref ENTRY_RANGE: Regex = detector(ENTRY_RANGE_DETECTION);
    static ref ENTRY: Regex = detector(SemanticField::Entry.comprehensive());
    static ref STOP_LOSS: Regex = detector(SemanticField::StopLoss.comprehensive());
    static ref TAKE_PROFIT: Regex = detector(SemanticField::TakeProfit.comprehensive());
    static ref TIMEFRAME: Regex = detector(SemanticField::Timeframe.comprehensive());
    static ref RISK_REWARD: Regex = detector(SemanticField::RiskReward.comprehensive());
}

fn detector(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .unwrap()
}

fn detected(
    field: SemanticField,
    value_type: ValueType,
    pattern: &str,
    required: bool,
    description: &str,
) -> FieldRule {
    FieldRule::regex(field.label(), field.key(), value_type, pattern)
        .with_required(required)
        .with_description(description)
}

/// Build a rule list from the fields present in `text`.
///
/// Fields always come out in the order symbol, type, entry, stop loss, take
/// profit, timeframe, risk/reward; absent fields are left out.
pub fn auto_detect_fields(text: &str) -> Vec<FieldRule> {
    let mut fields = Vec::new();

    if SYMBOL.is_match(text) {
        fields.push(detected(
            SemanticField::Symbol,
            ValueType::String,
            SemanticField::Symbol.comprehensive(),
            true,
            "Trading pair symbol",
        ));
    }

    if SIGNAL_TYPE.is_match(text) {
        fields.push(detected(
            SemanticField::SignalType,
            ValueType::String,
            SemanticField::SignalType.comprehensive(),
            true,
            "Trade direction",
        ));
    }

    // A two-price range is the more specific reading, so it is tried first.
    if ENTRY_RANGE.is_match(text) {
        fields.push(detected(
            SemanticField::Entry,
            ValueType::Array,
            ENTRY_RANGE_DETECTION,
            true,
            "Entry price level (range)",
        ));
    } else if ENTRY.is_match(text) {
        fields.push(detected(
            SemanticField::Entry,
            ValueType::Array,
            SemanticField::Entry.comprehensive(),
            true,
            "Entry price level (single or range)",
        ));
    }

    if STOP_LOSS.is_match(text) {
        fields.push(detected(
            SemanticField::StopLoss,
            ValueType::Number,
            SemanticField::StopLoss.comprehensive(),
            true,
            "Stop loss price level",
        ));
    }

    let tp_levels = TAKE_PROFIT.find_iter(text).count();
    if tp_levels > 0 {
        trace!("Found {} take profit levels", tp_levels);
        fields.push(detected(
            SemanticField::TakeProfit,
            ValueType::Array,
            SemanticField::TakeProfit.comprehensive(),
            false,
            "Take profit levels (can be multiple)",
        ));
    }

    if TIMEFRAME.is_match(text) {
        fields.push(detected(
            SemanticField::Timeframe,
            ValueType::String,
            SemanticField::Timeframe.comprehensive(),
            false,
            "Chart timeframe",
        ));
    }

    if RISK_REWARD.is_match(text) {
        fields.push(detected(
            SemanticField::RiskReward,
            ValueType::String,
            SemanticField::RiskReward.comprehensive(),
            false,
            "Risk to reward ratio",
        ));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, ExtractedValue};
    use pretty_assertions::assert_eq;

    fn keys(fields: &[FieldRule]) -> Vec<&str> {
        fields.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn test_range_entry_precedence() {
        let text = "EURUSD BUY 1.0845 1.0870";
        let fields = auto_detect_fields(text);

        assert_eq!(keys(&fields), vec!["symbol", "type", "entry"]);
        let entry = &fields[2];
        assert_eq!(entry.pattern, ENTRY_RANGE_DETECTION);
        assert_eq!(entry.description.as_deref(), Some("Entry price level (range)"));

        let results = extract(text, &fields);
        assert_eq!(
            results["entry"].value,
            Some(ExtractedValue::Numbers(vec![1.0845, 1.087]))
        );
        assert_eq!(results["symbol"].value, Some(ExtractedValue::Text("EURUSD".into())));
    }

    #[test]
    fn test_full_message() {
        let text = "XAUUSD SELL\nEntry: 2050.5\nSL: 2060\nTP1: 2040\nTP2: 2030\nTF: 4H\nRR 1:2";
        let fields = auto_detect_fields(text);

        assert_eq!(
            keys(&fields),
            vec!["symbol", "type", "entry", "sl", "tp", "timeframe", "risk_reward"]
        );
        assert_eq!(fields[2].pattern, SemanticField::Entry.comprehensive());
        assert!(fields[..4].iter().all(|f| f.required));
        assert!(fields[4..].iter().all(|f| !f.required));

        let results = extract(text, &fields);
        assert_eq!(results["tp"].value, Some(ExtractedValue::Numbers(vec![2040.0, 2030.0])));
        assert_eq!(results["timeframe"].value, Some(ExtractedValue::Text("4H".into())));
    }

    #[test]
    fn test_order_is_fixed() {
        // Take profit appears before the symbol in the text.
        let fields = auto_detect_fields("TP 2100 for GOLD");
        assert_eq!(keys(&fields), vec!["symbol", "tp"]);
    }

    #[test]
    fn test_nothing_detected() {
        assert!(auto_detect_fields("").is_empty());
        assert!(auto_detect_fields("ok, 12").is_empty());
    }
}
