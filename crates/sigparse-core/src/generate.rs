//! Rules from highlighted text.
//!
//! Given a message and a substring the user selected, produce a pattern that
//! finds the same kind of value after the same delimiter in other messages.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::rule::{FieldRule, ValueType};

/// How many characters before the selection are searched for a delimiter.
const CONTEXT_CHARS: usize = 15;

lazy_static! {
    static ref NUMERIC: Regex = Regex::new(r"^[0-9.]+$").unwrap();
    static ref SYMBOL: Regex = Regex::new(r"^[A-Z]{2,6}$").unwrap();
    static ref PAIR: Regex = Regex::new(r"^[A-Z]{2,6}/[A-Z]{2,6}$").unwrap();
    static ref TIMEFRAME: Regex = Regex::new(r"(?i)^[0-9]+[MHDW]$").unwrap();
}

/// Shape of a selected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Number,
    Symbol,
    Pair,
    Timeframe,
    Other,
}

impl Shape {
    fn of(selection: &str) -> Self {
        if NUMERIC.is_match(selection) && selection.parse::<f64>().is_ok() {
            Shape::Number
        } else if SYMBOL.is_match(selection) {
            Shape::Symbol
        } else if PAIR.is_match(selection) {
            Shape::Pair
        } else if TIMEFRAME.is_match(selection) {
            Shape::Timeframe
        } else {
            Shape::Other
        }
    }

    fn capture(self) -> &'static str {
        match self {
            Shape::Number => r"([0-9]+\.?[0-9]*)",
            Shape::Symbol => r"([A-Z]{2,6})",
            Shape::Pair => r"([A-Z]{2,6}\/[A-Z]{2,6})",
            Shape::Timeframe => r"([0-9]+[MHDW])",
            Shape::Other => r"(.+)",
        }
    }

    fn name_and_key(self) -> (&'static str, &'static str) {
        match self {
            Shape::Number => ("Price", "price"),
            Shape::Symbol => ("Symbol", "symbol"),
            Shape::Pair => ("Pair", "pair"),
            Shape::Timeframe => ("Timeframe", "timeframe"),
            Shape::Other => ("Field", "field"),
        }
    }
}

/// The run of `:`, `@`, `=` and whitespace that ends `context`, if any.
fn trailing_delimiter(context: &str) -> &str {
    let kept = context.trim_end_matches(|c: char| matches!(c, ':' | '@' | '=') || c.is_whitespace());
    &context[kept.len()..]
}

/// Delimiter as pattern text: whitespace runs become `\s*`, symbols are
/// escaped.
fn delimiter_pattern(delimiter: &str) -> String {
    let mut pattern = String::new();
    for c in delimiter.chars() {
        if c.is_whitespace() {
            if !pattern.ends_with(r"\s*") {
                pattern.push_str(r"\s*");
            }
        } else {
            pattern.push('\\');
            pattern.push(c);
        }
    }
    pattern
}

/// Generate a pattern for `selection` as it appears in `full_text`.
///
/// When the selection follows a delimiter, the result is the delimiter plus
/// a capture group generalised from the selection's shape. Otherwise the
/// selection itself is captured literally.
pub fn generate_rule(full_text: &str, selection: &str) -> String {
    let literal = format!("({})", regex::escape(selection));

    let Some(start) = full_text.find(selection) else {
        debug!("Selection {:?} not found in text", selection);
        return literal;
    };

    let before = &full_text[..start];
    let context_start = before
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let delimiter = trailing_delimiter(&before[context_start..]);

    if delimiter.is_empty() {
        return literal;
    }

    format!("{}{}", delimiter_pattern(delimiter), Shape::of(selection).capture())
}

/// A ready-to-edit rule for `selection`, named after its value shape.
pub fn suggest_field(full_text: &str, selection: &str) -> FieldRule {
    let shape = Shape::of(selection);
    let (name, key) = shape.name_and_key();
    let value_type = match shape {
        Shape::Number => ValueType::Number,
        _ => ValueType::String,
    };

    FieldRule::regex(name, key, value_type, generate_rule(full_text, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, ExtractedValue};
    use pretty_assertions::assert_eq;

    const GOLD: &str = "GOLD BUY NOW @ 2045.50\nSL: 2040\nTP1: 2050";

    #[test]
    fn test_number_after_at() {
        assert_eq!(generate_rule(GOLD, "2045.50"), r"\s*\@\s*([0-9]+\.?[0-9]*)");
    }

    #[test]
    fn test_colon_delimiter() {
        assert_eq!(generate_rule(GOLD, "2040"), r"\:\s*([0-9]+\.?[0-9]*)");
    }

    #[test]
    fn test_value_shapes() {
        assert_eq!(generate_rule("Pair: BTC/USDT", "BTC/USDT"), r"\:\s*([A-Z]{2,6}\/[A-Z]{2,6})");
        assert_eq!(generate_rule("TF= 4h", "4h"), r"\=\s*([0-9]+[MHDW])");
        assert_eq!(generate_rule("Symbol: XAU", "XAU"), r"\:\s*([A-Z]{2,6})");
        assert_eq!(generate_rule("Note: scalp it", "scalp it"), r"\:\s*(.+)");
        assert_eq!(generate_rule("Lots: 1.2.3", "1.2.3"), r"\:\s*(.+)");
    }

    #[test]
    fn test_no_delimiter_is_literal() {
        assert_eq!(generate_rule(GOLD, "GOLD"), "(GOLD)");
        assert_eq!(generate_rule("xTP1.5", "1.5"), r"(1\.5)");
    }

    #[test]
    fn test_selection_not_in_text() {
        assert_eq!(generate_rule(GOLD, "99.5"), r"(99\.5)");
    }

    #[test]
    fn test_context_is_char_bounded() {
        // The delimiter must fall within the last 15 characters.
        let text = "€€€€€€€€€€€€€€€€€€ @ 12";
        assert_eq!(generate_rule(text, "12"), r"\s*\@\s*([0-9]+\.?[0-9]*)");
    }

    #[test]
    fn test_generated_rule_extracts() {
        let rule = suggest_field(GOLD, "2045.50");
        assert_eq!(rule.key, "price");
        assert_eq!(rule.value_type, ValueType::Number);

        let results = extract("SILVER SELL @ 24.10", &[rule]);
        assert_eq!(results["price"].value, Some(ExtractedValue::Number(24.1)));
    }

    #[test]
    fn test_suggest_field_shapes() {
        assert_eq!(suggest_field("Pair: BTC/USDT", "BTC/USDT").key, "pair");
        assert_eq!(suggest_field("TF: 1H", "1H").value_type, ValueType::String);
        assert_eq!(suggest_field("Note: hi", "hi").key, "field");
    }
}
