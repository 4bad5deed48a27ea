//! Marker-method extraction.

use tracing::trace;

use super::numbers::parse_number;
use super::{char_offset, ExtractedValue, ExtractionResult, FieldError, FieldExtractor};
use crate::models::rule::{FieldRule, ValueType};

/// Marker-method extractor: the text between a start marker and an end
/// marker. Without an end marker the value runs to the end of the line.
#[derive(Debug, Clone, Default)]
pub struct MarkerExtractor;

impl MarkerExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Locate the raw value for `rule`. Returns the byte offset where the
    /// value starts along with the trimmed value.
    fn locate<'t>(&self, text: &'t str, start: &str, end: Option<&str>) -> Option<(usize, &'t str)> {
        let value_start = text.find(start)? + start.len();
        let rest = &text[value_start..];

        let raw = match end.filter(|e| !e.is_empty()) {
            Some(end) => rest.find(end).map_or(rest, |i| &rest[..i]),
            None => rest.lines().next().unwrap_or(""),
        };

        let leading = raw.len() - raw.trim_start().len();
        let value = raw.trim();
        (!value.is_empty()).then_some((value_start + leading, value))
    }
}

impl FieldExtractor for MarkerExtractor {
    fn extract(&self, text: &str, rule: &FieldRule) -> ExtractionResult {
        let Some(start) = rule.start_marker.as_deref().filter(|s| !s.is_empty()) else {
            return ExtractionResult::failed(FieldError::EmptyPattern);
        };

        let Some((offset, value)) = self.locate(text, start, rule.end_marker.as_deref()) else {
            trace!("Marker {:?} for '{}' not found", start, rule.key);
            return ExtractionResult::absent(rule);
        };

        let match_index = Some(char_offset(text, offset));

        match rule.value_type {
            ValueType::String => {
                ExtractionResult::found(ExtractedValue::Text(value.to_string()), match_index)
            }
            ValueType::Number => match parse_number(value) {
                Some(n) => ExtractionResult::found(ExtractedValue::Number(n), match_index),
                None => ExtractionResult::absent(rule),
            },
            ValueType::Array => {
                let values: Vec<f64> = value
                    .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
                    .filter_map(parse_number)
                    .collect();
                if values.is_empty() {
                    ExtractionResult::absent(rule)
                } else {
                    ExtractionResult::found(ExtractedValue::Numbers(values), match_index)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "Pair: XAUUSD\nEntry: 2045.50\nTargets: 2050, 2055 2060\nNote: scalp only";

    fn marker(key: &str, value_type: ValueType, start: &str, end: Option<&str>) -> FieldRule {
        FieldRule::marker(key, key, value_type, start, end.map(str::to_string))
    }

    #[test]
    fn test_value_runs_to_end_of_line() {
        let result = MarkerExtractor::new().extract(TEXT, &marker("pair", ValueType::String, "Pair:", None));
        assert_eq!(result.value, Some(ExtractedValue::Text("XAUUSD".into())));
        assert_eq!(result.match_index, Some(6));
    }

    #[test]
    fn test_end_marker() {
        let rule = marker("entry", ValueType::Number, "Entry:", Some("\n"));
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert_eq!(result.value, Some(ExtractedValue::Number(2045.5)));
    }

    #[test]
    fn test_missing_end_marker_takes_rest_of_text() {
        let rule = marker("note", ValueType::String, "Note:", Some("|"));
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert_eq!(result.value, Some(ExtractedValue::Text("scalp only".into())));

        let rule = marker("tail", ValueType::String, "Entry:", Some("###"));
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert!(result.value.unwrap().as_text().unwrap().ends_with("scalp only"));
    }

    #[test]
    fn test_array_tokens() {
        let rule = marker("tp", ValueType::Array, "Targets:", None);
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert_eq!(result.value, Some(ExtractedValue::Numbers(vec![2050.0, 2055.0, 2060.0])));
    }

    #[test]
    fn test_empty_start_marker() {
        let result = MarkerExtractor::new().extract(TEXT, &marker("x", ValueType::String, "", None));
        assert_eq!(result, ExtractionResult::failed(FieldError::EmptyPattern));

        let mut rule = marker("x", ValueType::String, "Pair:", None);
        rule.start_marker = None;
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert_eq!(result.error, Some(FieldError::EmptyPattern));
    }

    #[test]
    fn test_not_found() {
        let rule = marker("sl", ValueType::Number, "SL:", None).with_required(true);
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert_eq!(result, ExtractionResult::failed(FieldError::NotFound));

        // Case-sensitive search.
        let rule = marker("pair", ValueType::String, "pair:", None);
        assert_eq!(MarkerExtractor::new().extract(TEXT, &rule).value, None);
    }

    #[test]
    fn test_empty_value_is_not_found() {
        let rule = marker("x", ValueType::String, "Pair:", Some("XAUUSD")).with_required(true);
        let result = MarkerExtractor::new().extract(TEXT, &rule);
        assert_eq!(result.error, Some(FieldError::NotFound));
    }
}
