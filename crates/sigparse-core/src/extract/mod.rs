//! Rule-driven field extraction.
//!
//! [`extract`] applies every rule of a list to a message and returns one
//! [`ExtractionResult`] per rule key. Problems with a single rule (empty
//! pattern, bad regex, nothing matched) are reported inside that rule's
//! result and never affect the other rules.

mod engine;
mod marker;
mod numbers;
mod preview;

pub use engine::{extract, RegexExtractor, RuleEngine};
pub use marker::MarkerExtractor;
pub use numbers::parse_number;
pub use preview::{missing_required, PreviewCache};

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::rule::FieldRule;

/// Per-field extraction problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldError {
    /// The rule has no pattern (or no start marker).
    #[serde(rename = "Empty pattern")]
    EmptyPattern,
    /// A required field did not match, or matched text could not be typed.
    #[serde(rename = "Not found")]
    NotFound,
    /// The pattern is not a valid regular expression.
    #[serde(rename = "Regex Error")]
    RegexError,
}

impl FieldError {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldError::EmptyPattern => "Empty pattern",
            FieldError::NotFound => "Not found",
            FieldError::RegexError => "Regex Error",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extracted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedValue {
    Text(String),
    Number(f64),
    Numbers(Vec<f64>),
}

impl ExtractedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExtractedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view: a number as one value, a list as-is, text parsed.
    pub fn numbers(&self) -> Vec<f64> {
        match self {
            ExtractedValue::Number(n) => vec![*n],
            ExtractedValue::Numbers(ns) => ns.clone(),
            ExtractedValue::Text(s) => parse_number(s).into_iter().collect(),
        }
    }
}

impl fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractedValue::Text(s) => f.write_str(s),
            ExtractedValue::Number(n) => write!(f, "{}", n),
            ExtractedValue::Numbers(ns) => {
                let parts: Vec<String> = ns.iter().map(|n| n.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Outcome of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted value; `None` when nothing usable matched.
    pub value: Option<ExtractedValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldError>,

    /// Character offset of the first match, for scalar fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_index: Option<usize>,
}

impl ExtractionResult {
    pub fn found(value: ExtractedValue, match_index: Option<usize>) -> Self {
        Self {
            value: Some(value),
            error: None,
            match_index,
        }
    }

    pub fn failed(error: FieldError) -> Self {
        Self {
            value: None,
            error: Some(error),
            match_index: None,
        }
    }

    /// Nothing matched for `rule`. Only required scalar fields carry an
    /// error; array fields report a bare null.
    pub fn absent(rule: &FieldRule) -> Self {
        let error = (rule.required && !rule.value_type.is_array()).then_some(FieldError::NotFound);
        Self {
            value: None,
            error,
            match_index: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

/// Results keyed by rule key, in rule order.
pub type ExtractionMap = IndexMap<String, ExtractionResult>;

/// Trait for rule-driven field extractors.
pub trait FieldExtractor {
    /// Apply one rule to the text.
    fn extract(&self, text: &str, rule: &FieldRule) -> ExtractionResult;
}

/// Character offset of a byte position in `text`.
pub(crate) fn char_offset(text: &str, byte_pos: usize) -> usize {
    text.get(..byte_pos).map_or(0, |prefix| prefix.chars().count())
}
