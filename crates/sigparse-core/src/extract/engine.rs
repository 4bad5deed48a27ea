//! Regex extraction and the rule engine that dispatches by method.

use regex::{Captures, Regex, RegexBuilder};
use tracing::{debug, trace, warn};

use super::marker::MarkerExtractor;
use super::numbers::parse_number;
use super::{
    char_offset, ExtractedValue, ExtractionMap, ExtractionResult, FieldError, FieldExtractor,
};
use crate::models::config::ExtractionConfig;
use crate::models::rule::{ExtractionMethod, FieldRule, ValueType};

/// Regex-method extractor.
///
/// Patterns are compiled on every call. A `Regex` keeps no match position
/// between searches, so nothing carries over from one call to the next.
///
/// Rule patterns normally carry one capture group (two for ranges). A
/// pattern with no groups at all is still accepted: its whole match becomes
/// the value instead of being reported as not found.
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    size_limit: usize,
    dfa_size_limit: usize,
    max_pattern_len: usize,
}

impl RegexExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            size_limit: config.regex_size_limit,
            dfa_size_limit: config.dfa_size_limit,
            max_pattern_len: config.max_pattern_len,
        }
    }

    /// Set the compiled program size limit.
    pub fn with_size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = bytes;
        self
    }

    /// Set the lazy DFA cache limit.
    pub fn with_dfa_size_limit(mut self, bytes: usize) -> Self {
        self.dfa_size_limit = bytes;
        self
    }

    /// Set the longest accepted pattern.
    pub fn with_max_pattern_len(mut self, len: usize) -> Self {
        self.max_pattern_len = len;
        self
    }

    fn compile(&self, pattern: &str) -> Option<Regex> {
        if pattern.len() > self.max_pattern_len {
            warn!(
                "Pattern of {} bytes exceeds limit of {}",
                pattern.len(),
                self.max_pattern_len
            );
            return None;
        }

        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(self.size_limit)
            .dfa_size_limit(self.dfa_size_limit)
            .build()
            .map_err(|e| debug!("Invalid pattern {:?}: {}", pattern, e))
            .ok()
    }

    /// All matches, numeric. A match whose two groups both parse
    /// contributes a pair; otherwise its first group (or the whole match)
    /// contributes one number if it parses.
    fn extract_all(&self, re: &Regex, text: &str, rule: &FieldRule) -> ExtractionResult {
        let mut values = Vec::new();

        for caps in re.captures_iter(text) {
            let first = non_empty_group(&caps, 1);
            let second = non_empty_group(&caps, 2);

            if let (Some(low), Some(high)) = (first, second) {
                if let (Some(low), Some(high)) = (parse_number(low), parse_number(high)) {
                    values.push(low);
                    values.push(high);
                    continue;
                }
            }

            let raw = first.unwrap_or_else(|| caps.get(0).map_or("", |m| m.as_str()));
            if let Some(value) = parse_number(raw) {
                values.push(value);
            }
        }

        trace!("Field '{}' matched {} values", rule.key, values.len());

        if values.is_empty() {
            ExtractionResult::absent(rule)
        } else {
            ExtractionResult::found(ExtractedValue::Numbers(values), None)
        }
    }

    /// First match only. Uses the first group, or the whole match when the
    /// pattern has no groups.
    fn extract_first(&self, re: &Regex, text: &str, rule: &FieldRule) -> ExtractionResult {
        let Some(caps) = re.captures(text) else {
            return ExtractionResult::absent(rule);
        };

        let group = if re.captures_len() > 1 { 1 } else { 0 };
        let Some(raw) = non_empty_group(&caps, group) else {
            return ExtractionResult::absent(rule);
        };

        let match_index = caps.get(0).map(|m| char_offset(text, m.start()));

        match rule.value_type {
            ValueType::Number => match parse_number(raw) {
                Some(value) => ExtractionResult::found(ExtractedValue::Number(value), match_index),
                None => {
                    debug!("Field '{}' matched non-numeric text {:?}", rule.key, raw);
                    ExtractionResult::absent(rule)
                }
            },
            _ => ExtractionResult::found(ExtractedValue::Text(raw.to_string()), match_index),
        }
    }
}

impl Default for RegexExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RegexExtractor {
    fn extract(&self, text: &str, rule: &FieldRule) -> ExtractionResult {
        if rule.pattern.is_empty() {
            return ExtractionResult::failed(FieldError::EmptyPattern);
        }

        let Some(re) = self.compile(&rule.pattern) else {
            return ExtractionResult::failed(FieldError::RegexError);
        };

        if rule.value_type.is_array() {
            self.extract_all(&re, text, rule)
        } else {
            self.extract_first(&re, text, rule)
        }
    }
}

fn non_empty_group<'t>(caps: &Captures<'t>, i: usize) -> Option<&'t str> {
    caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Applies rule lists to messages.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    regex: RegexExtractor,
    marker: MarkerExtractor,
}

impl RuleEngine {
    /// Create an engine with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            regex: RegexExtractor::from_config(config),
            marker: MarkerExtractor::new(),
        }
    }

    /// Replace the regex extractor, e.g. to change its limits.
    pub fn with_regex_extractor(mut self, regex: RegexExtractor) -> Self {
        self.regex = regex;
        self
    }

    fn extractor_for(&self, method: ExtractionMethod) -> &dyn FieldExtractor {
        match method {
            ExtractionMethod::Regex => &self.regex,
            ExtractionMethod::Marker => &self.marker,
        }
    }

    /// Apply one rule.
    pub fn extract_field(&self, text: &str, rule: &FieldRule) -> ExtractionResult {
        self.extractor_for(rule.method).extract(text, rule)
    }

    /// Apply every rule. The map has exactly one entry per distinct key,
    /// in rule order; for repeated keys the last rule's result is kept.
    pub fn extract(&self, text: &str, rules: &[FieldRule]) -> ExtractionMap {
        let mut results = ExtractionMap::with_capacity(rules.len());

        for rule in rules {
            let result = self.extract_field(text, rule);
            if let Some(err) = result.error {
                debug!("Field '{}': {}", rule.key, err);
            }
            if results.insert(rule.key.clone(), result).is_some() {
                debug!("Field '{}' overwritten by a later rule", rule.key);
            }
        }

        results
    }
}

/// Extract fields from `text` with default engine limits.
pub fn extract(text: &str, rules: &[FieldRule]) -> ExtractionMap {
    RuleEngine::new().extract(text, rules)
}
