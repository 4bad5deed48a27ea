//! Field rules, rule sets and templates.
//!
//! The serialized shape matches what the template builder persists, so rule
//! lists saved by the UI deserialize unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RuleSetError;

/// Declared type of an extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Raw matched text.
    String,
    /// A single number.
    Number,
    /// All matches, as numbers. Two-sided ranges are flattened in.
    Array,
}

impl ValueType {
    pub fn is_array(self) -> bool {
        matches!(self, ValueType::Array)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Array => "array",
        };
        f.pad(s)
    }
}

/// How a rule locates its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Regular expression with one or two capture groups.
    #[default]
    Regex,
    /// Substring between a start marker and an end marker (or end of line).
    Marker,
}

/// One extraction directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    /// Human label, e.g. "Entry Price".
    pub name: String,

    /// Output key, e.g. `entry`.
    pub key: String,

    /// Declared value type.
    #[serde(rename = "type")]
    pub value_type: ValueType,

    /// Extraction method.
    #[serde(default)]
    pub method: ExtractionMethod,

    /// Regex source. Stored as text, compiled per extraction call.
    #[serde(rename = "regex", alias = "pattern", default)]
    pub pattern: String,

    /// Start marker for the marker method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_marker: Option<String>,

    /// End marker for the marker method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<String>,

    /// Whether a missing value is reported as an error.
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldRule {
    /// Create a regex rule.
    pub fn regex(
        name: impl Into<String>,
        key: impl Into<String>,
        value_type: ValueType,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            value_type,
            method: ExtractionMethod::Regex,
            pattern: pattern.into(),
            start_marker: None,
            end_marker: None,
            required: false,
            description: None,
        }
    }

    /// Create a marker rule.
    pub fn marker(
        name: impl Into<String>,
        key: impl Into<String>,
        value_type: ValueType,
        start_marker: impl Into<String>,
        end_marker: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            value_type,
            method: ExtractionMethod::Marker,
            pattern: String::new(),
            start_marker: Some(start_marker.into()),
            end_marker,
            required: false,
            description: None,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Compile-time form of a rule, as stored in pattern collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSeed {
    pub name: &'static str,
    pub key: &'static str,
    pub value_type: ValueType,
    pub pattern: &'static str,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl RuleSeed {
    /// Turn the seed into an owned, editable rule.
    pub fn materialize(&self) -> FieldRule {
        FieldRule {
            name: self.name.to_string(),
            key: self.key.to_string(),
            value_type: self.value_type,
            method: ExtractionMethod::Regex,
            pattern: self.pattern.to_string(),
            start_marker: None,
            end_marker: None,
            required: self.required,
            description: self.description.map(str::to_string),
        }
    }
}

/// The `{ "fields": [...] }` envelope a rule list is stored in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub fields: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    /// Check the rule list is usable. Duplicate keys are allowed; the last
    /// rule with a given key wins at extraction time.
    pub fn validate(&self) -> Result<(), RuleSetError> {
        if self.fields.is_empty() {
            return Err(RuleSetError::Empty);
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                return Err(RuleSetError::EmptyKey(i));
            }
            if field.name.trim().is_empty() {
                return Err(RuleSetError::EmptyName(i));
            }
            if field.method == ExtractionMethod::Marker
                && field.start_marker.as_deref().is_none_or(str::is_empty)
            {
                return Err(RuleSetError::MissingStartMarker(field.key.clone()));
            }
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.key == field.key) {
                warn!("Duplicate field key '{}', last rule wins", field.key);
            }
        }

        Ok(())
    }
}

impl From<Vec<FieldRule>> for RuleSet {
    fn from(fields: Vec<FieldRule>) -> Self {
        Self::new(fields)
    }
}

/// A stored extraction template: a rule set plus its sample message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Rules applied to incoming messages.
    pub extraction_config: RuleSet,

    /// Sample message the template was built against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_message: Option<String>,

    /// Inactive templates are skipped when parsing signals.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Template {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self {
            name: None,
            extraction_config: RuleSet::new(fields),
            test_message: None,
            is_active: true,
        }
    }

    pub fn with_test_message(mut self, message: impl Into<String>) -> Self {
        self.test_message = Some(message.into());
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.extraction_config.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_rule_wire_shape() {
        let json = r#"{
            "name": "Entry Price",
            "key": "entry",
            "type": "array",
            "method": "regex",
            "regex": "@\\s*([0-9]+)",
            "required": true
        }"#;

        let rule: FieldRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.value_type, ValueType::Array);
        assert_eq!(rule.method, ExtractionMethod::Regex);
        assert_eq!(rule.pattern, r"@\s*([0-9]+)");
        assert!(rule.required);

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["type"], "array");
        assert_eq!(value["regex"], r"@\s*([0-9]+)");
        assert!(value.get("startMarker").is_none());
    }

    #[test]
    fn test_marker_rule_camel_case() {
        let json = r#"{"name":"Pair","key":"pair","type":"string","method":"marker",
            "regex":"","startMarker":"Pair:","endMarker":"\n","required":false}"#;
        let rule: FieldRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.method, ExtractionMethod::Marker);
        assert_eq!(rule.start_marker.as_deref(), Some("Pair:"));
        assert_eq!(rule.end_marker.as_deref(), Some("\n"));
    }

    #[test]
    fn test_rule_set_validation() {
        assert_eq!(RuleSet::default().validate(), Err(RuleSetError::Empty));

        let no_key = RuleSet::new(vec![FieldRule::regex("Symbol", "", ValueType::String, "(X)")]);
        assert_eq!(no_key.validate(), Err(RuleSetError::EmptyKey(0)));

        let mut marker = FieldRule::marker("Pair", "pair", ValueType::String, "", None);
        marker.start_marker = None;
        let rules = RuleSet::new(vec![marker]);
        assert_eq!(
            rules.validate(),
            Err(RuleSetError::MissingStartMarker("pair".to_string()))
        );

        let dupes = RuleSet::new(vec![
            FieldRule::regex("A", "k", ValueType::String, "(a)"),
            FieldRule::regex("B", "k", ValueType::String, "(b)"),
        ]);
        assert!(dupes.validate().is_ok());
    }

    #[test]
    fn test_template_defaults_active() {
        let json = r#"{"extraction_config":{"fields":[]},"test_message":"GOLD BUY"}"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert!(template.is_active);
        assert_eq!(template.test_message.as_deref(), Some("GOLD BUY"));
    }
}
