//! Message-to-signal parsing over rule lists and stored templates.

use tracing::{debug, info, warn};

use super::assemble;
use crate::error::SignalError;
use crate::extract::{missing_required, ExtractionMap, RuleEngine};
use crate::models::config::{SignalConfig, SigparseConfig};
use crate::models::rule::{FieldRule, Template};
use crate::models::signal::Signal;

/// A parsed signal with the extraction it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSignal {
    pub signal: Signal,
    /// Per-field results.
    pub fields: ExtractionMap,
    /// Index of the template that produced the signal, when parsing with
    /// templates.
    pub template_index: Option<usize>,
    /// Non-fatal problems: missing required fields and broken rules.
    pub warnings: Vec<String>,
}

/// Turns messages into trade signals.
#[derive(Debug, Clone, Default)]
pub struct SignalParser {
    engine: RuleEngine,
    config: SignalConfig,
}

impl SignalParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SigparseConfig) -> Self {
        Self {
            engine: RuleEngine::from_config(&config.extraction),
            config: config.signal.clone(),
        }
    }

    /// Set the signal assembly configuration.
    pub fn with_signal_config(mut self, config: SignalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Extract with `rules` and assemble a signal.
    pub fn parse(&self, text: &str, rules: &[FieldRule]) -> Result<ParsedSignal, SignalError> {
        let fields = self.engine.extract(text, rules);
        let signal = assemble(&fields, &self.config)?;

        let mut warnings: Vec<String> = missing_required(rules, &fields)
            .into_iter()
            .map(|rule| format!("required field '{}' not found", rule.key))
            .collect();
        warnings.extend(
            fields
                .iter()
                .filter_map(|(key, r)| r.error.filter(|_| r.value.is_none()).map(|e| (key, e)))
                .filter(|(key, _)| !rules.iter().any(|r| r.required && &r.key == *key))
                .map(|(key, e)| format!("field '{}': {}", key, e)),
        );

        for warning in &warnings {
            warn!("{}", warning);
        }

        Ok(ParsedSignal {
            signal,
            fields,
            template_index: None,
            warnings,
        })
    }

    /// Try each active template in order; the first that yields a signal
    /// wins.
    pub fn parse_with_templates(
        &self,
        text: &str,
        templates: &[Template],
    ) -> Result<ParsedSignal, SignalError> {
        let active: Vec<(usize, &Template)> = templates
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_active)
            .collect();

        if active.is_empty() {
            return Err(SignalError::NoActiveTemplates);
        }

        let mut errors = Vec::new();
        for (index, template) in active {
            let label = template
                .name
                .clone()
                .unwrap_or_else(|| format!("#{}", index));
            debug!("Trying template {}", label);

            match self.parse(text, template.fields()) {
                Ok(mut parsed) => {
                    info!("Template {} produced {} signal", label, parsed.signal.symbol);
                    parsed.template_index = Some(index);
                    return Ok(parsed);
                }
                Err(e) => {
                    warn!("Template {} failed: {}", label, e);
                    errors.push(format!("Template {}: {}", label, e));
                }
            }
        }

        Err(SignalError::NoTemplateMatched(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::ValueType;
    use crate::models::signal::Direction;
    use crate::patterns::{collection, CollectionName};
    use pretty_assertions::assert_eq;

    const GOLD: &str = "GOLD BUY NOW @ 2045.50\nSL: 2040\nTP1: 2050\nTP2: 2055";

    #[test]
    fn test_parse_with_collection() {
        let parser = SignalParser::new();
        let parsed = parser
            .parse(GOLD, &collection(CollectionName::Standard).materialize())
            .unwrap();

        assert_eq!(parsed.signal.symbol, "GOLD");
        assert_eq!(parsed.fields.len(), 5);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.template_index, None);
    }

    #[test]
    fn test_warnings_for_missing_and_broken_fields() {
        let mut rules = collection(CollectionName::Standard).materialize();
        rules.push(FieldRule::regex("Lots", "lots", ValueType::Number, "(Lot"));

        let parsed = SignalParser::new().parse("GOLD BUY @ 2045", &rules).unwrap();
        assert_eq!(
            parsed.warnings,
            vec![
                "required field 'sl' not found".to_string(),
                "field 'lots': Regex Error".to_string(),
            ]
        );
    }

    #[test]
    fn test_first_active_template_wins() {
        let crypto = Template::new(collection(CollectionName::Crypto).materialize());
        let mut inactive = Template::new(collection(CollectionName::Standard).materialize());
        inactive.is_active = false;
        let standard = Template::new(collection(CollectionName::Standard).materialize());

        let templates = vec![inactive, crypto, standard];
        let parsed = SignalParser::new().parse_with_templates(GOLD, &templates).unwrap();

        // The crypto rules find no symbol in this message.
        assert_eq!(parsed.template_index, Some(2));
        assert_eq!(parsed.signal.direction, Direction::Buy);
    }

    #[test]
    fn test_no_active_templates() {
        let mut template = Template::new(collection(CollectionName::Standard).materialize());
        template.is_active = false;
        assert_eq!(
            SignalParser::new().parse_with_templates(GOLD, &[template]),
            Err(SignalError::NoActiveTemplates)
        );
        assert_eq!(
            SignalParser::new().parse_with_templates(GOLD, &[]),
            Err(SignalError::NoActiveTemplates)
        );
    }

    #[test]
    fn test_all_templates_fail() {
        let mut named = Template::new(vec![FieldRule::regex(
            "Symbol",
            "symbol",
            ValueType::String,
            "(GOLD)",
        )]);
        named.name = Some("gold-only".into());
        let unnamed = Template::new(vec![]);

        let err = SignalParser::new()
            .parse_with_templates("SILVER SELL", &[named, unnamed])
            .unwrap_err();
        assert_eq!(
            err,
            SignalError::NoTemplateMatched(vec![
                "Template gold-only: could not extract symbol from message".into(),
                "Template #1: could not extract symbol from message".into(),
            ])
        );
    }
}
