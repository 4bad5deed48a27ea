//! Preview caching for template editing, and the required-field check.

use tracing::trace;

use super::engine::RuleEngine;
use super::ExtractionMap;
use crate::models::rule::FieldRule;

/// Caches the last extraction for an editing session.
///
/// Results are a pure function of `(text, rules)`, so a preview is only
/// recomputed when one of the two changes.
#[derive(Debug, Default)]
pub struct PreviewCache {
    engine: RuleEngine,
    last: Option<(String, Vec<FieldRule>, ExtractionMap)>,
    computations: usize,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self.last = None;
        self
    }

    /// Results for `text` under `rules`.
    pub fn preview(&mut self, text: &str, rules: &[FieldRule]) -> &ExtractionMap {
        let stale = !matches!(&self.last, Some((t, r, _)) if t == text && r.as_slice() == rules);

        if stale {
            self.last = None;
        }

        let engine = &self.engine;
        let computations = &mut self.computations;
        let (_, _, results) = self.last.get_or_insert_with(|| {
            trace!("Recomputing preview for {} rules", rules.len());
            *computations += 1;
            (text.to_string(), rules.to_vec(), engine.extract(text, rules))
        });
        results
    }

    /// Number of times results were actually computed.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Required rules whose result is null. A non-empty list blocks saving.
pub fn missing_required<'r>(rules: &'r [FieldRule], results: &ExtractionMap) -> Vec<&'r FieldRule> {
    rules
        .iter()
        .filter(|rule| rule.required)
        .filter(|rule| results.get(&rule.key).is_none_or(|r| r.value.is_none()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::models::rule::ValueType;
    use crate::patterns::{collection, CollectionName};

    #[test]
    fn test_preview_recomputes_only_on_change() {
        let rules = collection(CollectionName::Standard).materialize();
        let mut cache = PreviewCache::new();

        cache.preview("GOLD BUY @ 2045", &rules);
        cache.preview("GOLD BUY @ 2045", &rules);
        assert_eq!(cache.computations(), 1);

        let entry = cache.preview("GOLD BUY @ 2046", &rules)["entry"].value.clone();
        assert_eq!(cache.computations(), 2);
        assert_eq!(entry.map(|v| v.numbers()), Some(vec![2046.0]));

        let mut edited = rules.clone();
        edited[3].required = false;
        cache.preview("GOLD BUY @ 2046", &edited);
        assert_eq!(cache.computations(), 3);

        cache.clear();
        cache.preview("GOLD BUY @ 2046", &edited);
        assert_eq!(cache.computations(), 4);
    }

    #[test]
    fn test_missing_required() {
        let rules = collection(CollectionName::Standard).materialize();
        let results = extract("GOLD BUY @ 2045", &rules);

        let missing: Vec<&str> = missing_required(&rules, &results)
            .into_iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(missing, vec!["sl"]);
    }

    #[test]
    fn test_missing_required_without_result() {
        let rules = vec![FieldRule::regex("Pair", "pair", ValueType::String, "(X)").with_required(true)];
        assert_eq!(missing_required(&rules, &ExtractionMap::new()).len(), 1);
    }
}
