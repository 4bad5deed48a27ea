//! WASM bindings for trading signal extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Rules and results cross the boundary as plain JS objects in the same
//! shape the template builder stores.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use sigparse_core::extract::{ExtractionMap, PreviewCache};
use sigparse_core::models::rule::FieldRule;
use sigparse_core::patterns::CollectionName;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects and nulls rather than JS Maps and undefined.
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn rule_keys(rules: Vec<&FieldRule>) -> Vec<String> {
    rules.into_iter().map(|r| r.key.clone()).collect()
}

/// Extract fields from text.
///
/// `rules` is an array of field rules. Returns an object keyed by rule key.
#[wasm_bindgen]
pub fn extract(text: &str, rules: JsValue) -> Result<JsValue, JsValue> {
    let rules: Vec<FieldRule> = from_js(rules)?;
    to_js(&sigparse_core::extract(text, &rules))
}

/// Same as [`extract`], with rules and results as JSON strings.
#[wasm_bindgen]
pub fn extract_json(text: &str, rules_json: &str) -> Result<String, JsValue> {
    let rules: Vec<FieldRule> =
        serde_json::from_str(rules_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&sigparse_core::extract(text, &rules))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Name of the collection matching the message format, if any.
#[wasm_bindgen]
pub fn select_collection(text: &str) -> Option<String> {
    sigparse_core::select_collection(text).map(|name| name.to_string())
}

/// Rules for the fields present in the text.
#[wasm_bindgen]
pub fn auto_detect_fields(text: &str) -> Result<JsValue, JsValue> {
    to_js(&sigparse_core::auto_detect_fields(text))
}

/// Collection rules when the format is recognised, detected rules otherwise.
#[wasm_bindgen]
pub fn smart_detect(text: &str) -> Result<JsValue, JsValue> {
    to_js(&sigparse_core::smart_detect(text))
}

/// Rules of a built-in collection.
#[wasm_bindgen]
pub fn collection(name: &str) -> Result<JsValue, JsValue> {
    let name: CollectionName = name
        .parse()
        .map_err(|e: sigparse_core::SigparseError| JsValue::from_str(&e.to_string()))?;
    to_js(&sigparse_core::collection(name).materialize())
}

/// Pattern for a highlighted part of the text.
#[wasm_bindgen]
pub fn generate_rule(text: &str, selection: &str) -> String {
    sigparse_core::generate_rule(text, selection)
}

/// Field rule for a highlighted part of the text.
#[wasm_bindgen]
pub fn suggest_field(text: &str, selection: &str) -> Result<JsValue, JsValue> {
    to_js(&sigparse_core::suggest_field(text, selection))
}

/// Keys of required rules with no value in `results`.
#[wasm_bindgen]
pub fn missing_required(rules: JsValue, results: JsValue) -> Result<JsValue, JsValue> {
    let rules: Vec<FieldRule> = from_js(rules)?;
    let results: ExtractionMap = from_js(results)?;
    to_js(&rule_keys(sigparse_core::missing_required(&rules, &results)))
}

/// Live preview for a template editor.
///
/// Holds the current text and rules; results are recomputed only after one
/// of them changes.
#[wasm_bindgen]
pub struct TemplatePreview {
    cache: PreviewCache,
    text: String,
    rules: Vec<FieldRule>,
}

#[wasm_bindgen]
impl TemplatePreview {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            cache: PreviewCache::new(),
            text: String::new(),
            rules: Vec::new(),
        }
    }

    #[wasm_bindgen]
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    #[wasm_bindgen]
    pub fn set_rules(&mut self, rules: JsValue) -> Result<(), JsValue> {
        self.rules = from_js(rules)?;
        Ok(())
    }

    /// Load rules picked by format detection on the current text.
    #[wasm_bindgen]
    pub fn detect_rules(&mut self) -> Result<JsValue, JsValue> {
        self.rules = sigparse_core::smart_detect(&self.text);
        to_js(&self.rules)
    }

    /// Current results.
    #[wasm_bindgen]
    pub fn preview(&mut self) -> Result<JsValue, JsValue> {
        to_js(self.cache.preview(&self.text, &self.rules))
    }

    /// Keys of required fields with no value; saving is blocked while this
    /// is non-empty.
    #[wasm_bindgen]
    pub fn missing(&mut self) -> Result<JsValue, JsValue> {
        let results = self.cache.preview(&self.text, &self.rules);
        to_js(&rule_keys(sigparse_core::missing_required(&self.rules, results)))
    }

    /// How many times results were computed.
    #[wasm_bindgen(getter)]
    pub fn computations(&self) -> usize {
        self.cache.computations()
    }
}

impl Default for TemplatePreview {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const GOLD: &str = "GOLD BUY NOW @ 2045.50\nSL: 2040\nTP1: 2050\nTP2: 2055";

    #[wasm_bindgen_test]
    fn test_select_collection() {
        assert_eq!(select_collection(GOLD).as_deref(), Some("STANDARD"));
        assert_eq!(select_collection("EURUSD BUY 1.0845 1.0870"), None);
    }

    #[wasm_bindgen_test]
    fn test_generate_rule() {
        assert_eq!(generate_rule(GOLD, "2040"), r"\:\s*([0-9]+\.?[0-9]*)");
    }

    #[wasm_bindgen_test]
    fn test_extract_json() {
        let rules = r#"[{"name":"SL","key":"sl","type":"number","regex":"SL:\\s*([0-9]+)","required":true},
                        {"name":"X","key":"x","type":"string","regex":""}]"#;
        let out = extract_json(GOLD, rules).unwrap();
        assert_eq!(
            out,
            r#"{"sl":{"value":2040.0,"matchIndex":23},"x":{"value":null,"error":"Empty pattern"}}"#
        );
    }

    #[wasm_bindgen_test]
    fn test_template_preview_caches() {
        let mut preview = TemplatePreview::new();
        preview.set_text(GOLD);
        preview.detect_rules().unwrap();

        preview.preview().unwrap();
        preview.missing().unwrap();
        assert_eq!(preview.computations(), 1);

        preview.set_text("GOLD BUY @ 2045");
        let missing: Vec<String> = serde_wasm_bindgen::from_value(preview.missing().unwrap()).unwrap();
        assert_eq!(missing, vec!["sl".to_string()]);
        assert_eq!(preview.computations(), 2);
    }
}
