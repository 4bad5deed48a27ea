//! Core library for trading signal extraction.
//!
//! This crate provides:
//! - A pattern library of regex variants per semantic field
//! - Named pattern collections for common message layouts
//! - Collection selection and field auto-detection from a sample message
//! - Rule-driven field extraction with per-field error reporting
//! - Rule generation from a highlighted substring
//! - Trade signal assembly with risk/reward ratios

pub mod error;
pub mod models;
pub mod patterns;
pub mod detect;
pub mod extract;
pub mod generate;
pub mod signal;

pub use error::{Result, SigparseError};
pub use models::{
    Direction, ExtractionMethod, FieldRule, RuleSet, Signal, SigparseConfig, StopLoss, TakeProfit,
    Template, ValueType,
};
pub use patterns::{collection, CollectionName, PatternCollection, SemanticField};
pub use detect::{auto_detect_fields, select_collection, smart_detect, smart_detect_with_source};
pub use extract::{
    extract, missing_required, ExtractedValue, ExtractionMap, ExtractionResult, FieldError,
    PreviewCache, RuleEngine,
};
pub use generate::{generate_rule, suggest_field};
pub use signal::{ParsedSignal, SignalParser};
