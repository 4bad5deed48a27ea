//! Error types for the sigparse-core library.
//!
//! Per-field extraction problems are not errors in this sense: they are
//! reported as [`FieldError`](crate::extract::FieldError) values inside the
//! extraction result map and never abort a call.

use thiserror::Error;

/// Main error type for the sigparse library.
#[derive(Error, Debug)]
pub enum SigparseError {
    /// Rule list validation error.
    #[error("rule set error: {0}")]
    RuleSet(#[from] RuleSetError),

    /// Signal assembly error.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown pattern collection name.
    #[error("unknown pattern collection: {0}")]
    UnknownCollection(String),
}

/// Errors raised when validating a rule list before it is stored or used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    /// The rule list contains no rules.
    #[error("rule set must contain at least one field")]
    Empty,

    /// A rule has an empty output key.
    #[error("field at index {0} has an empty key")]
    EmptyKey(usize),

    /// A rule has an empty display name.
    #[error("field at index {0} has an empty name")]
    EmptyName(usize),

    /// A marker rule has no start marker.
    #[error("field '{0}' uses the marker method but has no start marker")]
    MissingStartMarker(String),
}

/// Errors raised when turning extracted fields into a trade signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    /// No symbol could be extracted.
    #[error("could not extract symbol from message")]
    MissingSymbol,

    /// No entry price could be extracted.
    #[error("could not extract entry price from message")]
    MissingEntry,

    /// A price value could not be represented as a decimal.
    #[error("invalid price for {field}: {value}")]
    InvalidPrice { field: String, value: f64 },

    /// None of the supplied templates is active.
    #[error("no active templates")]
    NoActiveTemplates,

    /// Every active template failed.
    #[error("could not extract signal from message: {}", .0.join("; "))]
    NoTemplateMatched(Vec<String>),
}

/// Errors related to configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for the sigparse library.
pub type Result<T> = std::result::Result<T, SigparseError>;
