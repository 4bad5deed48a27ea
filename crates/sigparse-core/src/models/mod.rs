//! Data models: rules, templates, signals and configuration.

pub mod config;
pub mod rule;
pub mod signal;

pub use config::{ExtractionConfig, SignalConfig, SigparseConfig};
pub use rule::{ExtractionMethod, FieldRule, RuleSeed, RuleSet, Template, ValueType};
pub use signal::{Direction, Signal, StopLoss, TakeProfit};
