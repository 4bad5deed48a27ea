//! Pattern library and named pattern collections.

pub mod collections;
pub mod library;

pub use collections::{collection, common_rules, CollectionName, PatternCollection, COMMON_RULES};
pub use library::{PatternVariant, SemanticField, LIBRARY_VERSION};
