//! Format detection: pick a pattern collection for a message, or build a
//! rule list from scratch when none fits.

mod fields;
mod selector;

pub use fields::auto_detect_fields;
pub use selector::{select_collection, SELECTORS};

use tracing::debug;

use crate::models::rule::FieldRule;
use crate::patterns::{collection, CollectionName};

/// Rules for `text`: the matching collection when one is recognised,
/// otherwise auto-detected rules.
pub fn smart_detect(text: &str) -> Vec<FieldRule> {
    smart_detect_with_source(text).0
}

/// Like [`smart_detect`], also naming the collection the rules came from.
/// `None` means the rules were auto-detected.
pub fn smart_detect_with_source(text: &str) -> (Vec<FieldRule>, Option<CollectionName>) {
    match select_collection(text) {
        Some(name) => {
            debug!("Using {} collection", name);
            (collection(name).materialize(), Some(name))
        }
        None => {
            let fields = auto_detect_fields(text);
            debug!("No collection matched, auto-detected {} fields", fields.len());
            (fields, None)
        }
    }
}
