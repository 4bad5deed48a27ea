//! Lenient number parsing for matched text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap();
}

/// Parse the leading number of `s`, ignoring leading whitespace and any
/// trailing text (`"2045.50 pips"` is `2045.5`). Non-finite results and
/// text without a leading number yield `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let m = LEADING_NUMBER.find(s.trim_start())?;
    m.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}
