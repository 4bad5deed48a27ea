//! Collection selection: recognise a message layout from cheap textual cues.

use lazy_static::lazy_static;
use regex::Regex;

use crate::patterns::CollectionName;

lazy_static! {
    static ref SLASH_PAIR: Regex = Regex::new(r"[a-z]+/[a-z]+").unwrap();
    static ref COMPACT_LINE: Regex = Regex::new(r"[A-Z]{6}\s+(?:BUY|SELL)\s+@").unwrap();
    static ref DETAILED_MARKER: Regex = Regex::new(r"(?i)(?:tf|timeframe|r:r|rr)").unwrap();
    static ref AT_PRICE: Regex = Regex::new(r"@\s*[0-9]").unwrap();
    static ref STOP_MARKER: Regex = Regex::new(r"(?i)(?:SL|Stop)").unwrap();
}

fn is_crypto(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("btc") || lower.contains("eth") || SLASH_PAIR.is_match(&lower)
}

fn is_compact(text: &str) -> bool {
    !text.contains('\n') && COMPACT_LINE.is_match(text)
}

fn is_detailed(text: &str) -> bool {
    DETAILED_MARKER.is_match(text)
}

fn is_standard(text: &str) -> bool {
    AT_PRICE.is_match(text) && STOP_MARKER.is_match(text)
}

/// Format predicates in priority order. The first that holds wins.
pub const SELECTORS: &[(CollectionName, fn(&str) -> bool)] = &[
    (CollectionName::Crypto, is_crypto),
    (CollectionName::Compact, is_compact),
    (CollectionName::Detailed, is_detailed),
    (CollectionName::Standard, is_standard),
];

/// Pick the collection whose format `text` follows. `None` means no
/// format is recognised and rules should be auto-detected.
pub fn select_collection(text: &str) -> Option<CollectionName> {
    SELECTORS
        .iter()
        .find(|(_, matches)| matches(text))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard() {
        let text = "GOLD BUY NOW @ 2045.50\nSL: 2040\nTP1: 2050\nTP2: 2055";
        assert_eq!(select_collection(text), Some(CollectionName::Standard));
    }

    #[test]
    fn test_crypto() {
        assert_eq!(
            select_collection("Short BTC/USD\nEntry: 64500\nStop: 65200"),
            Some(CollectionName::Crypto)
        );
        assert_eq!(select_collection("sol/usdt long"), Some(CollectionName::Crypto));
        assert_eq!(select_collection("ETH long 3200"), Some(CollectionName::Crypto));
    }

    #[test]
    fn test_compact_requires_single_line() {
        assert_eq!(
            select_collection("EURUSD BUY @1.0845 SL:1.0820 TP:1.0900"),
            Some(CollectionName::Compact)
        );
        // Split across lines it no longer qualifies as compact.
        assert_eq!(
            select_collection("EURUSD BUY @1.0845\nSL:1.0820"),
            Some(CollectionName::Standard)
        );
    }

    #[test]
    fn test_detailed() {
        assert_eq!(
            select_collection("XAUUSD SELL @ 2050\nSL: 2060\nTF: 4H\nR:R 1:3"),
            Some(CollectionName::Detailed)
        );
    }

    #[test]
    fn test_priority_order() {
        // Crypto beats every later rule.
        assert_eq!(
            select_collection("BTCUSD BUY @ 64000\nSL: 63000\nTF: 1H"),
            Some(CollectionName::Crypto)
        );
        // Detailed beats standard.
        assert_eq!(
            select_collection("GOLD BUY @ 2045\nSL: 2040\nTimeframe 1H"),
            Some(CollectionName::Detailed)
        );
    }

    #[test]
    fn test_unrecognised() {
        assert_eq!(select_collection(""), None);
        assert_eq!(select_collection("EURUSD BUY 1.0845 1.0870"), None);
        assert_eq!(select_collection("GOLD BUY @ 2045"), None);
    }
}
