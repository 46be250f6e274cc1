//! Card-name normalization.
//!
//! Listings, reference tables, and artifacts spell the same card slightly
//! differently: a leading list number, a trailing rate, trademark marks,
//! capitalization. [`normalize`] reduces a raw name to a key that is equal
//! for all of those spellings.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static LEADING_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s*").expect("static regex must compile"));
static TRAILING_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d+\.?\d*%$").expect("static regex must compile"));
static TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+$").expect("static regex must compile"));
static MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[®℠™]").expect("static regex must compile"));

/// Normalize a raw card name for comparison.
///
/// Steps run in order, each on the output of the previous one:
/// strip a leading ordinal (`3. `), trim, strip a trailing rate (` 5%`),
/// strip trailing whitespace, remove ® ℠ ™, and lowercase.
///
/// ```
/// use ratecard_core::normalize;
///
/// assert_eq!(normalize("3. Chase Sapphire Reserve 5%"), "chase sapphire reserve");
/// assert_eq!(normalize("Chase Sapphire Reserve®"), "chase sapphire reserve");
/// assert_eq!(normalize(""), "");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let name = LEADING_ORDINAL.replace(raw, "");
    let name = name.trim();
    let name = TRAILING_RATE.replace(name, "");
    let name = TRAILING_WS.replace(&name, "");
    let name = MARKS.replace_all(&name, "");
    name.to_lowercase()
}

/// Check the fallback partial-match rule between two normalized names.
///
/// Every whitespace-separated token of `query` longer than two characters
/// must appear as a substring of `candidate`. Shorter tokens are ignored, so
/// a query without any significant token matches anything.
#[must_use]
pub fn matches_all_tokens(query: &str, candidate: &str) -> bool {
    query
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .all(|token| candidate.contains(token))
}

/// A normalized card name.
///
/// Two raw names refer to the same card iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Normalize a raw name into a key.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// Whether this key passes the partial-match rule against `candidate`.
    #[must_use]
    pub fn partially_matches(&self, candidate: &Self) -> bool {
        matches_all_tokens(&self.0, &candidate.0)
    }
}

impl From<&str> for NormalizedKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants_agree() {
        let expected = "chase sapphire reserve";
        assert_eq!(normalize("3. Chase Sapphire Reserve 5%"), expected);
        assert_eq!(normalize("Chase Sapphire Reserve"), expected);
        assert_eq!(normalize("chase sapphire reserve"), expected);
        assert_eq!(normalize("12.Chase Sapphire Reserve™  "), expected);
    }

    #[test]
    fn test_normalize_strips_fractional_rate() {
        assert_eq!(normalize("Freedom Flex 6.25%"), "freedom flex");
    }

    #[test]
    fn test_normalize_keeps_inner_numbers() {
        assert_eq!(normalize("Amex Blue Cash 2024 Edition"), "amex blue cash 2024 edition");
    }

    #[test]
    fn test_normalize_rate_needs_separating_space() {
        assert_eq!(normalize("Card5%"), "card5%");
    }

    #[test]
    fn test_normalize_service_mark() {
        assert_eq!(normalize("Venture X℠ Rewards"), "venture x rewards");
    }

    #[test]
    fn test_matches_all_tokens() {
        let candidate = normalize("Chase Sapphire Reserve®");
        assert!(matches_all_tokens(&normalize("Sapphire Reserve"), &candidate));
        assert!(!matches_all_tokens(&normalize("Sapphire Preferred"), &candidate));
    }

    #[test]
    fn test_matches_all_tokens_ignores_short_tokens() {
        assert!(matches_all_tokens("a x of reserve", "chase sapphire reserve"));
        assert!(matches_all_tokens("a b", "anything"));
    }

    #[test]
    fn test_matches_all_tokens_enforces_three_char_tokens() {
        assert!(!matches_all_tokens("the reserve", "chase sapphire reserve"));
        assert!(matches_all_tokens("ase reserve", "chase sapphire reserve"));
    }

    #[test]
    fn test_normalized_key_equality() {
        assert_eq!(
            NormalizedKey::new("1. Amex Gold"),
            NormalizedKey::from("AMEX GOLD")
        );
        assert_eq!(NormalizedKey::new("Amex Gold").to_string(), "amex gold");
    }

    #[test]
    fn test_normalized_key_partial_match() {
        let candidate = NormalizedKey::new("Chase Sapphire Reserve®");
        assert!(NormalizedKey::new("3. Sapphire Reserve").partially_matches(&candidate));
        assert!(!NormalizedKey::new("Sapphire Preferred").partially_matches(&candidate));
    }
}
