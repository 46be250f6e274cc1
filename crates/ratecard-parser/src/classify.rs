//! Line classification.
//!
//! Every physical line of a listing is one of: a card header, a bare rate,
//! a noise line (conditions, caps, point counters), or a candidate category
//! label whose meaning depends on parser state.

use crate::Span;
use regex::{Regex, RegexSet};
use std::sync::LazyLock;

/// `N. Card Name` at the start of a trimmed line.
static ANCHORED_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+(.+)$").expect("static regex must compile"));

/// `N. Card Name` anywhere in a line, ending at end of line or before a rate.
/// The name part cannot contain digits, which keeps it from swallowing rates.
static EMBEDDED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.\s+([^\d]+?)(?:\s*$|\s+(\d+\.?\d*%))").expect("static regex must compile")
});

static PERCENTAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*)%\s*$").expect("static regex must compile"));

static TRAILING_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d+\.?\d*%$").expect("static regex must compile"));

static TRAILING_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s*$").expect("static regex must compile"));

/// Condition lines, matched against the lowercased trimmed line.
static NOISE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^up to",
        r"limited to",
        r"^\d+[km]$",
        r"^\$\d+",
        r"per calendar year",
        r"per year",
        r"^\d+x",
        r"x points",
        r"x miles",
        r"points",
        r"miles$",
        r"points$",
    ])
    .expect("static regex set must compile")
});

/// A card header found in a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Header<'a> {
    /// The list number preceding the name.
    pub number: &'a str,
    /// The cleaned card name.
    pub name: String,
    /// The number and name within the line, excluding any same-line rate.
    /// `leading` and `trailing` are the text on either side.
    pub span: Span,
    /// Text before the header. Empty unless the header was embedded mid-line.
    pub leading: &'a str,
    /// Text after the name on the same line, e.g. a rate.
    pub trailing: &'a str,
}

impl Header<'_> {
    /// Whether the header follows other text on its line.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        !self.leading.trim().is_empty()
    }

    /// The same-line rate, if the rest of the line is exactly a percentage.
    #[must_use]
    pub fn trailing_rate(&self) -> Option<f64> {
        parse_percentage(self.trailing)
    }
}

/// What a single line means to the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// Whitespace only.
    Blank,
    /// Starts a new card, possibly after a category of the previous one.
    CardHeader(Header<'a>),
    /// A line that is only a rate, e.g. `6.25%`.
    Percentage(f64),
    /// Carries no reward information and invalidates any pending rate.
    Noise,
    /// Possibly a category label, trimmed.
    CategoryCandidate(&'a str),
}

/// Classify a raw line.
///
/// Rules apply in priority order: header, percentage, noise, then category
/// candidate.
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(header) = find_header(line) {
        return LineKind::CardHeader(header);
    }
    if let Some(rate) = parse_percentage(trimmed) {
        return LineKind::Percentage(rate);
    }
    if is_noise(trimmed) {
        return LineKind::Noise;
    }
    LineKind::CategoryCandidate(trimmed)
}

/// Find a card header in a line, returning where it splits the line.
///
/// A header anchored at the start of the trimmed line takes precedence. If a
/// rate trails its name it becomes the header's `trailing` text; only the
/// last rate is split off. Otherwise the line is searched for an embedded
/// header, and anything before it is reported as `leading`.
pub fn find_header(line: &str) -> Option<Header<'_>> {
    let trimmed = line.trim();
    let offset = line.len() - line.trim_start().len();

    if let Some(caps) = ANCHORED_HEADER.captures(trimmed) {
        let (Some(number), Some(rest)) = (caps.get(1), caps.get(2)) else {
            return None;
        };
        let name_end = TRAILING_RATE
            .find(rest.as_str())
            .map_or(rest.end(), |rate| rest.start() + rate.start());
        let span = Span::new(offset, offset + name_end);
        return Some(Header {
            number: number.as_str(),
            name: strip_trailing_period(&trimmed[rest.start()..name_end]),
            span,
            leading: span.before(line),
            trailing: span.after(line),
        });
    }

    let caps = EMBEDDED_HEADER.captures(line)?;
    let (Some(whole), Some(number), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return None;
    };
    let end = caps.get(3).map_or(whole.end(), |rate| rate.start());
    let span = Span::new(whole.start(), end);
    Some(Header {
        number: number.as_str(),
        name: clean_card_name(name.as_str()),
        span,
        leading: span.before(line),
        trailing: span.after(line),
    })
}

/// Parse a line that consists of nothing but a rate.
///
/// ```
/// use ratecard_parser::parse_percentage;
///
/// assert_eq!(parse_percentage(" 6.25% "), Some(6.25));
/// assert_eq!(parse_percentage("5% back"), None);
/// ```
pub fn parse_percentage(text: &str) -> Option<f64> {
    let caps = PERCENTAGE_LINE.captures(text.trim())?;
    caps.get(1)?.as_str().parse().ok()
}

/// Whether a trimmed line is a condition or counter carrying no reward.
pub fn is_noise(trimmed: &str) -> bool {
    if trimmed.is_empty() {
        return false;
    }
    NOISE_PATTERNS.is_match(&trimmed.to_lowercase()) || trimmed.parse::<f64>().is_ok()
}

fn clean_card_name(raw: &str) -> String {
    strip_trailing_period(&TRAILING_RATE.replace(raw.trim(), ""))
}

/// Trim a name whose rate has already been split off.
fn strip_trailing_period(name: &str) -> String {
    TRAILING_PERIOD.replace(name.trim(), "").into_owned()
}
