//! The listing state machine.
//!
//! Parsing is a left fold of [`step`] over the lines of a listing. The only
//! state carried between lines is the [`ParseCursor`]: the card being built
//! and a rate waiting for its category label.

use crate::classify::{classify, Header, LineKind};
use ratecard_core::CardRecord;
use tracing::debug;

/// Parser state between two lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseCursor {
    /// The card currently accumulating rewards.
    pub current: Option<CardRecord>,
    /// A rate seen but not yet attached to a category.
    pub pending_rate: Option<f64>,
}

impl ParseCursor {
    /// A cursor before any card has been seen.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            pending_rate: None,
        }
    }

    /// Flush the cursor at end of input.
    ///
    /// Returns the current card only if it earned at least one reward.
    #[must_use]
    pub fn finish(self) -> Option<CardRecord> {
        self.current.filter(CardRecord::has_rewards)
    }
}

/// The outcome of feeding one line to the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// State to carry into the next line.
    pub cursor: ParseCursor,
    /// A card completed by this line, if any.
    pub emitted: Option<CardRecord>,
}

impl Step {
    const fn unchanged(cursor: ParseCursor) -> Self {
        Self {
            cursor,
            emitted: None,
        }
    }
}

/// Counts of how lines were interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Blank lines.
    pub blank: usize,
    /// Card headers, including embedded ones.
    pub headers: usize,
    /// Headers that followed other text on the same line.
    pub embedded_headers: usize,
    /// Lines that were only a rate.
    pub percentages: usize,
    /// Condition and counter lines.
    pub noise: usize,
    /// Category lines that received a rate.
    pub categories: usize,
    /// Category candidates dropped for lack of a card or pending rate.
    pub skipped: usize,
}

/// Parsed cards plus line statistics.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Cards with at least one reward, in listing order.
    pub cards: Vec<CardRecord>,
    /// How each line was interpreted.
    pub stats: LineStats,
}

/// Advance the parser by one raw line.
pub fn step(cursor: ParseCursor, line: &str) -> Step {
    transition(cursor, classify(line))
}

fn transition(cursor: ParseCursor, kind: LineKind<'_>) -> Step {
    match kind {
        LineKind::Blank => Step::unchanged(cursor),
        LineKind::CardHeader(header) => open_card(cursor, &header),
        LineKind::Percentage(rate) => Step::unchanged(ParseCursor {
            pending_rate: Some(rate),
            ..cursor
        }),
        LineKind::Noise => Step::unchanged(ParseCursor {
            pending_rate: None,
            ..cursor
        }),
        LineKind::CategoryCandidate(label) => match cursor {
            ParseCursor {
                current: Some(mut card),
                pending_rate: Some(rate),
            } => {
                card.rewards.merge_max(collapse_whitespace(label), rate);
                Step::unchanged(ParseCursor {
                    current: Some(card),
                    pending_rate: None,
                })
            }
            cursor => Step::unchanged(cursor),
        },
    }
}

/// Close the current card and start the one named by `header`.
///
/// Text before an embedded header is the current card's last category, but
/// only when a rate is waiting for it.
fn open_card(cursor: ParseCursor, header: &Header<'_>) -> Step {
    let ParseCursor {
        mut current,
        pending_rate,
    } = cursor;

    if let (Some(card), Some(rate)) = (current.as_mut(), pending_rate) {
        card.rewards.merge_max(collapse_whitespace(header.leading), rate);
    }

    Step {
        cursor: ParseCursor {
            current: Some(CardRecord::new(header.name.clone())),
            pending_rate: header.trailing_rate(),
        },
        emitted: current.filter(CardRecord::has_rewards),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a sequence of lines into card records.
pub fn parse_lines<'a, I>(lines: I) -> ParseOutput
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cursor = ParseCursor::new();
    let mut output = ParseOutput::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let kind = classify(line);
        let stats = &mut output.stats;
        match &kind {
            LineKind::Blank => stats.blank += 1,
            LineKind::CardHeader(header) => {
                stats.headers += 1;
                if header.is_embedded() {
                    stats.embedded_headers += 1;
                }
                debug!(
                    line = idx + 1,
                    span = %header.span,
                    number = header.number,
                    name = %header.name,
                    "card header"
                );
            }
            LineKind::Percentage(rate) => {
                stats.percentages += 1;
                debug!(line = idx + 1, rate, "pending rate");
            }
            LineKind::Noise => {
                stats.noise += 1;
                debug!(line = idx + 1, text = line.trim(), "noise");
            }
            LineKind::CategoryCandidate(label) => {
                if cursor.current.is_some() && cursor.pending_rate.is_some() {
                    stats.categories += 1;
                } else {
                    stats.skipped += 1;
                    debug!(line = idx + 1, text = label, "skipped out of context");
                }
            }
        }

        let step = transition(cursor, kind);
        cursor = step.cursor;
        output.cards.extend(step.emitted);
    }

    output.cards.extend(cursor.finish());
    output
}

/// Parse listing text into card records, with statistics.
pub fn parse_listing_with_stats(source: &str) -> ParseOutput {
    parse_lines(source.lines())
}

/// Parse listing text into card records.
///
/// Never fails: unrecognized lines are skipped and cards without any reward
/// are dropped.
pub fn parse_listing(source: &str) -> Vec<CardRecord> {
    parse_listing_with_stats(source).cards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lines: &[&str]) -> (ParseCursor, Vec<CardRecord>) {
        let mut cursor = ParseCursor::new();
        let mut emitted = Vec::new();
        for line in lines {
            let step = step(cursor, line);
            cursor = step.cursor;
            emitted.extend(step.emitted);
        }
        (cursor, emitted)
    }

    #[test]
    fn test_header_opens_card_without_pending_rate() {
        let (cursor, emitted) = feed(&["1. Amex Gold"]);
        assert!(emitted.is_empty());
        assert_eq!(cursor.current.unwrap().name, "Amex Gold");
        assert_eq!(cursor.pending_rate, None);
    }

    #[test]
    fn test_percentage_then_category() {
        let (cursor, _) = feed(&["1. Amex Gold", "4%", "Dining"]);
        let card = cursor.current.unwrap();
        assert_eq!(card.rewards.get("Dining"), Some(4.0));
        assert_eq!(cursor.pending_rate, None);
    }

    #[test]
    fn test_percentage_without_card_is_kept_pending() {
        let (cursor, _) = feed(&["5%"]);
        assert_eq!(cursor.current, None);
        assert_eq!(cursor.pending_rate, Some(5.0));
    }

    #[test]
    fn test_noise_clears_pending_rate() {
        let (cursor, _) = feed(&["1. Amex Gold", "4%", "up to $1,500 per year", "Dining"]);
        assert_eq!(cursor.pending_rate, None);
        assert!(!cursor.current.unwrap().has_rewards());
    }

    #[test]
    fn test_category_without_rate_is_skipped() {
        let (cursor, _) = feed(&["1. Amex Gold", "Dining"]);
        assert!(!cursor.current.unwrap().has_rewards());
    }

    #[test]
    fn test_same_line_rate_sets_pending() {
        let (cursor, _) = feed(&["2. Double Cash 2%"]);
        assert_eq!(cursor.pending_rate, Some(2.0));
        assert_eq!(cursor.current.unwrap().name, "Double Cash");
    }

    #[test]
    fn test_header_resets_pending_rate() {
        let (cursor, _) = feed(&["1. Amex Gold", "4%", "2. Double Cash"]);
        assert_eq!(cursor.pending_rate, None);
    }

    #[test]
    fn test_embedded_header_split() {
        let cursor = ParseCursor {
            current: Some(CardRecord::new("Sapphire Reserve")),
            pending_rate: Some(5.0),
        };
        let step = step(cursor, "Dining 3. Amex Gold");

        let closed = step.emitted.expect("current card should be emitted");
        assert_eq!(closed.name, "Sapphire Reserve");
        assert_eq!(closed.rewards.get("Dining"), Some(5.0));

        let opened = step.cursor.current.unwrap();
        assert_eq!(opened.name, "Amex Gold");
        assert!(!opened.has_rewards());
        assert_eq!(step.cursor.pending_rate, None);
    }

    #[test]
    fn test_embedded_header_without_pending_rate_drops_prefix() {
        let cursor = ParseCursor {
            current: Some(CardRecord::new("Sapphire Reserve").with_reward("Travel", 3.0)),
            pending_rate: None,
        };
        let step = step(cursor, "Dining 3. Amex Gold");
        let closed = step.emitted.unwrap();
        assert_eq!(closed.rewards.get("Dining"), None);
        assert_eq!(closed.rewards.len(), 1);
    }

    #[test]
    fn test_zero_reward_card_is_not_emitted() {
        let (cursor, emitted) = feed(&["1. Empty Card", "2. Amex Gold"]);
        assert!(emitted.is_empty());
        assert_eq!(cursor.current.unwrap().name, "Amex Gold");
    }

    #[test]
    fn test_category_whitespace_collapsed() {
        let (cursor, _) = feed(&["1. Amex Gold", "4%", "  U.S.   supermarkets\t"]);
        assert_eq!(
            cursor.current.unwrap().rewards.get("U.S. supermarkets"),
            Some(4.0)
        );
    }

    #[test]
    fn test_finish_drops_empty_card() {
        assert_eq!(ParseCursor::new().finish(), None);
        let cursor = ParseCursor {
            current: Some(CardRecord::new("Empty")),
            pending_rate: Some(1.0),
        };
        assert_eq!(cursor.finish(), None);
    }

    #[test]
    fn test_stats() {
        let output = parse_listing_with_stats(
            "1. Amex Gold\n\n4%\nDining\nstray\nup to $500\nDining 2. Double Cash 2%\nEverywhere\n",
        );
        assert_eq!(output.cards.len(), 2);
        assert_eq!(
            output.stats,
            LineStats {
                blank: 1,
                headers: 2,
                embedded_headers: 1,
                percentages: 1,
                noise: 1,
                categories: 2,
                skipped: 1,
            }
        );
    }
}
