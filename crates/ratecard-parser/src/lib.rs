//! Parser for free-form reward-card listings.
//!
//! A listing is a sequence of lines naming cards (`3. Amex Gold`) followed by
//! `(rate, category)` pairs, where the rate may sit on its own line, trail
//! the card name, or be separated from its category by condition lines that
//! must be ignored. There is no fixed grammar, so this crate never fails:
//! lines it cannot place are skipped and the worst outcome is fewer records.
//!
//! # Features
//!
//! - Line classification into headers, rates, noise, and category candidates
//! - Card headers embedded mid-line after the previous card's last category
//! - Explicit, line-by-line state transitions ([`step`])
//! - Max-rate merging when a category repeats for the same card
//!
//! # Example
//!
//! ```
//! use ratecard_parser::parse_listing;
//!
//! let source = "1. Amex Gold\n4%\nDining\n3%\nFlights\n2. Double Cash 2%\nEverywhere\n";
//!
//! let cards = parse_listing(source);
//! assert_eq!(cards.len(), 2);
//! assert_eq!(cards[0].name, "Amex Gold");
//! assert_eq!(cards[0].rewards.get("Dining"), Some(4.0));
//! assert_eq!(cards[1].rewards.get("Everywhere"), Some(2.0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod parser;
mod span;

pub use classify::{classify, find_header, is_noise, parse_percentage, Header, LineKind};
pub use parser::{parse_lines, parse_listing, parse_listing_with_stats, step, LineStats, ParseCursor, ParseOutput, Step};
pub use span::Span;
