//! Core types for ratecard
//!
//! This crate provides the fundamental types shared by the ratecard crates:
//!
//! - [`CardRecord`] - A card display name with its reward rates
//! - [`Rewards`] - An insertion-ordered category to rate map with max-merge
//! - [`normalize`] - Canonical comparison key for raw card names
//! - [`format_rate`] - Rate rendering shared by artifacts and reports
//!
//! # Example
//!
//! ```
//! use ratecard_core::{normalize, CardRecord};
//!
//! let mut card = CardRecord::new("Chase Sapphire Reserve®");
//! card.rewards.merge_max("Dining", 3.0);
//! card.rewards.merge_max("Dining", 5.0);
//!
//! assert_eq!(card.rewards.get("Dining"), Some(5.0));
//! assert_eq!(normalize(&card.name), "chase sapphire reserve");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod card;
pub mod format;
pub mod normalize;

pub use card::{CardRecord, Rewards, EVERYWHERE};
pub use format::format_rate;
pub use normalize::{matches_all_tokens, normalize, NormalizedKey};
