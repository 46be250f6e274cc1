//! Command-line tools for card reward listings.
//!
//! - `ratecard-extract`: parse a pasted listing into per-card JSON artifacts
//! - `ratecard-lookup`: show one card's rewards from the reference table
//! - `ratecard-merge`: fold artifacts back into the reference tables
//!
//! # Example Usage
//!
//! ```bash
//! ratecard-extract --listing tempcards.txt
//! ratecard-lookup "Chase Sapphire Reserve"
//! ratecard-merge --config ratecard.json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod config;
