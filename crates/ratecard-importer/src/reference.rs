//! The reference table of known cards.
//!
//! The table's name column holds card display names; every other column is
//! a category whose cells are reward rates. Lookups compare normalized names,
//! first exactly and then by the partial-token rule.

use crate::table::CsvTable;
use crate::Result;
use ratecard_core::{NormalizedKey, Rewards, EVERYWHERE};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Parse a rate cell, treating anything unparsable as zero.
///
/// Thousands separators and a trailing `%` or `x` multiplier are tolerated.
///
/// ```
/// use ratecard_importer::parse_rate_cell;
///
/// assert_eq!(parse_rate_cell(" 3.5 "), 3.5);
/// assert_eq!(parse_rate_cell("5%"), 5.0);
/// assert_eq!(parse_rate_cell("3x"), 3.0);
/// assert_eq!(parse_rate_cell(""), 0.0);
/// assert_eq!(parse_rate_cell("n/a"), 0.0);
/// ```
#[must_use]
pub fn parse_rate_cell(cell: &str) -> f64 {
    let cleaned = cell.trim().replace(',', "");
    let cleaned = cleaned
        .strip_suffix(['%', 'x', 'X'])
        .unwrap_or(&cleaned)
        .trim();
    cleaned.parse().unwrap_or(0.0)
}

/// How a lookup matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized names are equal.
    Exact,
    /// Every significant token of the query occurs in the candidate.
    Partial,
}

/// A card found in the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct CardMatch {
    /// Display name as written in the table.
    pub name: String,
    /// Categories with a rate above zero, in column order.
    pub rewards: Rewards,
    /// Which rule produced the match.
    pub kind: MatchKind,
}

/// Rewards of a matched card split around its Everywhere baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardSummary {
    /// Categories earning more than the baseline, highest rate first.
    pub above_baseline: Vec<(String, f64)>,
    /// The Everywhere rate, or zero if the card has none.
    pub baseline: f64,
    /// Categories other than Everywhere earning exactly the baseline.
    pub at_baseline: usize,
}

impl RewardSummary {
    /// Number of reward categories counted for display.
    #[must_use]
    pub fn total(&self) -> usize {
        self.above_baseline.len() + self.at_baseline + usize::from(self.baseline > 0.0)
    }
}

impl CardMatch {
    /// Split the card's rewards into above-baseline and baseline groups.
    #[must_use]
    pub fn summary(&self) -> RewardSummary {
        let baseline = self.rewards.everywhere().unwrap_or(0.0);
        let mut above_baseline: Vec<(String, f64)> = self
            .rewards
            .iter()
            .filter(|(_, rate)| *rate > baseline)
            .map(|(category, rate)| (category.to_string(), rate))
            .collect();
        above_baseline.sort_by(|a, b| b.1.total_cmp(&a.1));

        let at_baseline = self
            .rewards
            .iter()
            .filter(|(category, rate)| *rate == baseline && *category != EVERYWHERE)
            .count();

        RewardSummary {
            above_baseline,
            baseline,
            at_baseline,
        }
    }
}

/// The reference table, loaded for lookups.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    table: CsvTable,
    name_column: usize,
}

impl ReferenceTable {
    /// Load a reference table, locating the name column by header.
    ///
    /// If no header equals `name_column`, the first column holds names.
    pub fn load(path: &Path, name_column: &str) -> Result<Self> {
        let table = CsvTable::read(path)?;
        info!(path = %path.display(), rows = table.rows.len(), "loaded reference table");
        Ok(Self::from_table(table, name_column))
    }

    /// Wrap an already-parsed table.
    #[must_use]
    pub fn from_table(table: CsvTable, name_column: &str) -> Self {
        let name_column = table.column_or_first(name_column);
        Self { table, name_column }
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Trimmed display names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.rows.iter().map(|row| self.row_name(row))
    }

    /// Look up a card by name.
    ///
    /// Tries exact normalized equality over the whole table first, then the
    /// partial-token rule. Either way the first row in file order wins.
    #[must_use]
    pub fn find(&self, query: &str) -> Option<CardMatch> {
        let target = NormalizedKey::new(query);

        let exact = self
            .table
            .rows
            .iter()
            .find(|row| NormalizedKey::new(self.row_name(row)) == target);
        if let Some(row) = exact {
            return Some(self.to_match(row, MatchKind::Exact));
        }

        self.table
            .rows
            .iter()
            .find(|row| target.partially_matches(&NormalizedKey::new(self.row_name(row))))
            .map(|row| self.to_match(row, MatchKind::Partial))
    }

    fn row_name<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.name_column).map_or("", |name| name.trim())
    }

    fn to_match(&self, row: &[String], kind: MatchKind) -> CardMatch {
        let rewards = self
            .table
            .headers
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(idx, _)| *idx != self.name_column)
            .map(|(_, (header, cell))| (header.as_str(), parse_rate_cell(cell)))
            .filter(|(_, rate)| *rate > 0.0)
            .collect();

        CardMatch {
            name: self.row_name(row).to_string(),
            rewards,
            kind,
        }
    }
}

/// Normalized names of every card in a reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceKeySet {
    keys: HashSet<NormalizedKey>,
}

impl ReferenceKeySet {
    /// Collect the keys of a loaded table. Blank names are skipped.
    #[must_use]
    pub fn from_table(table: &ReferenceTable) -> Self {
        table
            .names()
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Load the key set from a file, warning and returning an empty set on
    /// failure.
    #[must_use]
    pub fn load_or_empty(path: &Path, name_column: &str) -> Self {
        match ReferenceTable::load(path, name_column) {
            Ok(table) => Self::from_table(&table),
            Err(e) if e.is_not_found() => {
                warn!(path = %path.display(), "reference file not found");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "could not read reference file");
                Self::default()
            }
        }
    }

    /// Whether a raw card name is in the set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&NormalizedKey::new(name))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ReferenceKeySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(NormalizedKey::new).collect(),
        }
    }
}
