//! Folding card artifacts back into reference tables.
//!
//! Each card's Everywhere rate is a floor: no category of that card may earn
//! less, and categories the table leaves at zero or blank are raised to it.

use crate::artifact::CardArtifact;
use crate::reference::parse_rate_cell;
use crate::table::CsvTable;
use crate::{ImportError, Result};
use ratecard_core::{format_rate, NormalizedKey, Rewards, EVERYWHERE};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A card ready to be merged: its rewards with the floor already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeCard {
    /// Display name from the artifact.
    pub name: String,
    /// Floored rewards in artifact order.
    pub rewards: Rewards,
    /// The Everywhere rate, if the card has one.
    pub everywhere: Option<f64>,
}

impl MergeCard {
    /// Prepare an artifact for merging.
    #[must_use]
    pub fn from_artifact(artifact: CardArtifact) -> Self {
        let mut rewards = artifact.rewards;
        let everywhere = apply_everywhere_floor(&mut rewards);
        Self {
            name: artifact.card,
            rewards,
            everywhere,
        }
    }
}

/// Raise every category below the Everywhere rate up to it.
///
/// Returns the Everywhere rate, or `None` (leaving the rewards untouched) if
/// the card has no Everywhere category.
pub fn apply_everywhere_floor(rewards: &mut Rewards) -> Option<f64> {
    let floor = rewards.everywhere()?;
    for (category, rate) in rewards.iter_mut() {
        if category != EVERYWHERE && *rate < floor {
            *rate = floor;
        }
    }
    Some(floor)
}

/// Load every `*.json` artifact in a directory, in file-name order.
///
/// Artifacts naming the same card replace the earlier entry but keep its
/// position.
pub fn load_artifacts(dir: &Path) -> Result<Vec<MergeCard>> {
    let entries = fs::read_dir(dir).map_err(|e| ImportError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ImportError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut cards: Vec<MergeCard> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for path in &paths {
        let card = MergeCard::from_artifact(CardArtifact::read(path)?);
        debug!(path = %path.display(), card = %card.name, "loaded artifact");
        match index.get(&card.name) {
            Some(&idx) => cards[idx] = card,
            None => {
                index.insert(card.name.clone(), cards.len());
                cards.push(card);
            }
        }
    }

    info!(dir = %dir.display(), count = cards.len(), "loaded artifacts");
    Ok(cards)
}

/// Find the table column for a category label.
///
/// Tries, in order: exact header match, case-insensitive match, then
/// substring containment either way. The substring rule only applies when
/// both the label and the header are longer than three characters, so that
/// short labels do not latch onto unrelated headers.
pub fn match_category_column(category: &str, headers: &[String]) -> Option<usize> {
    if let Some(idx) = headers.iter().position(|h| h == category) {
        return Some(idx);
    }

    let category = category.trim().to_lowercase();
    if let Some(idx) = headers
        .iter()
        .position(|h| h.trim().to_lowercase() == category)
    {
        return Some(idx);
    }

    headers.iter().position(|h| {
        let header = h.trim().to_lowercase();
        (category.contains(&header) || header.contains(&category))
            && category.chars().count() > 3
            && header.chars().count() > 3
    })
}

/// Outcome of merging into one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Cards whose row was updated.
    pub updated: usize,
    /// Cards with no matching row.
    pub not_found: Vec<String>,
}

/// Merge cards into an in-memory table.
///
/// Rows are matched on the normalized name in `name_column`.
pub fn merge_into_table(table: &mut CsvTable, name_column: &str, cards: &[MergeCard]) -> MergeReport {
    let name_idx = table.column_or_first(name_column);
    let width = table.headers.len();

    let mut columns: HashMap<&str, Option<usize>> = HashMap::new();
    for card in cards {
        for (category, _) in card.rewards.iter() {
            columns.entry(category).or_insert_with(|| {
                match_category_column(category, &table.headers).filter(|&idx| idx != name_idx)
            });
        }
    }

    let mut report = MergeReport::default();
    for card in cards {
        let target = NormalizedKey::new(&card.name);
        let Some(row) = table.rows.iter_mut().find(|row| {
            row.get(name_idx)
                .is_some_and(|name| NormalizedKey::new(name.trim()) == target)
        }) else {
            debug!(card = %card.name, "card not found in table");
            report.not_found.push(card.name.clone());
            continue;
        };

        if row.len() < width {
            row.resize(width, "0.0".to_string());
        }

        let mut written = HashSet::new();
        for (category, rate) in card.rewards.iter() {
            let Some(idx) = columns.get(category).copied().flatten() else {
                debug!(card = %card.name, category, "no column for category");
                continue;
            };
            let value = if category == EVERYWHERE {
                rate
            } else {
                card.everywhere.map_or(rate, |floor| rate.max(floor))
            };
            row[idx] = format_rate(value);
            written.insert(idx);
        }

        if let Some(floor) = card.everywhere.filter(|&floor| floor > 0.0) {
            for idx in (0..width).filter(|idx| *idx != name_idx && !written.contains(idx)) {
                if parse_rate_cell(&row[idx]) == 0.0 {
                    row[idx] = format_rate(floor);
                }
            }
        }

        report.updated += 1;
    }

    report
}

/// Merge cards into a table file in place.
pub fn merge_file(path: &Path, name_column: &str, cards: &[MergeCard]) -> Result<MergeReport> {
    let mut table = CsvTable::read(path)?;
    let report = merge_into_table(&mut table, name_column, cards);
    table.write(path)?;
    info!(
        path = %path.display(),
        updated = report.updated,
        not_found = report.not_found.len(),
        "merged table"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn card(name: &str, rewards: &[(&str, f64)]) -> MergeCard {
        MergeCard::from_artifact(CardArtifact {
            card: name.to_string(),
            in_csv: true,
            rewards: rewards.iter().copied().collect(),
        })
    }

    #[test]
    fn test_apply_everywhere_floor() {
        let mut rewards: Rewards = [("Everywhere", 2.0), ("Dining", 1.0), ("Travel", 5.0)]
            .into_iter()
            .collect();
        assert_eq!(apply_everywhere_floor(&mut rewards), Some(2.0));
        assert_eq!(rewards.get("Dining"), Some(2.0));
        assert_eq!(rewards.get("Travel"), Some(5.0));
    }

    #[test]
    fn test_apply_everywhere_floor_without_everywhere() {
        let mut rewards: Rewards = [("Dining", 1.0)].into_iter().collect();
        assert_eq!(apply_everywhere_floor(&mut rewards), None);
        assert_eq!(rewards.get("Dining"), Some(1.0));
    }

    #[test]
    fn test_match_category_column() {
        let headers = headers(&["Card Name", "Dining", "Hotels", "Gas stations (U.S.)"]);
        assert_eq!(match_category_column("Dining", &headers), Some(1));
        assert_eq!(match_category_column("dining ", &headers), Some(1));
        assert_eq!(match_category_column("Hotel", &headers), Some(2));
        assert_eq!(match_category_column("Gas stations", &headers), Some(3));
        assert_eq!(match_category_column("Gas", &headers), None);
        assert_eq!(match_category_column("Streaming", &headers), None);
    }

    #[test]
    fn test_match_category_column_short_labels_need_exact() {
        let headers = headers(&["Card Name", "Bus", "Buses"]);
        assert_eq!(match_category_column("bus", &headers), Some(1));
        assert_eq!(match_category_column("Buse", &headers), Some(2));
    }

    #[test]
    fn test_merge_applies_floor_to_row() {
        let mut table = CsvTable::from_csv_str(
            "Card Name,Dining,Travel,Everywhere\nDouble Cash,1,,0\nOther,3,3,1\n",
        )
        .unwrap();
        let cards = [card("Double Cash", &[("Everywhere", 2.0), ("Dining", 1.0)])];

        let report = merge_into_table(&mut table, "Card Name", &cards);
        assert_eq!(report.updated, 1);
        assert!(report.not_found.is_empty());
        assert_eq!(table.rows[0], vec!["Double Cash", "2.0", "2.0", "2.0"]);
        assert_eq!(table.rows[1], vec!["Other", "3", "3", "1"]);
    }

    #[test]
    fn test_merge_keeps_nonzero_cells_and_pads_rows() {
        let mut table =
            CsvTable::from_csv_str("Card Name,Dining,Travel,Grocery\n1. Savor 3%,4\n").unwrap();
        let cards = [card("Savor", &[("Everywhere", 1.0), ("Grocery", 3.0)])];

        let report = merge_into_table(&mut table, "Card Name", &cards);
        assert_eq!(report.updated, 1);
        assert_eq!(table.rows[0], vec!["1. Savor 3%", "4", "1.0", "3.0"]);
    }

    #[test]
    fn test_merge_without_everywhere_writes_explicit_only() {
        let mut table = CsvTable::from_csv_str("Card Name,Dining,Travel\nGold,0,0\n").unwrap();
        let cards = [card("Gold", &[("Dining", 4.0)])];
        merge_into_table(&mut table, "Card Name", &cards);
        assert_eq!(table.rows[0], vec!["Gold", "4.0", "0"]);
    }

    #[test]
    fn test_merge_reports_unknown_cards() {
        let mut table = CsvTable::from_csv_str("Card Name,Dining\nGold,4\n").unwrap();
        let cards = [card("Discover It", &[("Dining", 5.0)])];
        let report = merge_into_table(&mut table, "Card Name", &cards);
        assert_eq!(report.updated, 0);
        assert_eq!(report.not_found, vec!["Discover It".to_string()]);
        assert_eq!(table.rows[0], vec!["Gold", "4"]);
    }

    #[test]
    fn test_merge_never_writes_name_column() {
        let mut table = CsvTable::from_csv_str("Card Name,Dining\nGold,4\n").unwrap();
        let cards = [card("Gold", &[("Card Names", 9.0)])];
        merge_into_table(&mut table, "Card Name", &cards);
        assert_eq!(table.rows[0], vec!["Gold", "4"]);
    }
}
