//! Project configuration.
//!
//! A project is a directory holding the pasted listing, the reference table
//! and the artifact directory. Every path has a conventional default, so a
//! configuration file is only needed to move things around:
//!
//! ```json
//! {
//!   "listing": "incoming/cards.txt",
//!   "merge_targets": ["card_rewards_matrix_refinedsix.csv"]
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the configuration
//! file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths and settings shared by the ratecard tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// The pasted listing to parse.
    pub listing: PathBuf,
    /// Reference table used to check extracted cards.
    pub reference: PathBuf,
    /// Directory that receives one JSON artifact per card.
    pub output_dir: PathBuf,
    /// Tables updated in place by the merge tool. Missing ones are skipped.
    pub merge_targets: Vec<PathBuf>,
    /// Tables the lookup tool tries, first existing one wins.
    pub lookup_candidates: Vec<PathBuf>,
    /// Header of the column holding card names.
    pub name_column: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            listing: PathBuf::from("tempcards.txt"),
            reference: PathBuf::from("card_rewards_matrix_refinedsix.csv"),
            output_dir: PathBuf::from("card_json_output"),
            merge_targets: vec![
                PathBuf::from("card_rewards_matrix_refinedsix.csv"),
                PathBuf::from("scraper/card_rewards_matrix.csv"),
            ],
            lookup_candidates: vec![
                PathBuf::from("card_rewards_matrix_refinedsix.csv"),
                PathBuf::from("scraper/card_rewards_matrix.csv"),
                PathBuf::from("Core/Resources/card_rewards_matrix.csv"),
            ],
            name_column: "Card Name".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load a configuration file, resolving its paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve(base))
    }

    /// Load `config` if given, otherwise use the defaults under `root`.
    pub fn discover(config: Option<&Path>, root: &Path) -> Result<Self> {
        match config {
            Some(path) => Self::load(path),
            None => Ok(Self::default().resolve(root)),
        }
    }

    /// Make every relative path relative to `base` instead.
    #[must_use]
    pub fn resolve(mut self, base: &Path) -> Self {
        self.listing = resolve_path(base, &self.listing);
        self.reference = resolve_path(base, &self.reference);
        self.output_dir = resolve_path(base, &self.output_dir);
        for path in self
            .merge_targets
            .iter_mut()
            .chain(self.lookup_candidates.iter_mut())
        {
            *path = resolve_path(base, path);
        }
        self
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
