//! Reference tables, card artifacts, and merge-back for ratecard.
//!
//! This crate holds the deterministic collaborators around the listing
//! parser:
//!
//! - [`ReferenceTable`] / [`ReferenceKeySet`] - the authoritative card table
//!   and exact or partial name lookup against it
//! - [`Emitter`] - one JSON artifact per parsed card
//! - [`merge`] - folding artifacts back into reference tables, with the
//!   Everywhere rate acting as a floor
//!
//! # Example
//!
//! ```rust,no_run
//! use ratecard_importer::{Emitter, EmitterConfig, ReferenceKeySet};
//! use std::path::Path;
//!
//! let keys = ReferenceKeySet::load_or_empty(Path::new("cards.csv"), "Card Name");
//! let emitter = Emitter::new(EmitterConfig::builder().output_dir("card_json_output").build());
//! // let report = emitter.emit_all(&cards, &keys)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod artifact;
pub mod emitter;
pub mod merge;
pub mod reference;
pub mod table;

use std::path::PathBuf;
use thiserror::Error;

pub use artifact::CardArtifact;
pub use emitter::{sanitize_identifier, EmitReport, Emitter, EmitterConfig, EmitterConfigBuilder};
pub use merge::{
    apply_everywhere_floor, load_artifacts, match_category_column, merge_file, merge_into_table,
    MergeCard, MergeReport,
};
pub use reference::{parse_rate_cell, CardMatch, MatchKind, ReferenceKeySet, ReferenceTable, RewardSummary};
pub use table::CsvTable;

/// Errors from reading or writing the flat files this crate manages.
#[derive(Debug, Error)]
pub enum ImportError {
    /// IO error on a file or directory.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("failed to parse CSV {}: {source}", .path.display())]
    Csv {
        /// The CSV file.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Malformed or unwritable JSON artifact.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        /// The artifact file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A table without a header row.
    #[error("no header row in {}", .path.display())]
    MissingHeader {
        /// The headerless file.
        path: PathBuf,
    },
}

impl ImportError {
    /// Whether the error is a missing file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for this crate.
pub type Result<T, E = ImportError> = std::result::Result<T, E>;
