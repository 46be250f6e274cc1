//! Writing one artifact per parsed card.

use crate::artifact::CardArtifact;
use crate::reference::ReferenceKeySet;
use crate::{ImportError, Result};
use ratecard_core::CardRecord;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static regex must compile"));
static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("static regex must compile"));

/// Derive a filesystem-safe identifier from a card name.
///
/// Removes characters other than word characters, whitespace and hyphens,
/// collapses whitespace/hyphen runs to `_`, and keeps at most `max_len`
/// characters. An empty result becomes `card_<position>`.
///
/// ```
/// use ratecard_importer::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Chase Sapphire Reserve®", 0, 100), "Chase_Sapphire_Reserve");
/// assert_eq!(sanitize_identifier("®™", 7, 100), "card_7");
/// ```
#[must_use]
pub fn sanitize_identifier(name: &str, position: usize, max_len: usize) -> String {
    let safe = UNSAFE_CHARS.replace_all(name, "");
    let safe = SEPARATOR_RUNS.replace_all(&safe, "_");
    let safe: String = safe.chars().take(max_len).collect();
    if safe.is_empty() {
        format!("card_{position}")
    } else {
        safe
    }
}

/// Configuration for an [`Emitter`].
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Directory receiving the artifacts.
    pub output_dir: PathBuf,
    /// Maximum identifier length in characters.
    pub max_identifier_len: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("card_json_output"),
            max_identifier_len: 100,
        }
    }
}

impl EmitterConfig {
    /// Start building an emitter configuration.
    pub fn builder() -> EmitterConfigBuilder {
        EmitterConfigBuilder::new()
    }
}

/// Builder for [`EmitterConfig`].
pub struct EmitterConfigBuilder {
    config: EmitterConfig,
}

impl EmitterConfigBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EmitterConfig::default(),
        }
    }

    /// Set the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the maximum identifier length.
    pub const fn max_identifier_len(mut self, len: usize) -> Self {
        self.config.max_identifier_len = len;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EmitterConfig {
        self.config
    }
}

impl Default for EmitterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of an emit run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Artifact paths in write order. A path repeats if two names sanitize
    /// alike; the later write wins.
    pub written: Vec<PathBuf>,
    /// Cards present in the reference set.
    pub found: usize,
    /// Names of cards absent from the reference set.
    pub not_found: Vec<String>,
}

/// Persists parsed cards as JSON artifacts.
pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    /// Create an emitter.
    pub const fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// The directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Artifact path for the card at `position`.
    pub fn artifact_path(&self, record: &CardRecord, position: usize) -> PathBuf {
        let id = sanitize_identifier(&record.name, position, self.config.max_identifier_len);
        self.config.output_dir.join(format!("{id}.json"))
    }

    /// Write one artifact per card, checking each against the reference set.
    pub fn emit_all(&self, cards: &[CardRecord], keys: &ReferenceKeySet) -> Result<EmitReport> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|e| ImportError::io(dir, e))?;

        let mut report = EmitReport::default();
        for (position, record) in cards.iter().enumerate() {
            let in_csv = keys.contains(&record.name);
            let path = self.artifact_path(record, position);
            CardArtifact::from_record(record, in_csv).write(&path)?;
            debug!(path = %path.display(), card = %record.name, "wrote artifact");

            if in_csv {
                report.found += 1;
            } else {
                debug!(card = %record.name, "card not found in reference");
                report.not_found.push(record.name.clone());
            }
            report.written.push(path);
        }

        info!(dir = %dir.display(), count = report.written.len(), "emitted artifacts");
        Ok(report)
    }
}
