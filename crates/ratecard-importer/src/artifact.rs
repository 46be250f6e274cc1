//! Per-card JSON artifacts.
//!
//! An artifact is the hand-off between extraction and merge:
//!
//! ```json
//! {
//!   "card": "Amex Gold",
//!   "in_csv": true,
//!   "rewards": {
//!     "Dining": "4.0%"
//!   }
//! }
//! ```

use crate::{ImportError, Result};
use ratecard_core::{CardRecord, Rewards};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The persisted form of a parsed card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardArtifact {
    /// Display name of the card.
    pub card: String,
    /// Whether the card's normalized name is in the reference table.
    #[serde(default)]
    pub in_csv: bool,
    /// Rates, written as `"<rate>%"` strings in first-seen order.
    #[serde(default, with = "percent_map")]
    pub rewards: Rewards,
}

impl CardArtifact {
    /// Build the artifact for a parsed card.
    #[must_use]
    pub fn from_record(record: &CardRecord, in_csv: bool) -> Self {
        Self {
            card: record.name.clone(),
            in_csv,
            rewards: record.rewards.clone(),
        }
    }

    /// Render as pretty JSON with two-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Read an artifact file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| ImportError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the artifact, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json().map_err(|source| ImportError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|e| ImportError::io(path, e))
    }
}

/// Parse an artifact rate value: `"5.0%"`, `"5"`, or a bare number.
///
/// Anything else counts as zero.
fn parse_rate_value(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.replace('%', "").trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

mod percent_map {
    use super::parse_rate_value;
    use ratecard_core::{format_rate, Rewards};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(rewards: &Rewards, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(rewards.len()))?;
        for (category, rate) in rewards.iter() {
            map.serialize_entry(category, &format!("{}%", format_rate(rate)))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rewards, D::Error> {
        deserializer.deserialize_map(RewardsVisitor)
    }

    struct RewardsVisitor;

    impl<'de> Visitor<'de> for RewardsVisitor {
        type Value = Rewards;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of category to rate")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Rewards, A::Error> {
            let mut rewards = Rewards::new();
            while let Some((category, value)) =
                access.next_entry::<String, serde_json::Value>()?
            {
                rewards.insert(category, parse_rate_value(&value));
            }
            Ok(rewards)
        }
    }
}
