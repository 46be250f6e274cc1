//! Card records and their reward maps.
//!
//! A [`CardRecord`] is built up incrementally while a listing is parsed: it
//! starts with a name and no rewards, and categories are merged in as they
//! are discovered. Records that never gain a reward are not emitted.

use std::fmt;

/// The category whose rate acts as the floor for every other category.
pub const EVERYWHERE: &str = "Everywhere";

/// Reward rates keyed by category label, in first-seen order.
///
/// Labels are unique. Merging the same label twice keeps the larger rate
/// (see [`Rewards::merge_max`]), so the order reflects when a category was
/// first observed rather than when its rate last changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rewards {
    entries: Vec<(String, f64)>,
}

impl Rewards {
    /// Create an empty reward map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Merge a rate for a category, keeping the maximum of old and new.
    ///
    /// Empty labels are never stored. Returns `true` if the stored rate
    /// changed.
    pub fn merge_max(&mut self, category: impl Into<String>, rate: f64) -> bool {
        let category = category.into();
        if category.is_empty() {
            return false;
        }
        match self.position(&category) {
            Some(idx) => {
                let slot = &mut self.entries[idx].1;
                if rate > *slot {
                    *slot = rate;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.push((category, rate));
                true
            }
        }
    }

    /// Set a rate for a category, replacing any previous value in place.
    pub fn insert(&mut self, category: impl Into<String>, rate: f64) {
        let category = category.into();
        match self.position(&category) {
            Some(idx) => self.entries[idx].1 = rate,
            None => self.entries.push((category, rate)),
        }
    }

    /// Get the rate recorded for a category.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.position(category).map(|idx| self.entries[idx].1)
    }

    /// The rate of the [`EVERYWHERE`] category, if present.
    #[must_use]
    pub fn everywhere(&self) -> Option<f64> {
        self.get(EVERYWHERE)
    }

    /// Iterate over `(category, rate)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(c, r)| (c.as_str(), *r))
    }

    /// Iterate mutably over the rates, in first-seen order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut f64)> {
        self.entries.iter_mut().map(|(c, r)| (c.as_str(), r))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no category has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.entries.iter().position(|(c, _)| c == category)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Rewards {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut rewards = Self::new();
        for (category, rate) in iter {
            rewards.insert(category, rate);
        }
        rewards
    }
}

/// A card and the reward rates parsed for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardRecord {
    /// Display name, trimmed, as it appeared in the source.
    pub name: String,
    /// Category rates discovered so far.
    pub rewards: Rewards,
}

impl CardRecord {
    /// Start a record with no rewards.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rewards: Rewards::new(),
        }
    }

    /// Add a reward, builder style.
    #[must_use]
    pub fn with_reward(mut self, category: impl Into<String>, rate: f64) -> Self {
        self.rewards.merge_max(category, rate);
        self
    }

    /// Whether the record has at least one reward and so should be emitted.
    #[must_use]
    pub fn has_rewards(&self) -> bool {
        !self.rewards.is_empty()
    }
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (category, rate) in self.rewards.iter() {
            write!(f, "\n  {category}: {}%", crate::format_rate(rate))?;
        }
        Ok(())
    }
}
