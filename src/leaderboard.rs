//! High score list
//!
//! This module keeps the global list of finished rounds, ordered by score
//! and capped in size, and provides the per-sport and welcome-screen views
//! of it. The list persists as a JSON array under a single store key.

use chrono::{DateTime, SubsecRound, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    TruncatedVec, constants,
    storage::Store,
    trivia::{Difficulty, SportId},
};

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Display name, `Anonymous` when the player entered none
    pub name: String,
    /// Correct answers in the round
    pub score: u32,
    /// Difficulty the round was played at
    pub difficulty: Difficulty,
    /// Sport the round was played in
    pub sport: SportId,
    /// When the round finished, stored as an ISO 8601 string
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl HighScoreEntry {
    /// Creates an entry
    ///
    /// The timestamp is kept at millisecond precision, matching what browsers
    /// write for the same field.
    pub fn new(
        name: impl Into<String>,
        score: u32,
        difficulty: Difficulty,
        sport: SportId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            score,
            difficulty,
            sport,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}

/// Orders entries by descending score, keeping the existing order of ties,
/// and drops whatever does not fit
pub fn rank(entries: Vec<HighScoreEntry>) -> Vec<HighScoreEntry> {
    entries
        .into_iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .take(constants::high_scores::CAPACITY)
        .collect_vec()
}

/// Every recorded round, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<HighScoreEntry>", into = "Vec<HighScoreEntry>")]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl From<Vec<HighScoreEntry>> for HighScores {
    fn from(entries: Vec<HighScoreEntry>) -> Self {
        Self {
            entries: rank(entries),
        }
    }
}

impl From<HighScores> for Vec<HighScoreEntry> {
    fn from(value: HighScores) -> Self {
        value.entries
    }
}

impl HighScores {
    /// Records a finished round
    ///
    /// The entry goes after every entry with an equal or higher score.
    /// Returns its position, or `None` when the list is full of better
    /// scores and the entry was not kept.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .take_while(|existing| existing.score >= entry.score)
            .count();

        if position >= constants::high_scores::CAPACITY {
            return None;
        }

        self.entries.insert(position, entry);
        self.entries.truncate(constants::high_scores::CAPACITY);
        Some(position)
    }

    /// All entries, best first
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no round has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best `limit` entries across every sport
    pub fn top(&self, limit: usize) -> TruncatedVec<HighScoreEntry> {
        TruncatedVec::new(self.entries.iter().cloned(), limit, self.entries.len())
    }

    /// The best `limit` entries of one sport
    ///
    /// Filtering happens on the whole list, so a sport is not crowded out
    /// of its own board by better scores elsewhere.
    pub fn sport_leaderboard(&self, sport: &SportId, limit: usize) -> TruncatedVec<HighScoreEntry> {
        let matching = self
            .entries
            .iter()
            .filter(|entry| &entry.sport == sport)
            .collect_vec();
        let count = matching.len();
        TruncatedVec::new(matching.into_iter().cloned(), limit, count)
    }

    /// Whether `name` has a recorded round in `sport`
    pub fn has_entry_for(&self, name: &str, sport: &SportId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name == name && &entry.sport == sport)
    }

    /// Reads the list from `store`
    ///
    /// Missing or corrupt data yields an empty list, and individual entries
    /// that fail to parse are dropped.
    pub fn load(store: &impl Store) -> Self {
        let Some(raw) = store.get(constants::storage::HIGH_SCORES_KEY) else {
            return Self::default();
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(error) => {
                tracing::warn!(%error, "stored high scores are corrupt; starting empty");
                return Self::default();
            }
        };

        values
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<HighScoreEntry>(value)
                    .map_err(|error| tracing::warn!(%error, "dropping malformed high score"))
                    .ok()
            })
            .collect_vec()
            .into()
    }

    /// Writes the list to `store`
    pub fn save(&self, store: &mut impl Store) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => store.set(constants::storage::HIGH_SCORES_KEY, json),
            Err(error) => tracing::error!(%error, "could not serialize high scores"),
        }
    }
}
