//! The question pool: sport → difficulty → questions
//!
//! Pools are supplied whole by the driver. Loading is tolerant: a bucket or
//! record that does not parse is dropped with a warning instead of failing
//! the whole catalog, and a sport left without questions is treated as
//! absent.

use std::collections::BTreeMap;

use enum_map::EnumMap;
use garde::Validate;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

use super::question::{Difficulty, QuestionRecord, SportId};

/// Questions of one sport, bucketed by difficulty
pub type Buckets = EnumMap<Difficulty, Vec<QuestionRecord>>;

/// Catalog of every loaded question
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionPool {
    sports: BTreeMap<SportId, Buckets>,
}

impl QuestionPool {
    /// Creates an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from a JSON object of `sport → difficulty → [record]`
    ///
    /// Anything that is not shaped like that is skipped.
    pub fn from_json(value: &Value) -> Self {
        let mut pool = Self::new();

        let Some(sports) = value.as_object() else {
            tracing::warn!("question catalog is not a JSON object");
            return pool;
        };

        for (sport, buckets) in sports {
            pool.merge_json(SportId::new(sport.as_str()), buckets);
        }

        pool
    }

    /// Parses a pool from a JSON string
    ///
    /// # Errors
    ///
    /// Returns the `serde_json::Error` when the text is not JSON at all.
    /// Structurally unexpected content is tolerated as in [`Self::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&value))
    }

    /// Appends the difficulty buckets found in `buckets` to `sport`
    ///
    /// This is how supplementary packs are folded into a main sport.
    pub fn merge_json(&mut self, sport: SportId, buckets: &Value) {
        let Some(buckets) = buckets.as_object() else {
            tracing::warn!(%sport, "sport entry is not an object; skipping");
            return;
        };

        let mut parsed = Buckets::default();
        for (key, records) in buckets {
            let Ok(difficulty) = key.parse::<Difficulty>() else {
                tracing::warn!(%sport, difficulty = %key, "unknown difficulty bucket; skipping");
                continue;
            };
            let Some(records) = records.as_array() else {
                tracing::warn!(%sport, %difficulty, "bucket is not an array; skipping");
                continue;
            };
            parsed[difficulty].extend(records.iter().filter_map(|record| {
                parse_record(record)
                    .map_err(|reason| {
                        tracing::warn!(%sport, %difficulty, %reason, "dropping malformed question");
                    })
                    .ok()
            }));
        }

        self.merge_sport(sport, parsed);
    }

    /// Appends already-parsed buckets to `sport`
    ///
    /// Empty input leaves the pool untouched, so a sport never exists
    /// without at least one question.
    pub fn merge_sport(&mut self, sport: SportId, buckets: Buckets) {
        if buckets.values().all(Vec::is_empty) {
            tracing::warn!(%sport, "no usable questions; sport treated as absent");
            return;
        }

        let existing = self.sports.entry(sport).or_default();
        for (difficulty, records) in buckets {
            existing[difficulty].extend(records);
        }
    }

    /// Adds questions to one bucket
    pub fn insert(&mut self, sport: SportId, difficulty: Difficulty, records: Vec<QuestionRecord>) {
        let mut buckets = Buckets::default();
        buckets[difficulty] = records;
        self.merge_sport(sport, buckets);
    }

    /// The questions of one bucket, empty when the sport or bucket is absent
    pub fn bucket(&self, sport: &SportId, difficulty: Difficulty) -> &[QuestionRecord] {
        self.sports
            .get(sport)
            .map(|buckets| buckets[difficulty].as_slice())
            .unwrap_or_default()
    }

    /// Sports that have at least one question, in identifier order
    pub fn available_sports(&self) -> Vec<SportId> {
        self.sports.keys().cloned().collect_vec()
    }

    /// Whether `sport` has at least one question
    pub fn contains_sport(&self, sport: &SportId) -> bool {
        self.sports.contains_key(sport)
    }

    /// Whether the pool contains no questions at all
    pub fn is_empty(&self) -> bool {
        self.sports.is_empty()
    }

    /// Total number of questions across all sports and difficulties
    pub fn len(&self) -> usize {
        self.sports
            .values()
            .flat_map(|buckets| buckets.values())
            .map(Vec::len)
            .sum()
    }
}

fn parse_record(record: &Value) -> Result<QuestionRecord, String> {
    let record: QuestionRecord =
        serde_json::from_value(record.clone()).map_err(|e| e.to_string())?;
    record.validate().map_err(|e| e.to_string())?;
    Ok(record)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    fn question(n: usize) -> Value {
        json!({
            "question": format!("Question {n}?"),
            "options": ["Yes", "No"],
            "correctAnswer": "Yes"
        })
    }

    #[test]
    fn test_pool_from_json_reads_buckets() {
        let pool = QuestionPool::from_json(&json!({
            "mlb": { "easy": [question(1), question(2)], "hard": [question(3)] },
            "nba": { "medium": [question(4)] }
        }));

        assert_eq!(pool.len(), 4);
        assert_eq!(pool.bucket(&"mlb".into(), Difficulty::Easy).len(), 2);
        assert_eq!(pool.bucket(&"mlb".into(), Difficulty::Medium).len(), 0);
        assert_eq!(
            pool.available_sports(),
            vec![SportId::from("mlb"), SportId::from("nba")]
        );
    }

    #[test]
    fn test_pool_missing_bucket_is_empty_slice() {
        let pool = QuestionPool::new();
        assert!(pool.bucket(&"nfl".into(), Difficulty::Hard).is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_malformed_sport_is_absent() {
        let pool = QuestionPool::from_json(&json!({
            "mlb": { "easy": [question(1)] },
            "nfl": "not an object",
            "nba": { "easy": "not an array", "legendary": [question(2)] }
        }));

        assert_eq!(pool.available_sports(), vec![SportId::from("mlb")]);
        assert!(!pool.contains_sport(&"nba".into()));
    }

    #[test]
    fn test_pool_drops_invalid_records() {
        let pool = QuestionPool::from_json(&json!({
            "mlb": { "easy": [
                question(1),
                { "question": "Broken?", "options": ["A"], "correctAnswer": "A" },
                { "question": "Wrong answer?", "options": ["A", "B"], "correctAnswer": "C" },
                { "no": "fields" }
            ] }
        }));

        assert_eq!(pool.bucket(&"mlb".into(), Difficulty::Easy).len(), 1);
    }

    #[test]
    fn test_pool_not_an_object() {
        let pool = QuestionPool::from_json(&json!([1, 2, 3]));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_merge_supplementary_pack() {
        let mut pool = QuestionPool::from_json(&json!({
            "nba": { "easy": [question(1)] }
        }));
        pool.merge_json(
            "nba".into(),
            &json!({ "easy": [question(2)], "hard": [question(3)] }),
        );

        assert_eq!(pool.bucket(&"nba".into(), Difficulty::Easy).len(), 2);
        assert_eq!(pool.bucket(&"nba".into(), Difficulty::Hard).len(), 1);
        // merged questions follow the originals
        assert_eq!(
            pool.bucket(&"nba".into(), Difficulty::Easy)[1].question(),
            "Question 2?"
        );
    }

    #[test]
    fn test_pool_from_json_str_rejects_non_json() {
        assert!(QuestionPool::from_json_str("{not json").is_err());
        let pool = QuestionPool::from_json_str(r#"{"mlb": {"easy": []}}"#).unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_insert() {
        let mut pool = QuestionPool::new();
        let record = QuestionRecord::new("Q?", vec!["A".into(), "B".into()], "A", None).unwrap();
        pool.insert("nfl".into(), Difficulty::Medium, vec![record.clone()]);
        pool.insert("nfl".into(), Difficulty::Medium, vec![]);

        assert_eq!(pool.bucket(&"nfl".into(), Difficulty::Medium), &[record]);
    }
}
