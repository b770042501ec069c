//! # Ball Knowers Game Library
//!
//! This library provides the core game logic for the Ball Knowers sports
//! trivia game. It handles question pools, quiz rounds with a countdown
//! timer, hints and streaks, the persisted high score list, and a
//! "21 Questions" deduction game. Rendering, real timers and storage belong
//! to the driver; the engines only expose synchronous transitions.
//!
//! ```
//! use ball_knowers::{
//!     game::{Game, Options, Phase},
//!     leaderboard::HighScores,
//!     storage::Preferences,
//!     trivia::{Difficulty, QuestionRecord, pool::QuestionPool, session::Action},
//! };
//!
//! let mut pool = QuestionPool::new();
//! let question = QuestionRecord::new(
//!     "Which team plays at Fenway Park?",
//!     vec!["Red Sox".to_owned(), "Yankees".to_owned()],
//!     "Red Sox",
//!     None,
//! )?;
//! pool.insert("mlb".into(), Difficulty::Medium, vec![question]);
//!
//! let mut game = Game::new(
//!     pool,
//!     Preferences::default(),
//!     HighScores::default(),
//!     Options::default(),
//! )?;
//! game.set_player_name("Pedro")?;
//! game.continue_to_sports()?;
//! game.continue_to_start()?;
//! game.start(|_alarm, _delay| {})?;
//! game.apply(Action::Answer(Some("Red Sox".to_owned())), |_alarm, _delay| {})?;
//! game.apply(Action::Advance, |_alarm, _delay| {})?;
//!
//! assert_eq!(game.phase(), Phase::Result);
//! assert_eq!(game.high_scores().entries()[0].score, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
use derive_where::derive_where;
use itertools::Itertools;
use serde::Serialize;

pub mod constants;

pub mod deduction;
pub mod game;
pub mod leaderboard;
pub mod names;
pub mod round_id;
pub mod storage;
pub mod trivia;

/// Outcomes reported back to the driver after a transition
///
/// Each operation produces one of these so the driver can render immediate
/// feedback without diffing the whole state.
#[derive(Debug, Serialize, Clone, PartialEq, derive_more::From)]
pub enum Outcome {
    /// Result of submitting an answer (or a timeout)
    Answer(trivia::session::AnswerOutcome),
    /// Result of moving past an answered question
    Advance(trivia::session::AdvanceOutcome),
    /// Result of one countdown step
    Tick(trivia::session::TickOutcome),
    /// Result of revealing a hint
    Hint(trivia::session::HintOutcome),
    /// Result of a clue reveal; `None` when no clue was left to reveal
    Clue(Option<deduction::ClueReveal>),
    /// Result of a guess in the deduction game
    Guess(deduction::GuessOutcome),
}

impl Outcome {
    /// Converts the outcome to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// A truncated vector that maintains the exact count while limiting displayed items
///
/// Leaderboards show a bounded number of rows while still reporting how
/// many entries matched, e.g. "14 scores" with only the top 10 listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[derive_where(Default)]
pub struct TruncatedVec<T> {
    /// The exact total count of items
    exact_count: usize,
    /// The truncated list of items (up to the limit)
    items: Vec<T>,
}

impl<T: Clone> TruncatedVec<T> {
    /// Creates a new truncated vector from an iterator
    ///
    /// # Arguments
    ///
    /// * `list` - An iterator over items to include
    /// * `limit` - Maximum number of items to include in the truncated vector
    /// * `exact_count` - The exact total count of items (may be larger than limit)
    pub fn new<I: Iterator<Item = T>>(list: I, limit: usize, exact_count: usize) -> Self {
        let items = list.take(limit).collect_vec();
        Self { exact_count, items }
    }

    /// Returns the exact count of items
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// Returns the truncated items
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

/// Shuffles a slice in place with the Fisher–Yates algorithm
///
/// Every permutation is equally likely given a uniform `rng`. Callers that
/// must not disturb their source copy it first.
pub fn shuffle<T>(items: &mut [T], rng: &mut fastrand::Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.usize(..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_vec_new() {
        let data = vec![1, 2, 3, 4, 5];
        let truncated = TruncatedVec::new(data.into_iter(), 3, 5);

        assert_eq!(truncated.exact_count(), 5);
        assert_eq!(truncated.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_vec_new_limit_larger_than_items() {
        let data = vec![1, 2, 3];
        let truncated = TruncatedVec::new(data.into_iter(), 5, 3);

        assert_eq!(truncated.exact_count(), 3);
        assert_eq!(truncated.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_vec_default_is_empty() {
        let truncated: TruncatedVec<String> = TruncatedVec::default();
        assert_eq!(truncated.exact_count(), 0);
        assert!(truncated.items().is_empty());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect_vec());
    }

    #[test]
    fn test_shuffle_handles_tiny_slices() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![42];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn test_shuffle_reaches_every_position() {
        // the first element must be able to land anywhere
        let mut rng = fastrand::Rng::with_seed(99);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let mut items = [0, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            let position = items.iter().position(|&x| x == 0).unwrap_or_default();
            seen[position] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_outcome_to_message() {
        let outcome = Outcome::Guess(deduction::GuessOutcome { correct: true });
        let json_str = outcome.to_message();

        assert!(json_str.contains("Guess"));
        assert!(json_str.contains("correct"));
    }
}
