//! Trivia questions and quiz rounds
//!
//! This module contains the question data model, the question pool the
//! driver loads, and the per-round quiz state machine with its answer,
//! advance, tick and hint transitions.

use serde::Serialize;
use thiserror::Error;

pub mod pool;
pub mod question;
pub mod session;

pub use question::{Difficulty, QuestionRecord, SportId};

/// Errors reported by quiz round transitions
///
/// Every transition that returns an error leaves the round exactly as it
/// was, so the driver may ignore them.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The chosen sport and difficulty have no questions
    #[error("no {difficulty} questions available for {sport}")]
    EmptyPool {
        /// Sport that was requested
        sport: SportId,
        /// Difficulty that was requested
        difficulty: Difficulty,
    },
    /// The round has already reached its result screen
    #[error("round is not in play")]
    NotPlaying,
    /// The current question already has an answer
    #[error("question already answered")]
    AlreadyAnswered,
    /// Advancing requires the current question to be answered first
    #[error("question not answered yet")]
    NotAnswered,
    /// The countdown already reached zero
    #[error("timer already expired")]
    TimerExpired,
    /// Every hint of the round has been used
    #[error("no hints left")]
    HintBudgetExceeded,
    /// The hint for the current question is already shown
    #[error("hint already visible")]
    HintAlreadyVisible,
    /// The option index does not exist on the current question
    #[error("question has no option {0}")]
    NoSuchOption(usize),
    /// An alarm was scheduled by a round or question that is no longer current
    #[error("alarm no longer applies")]
    StaleAlarm,
    /// The round options fall outside the configured bounds
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
