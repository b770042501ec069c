//! Configuration constants for the trivia and deduction engines
//!
//! This module contains the limits and defaults used throughout the crate.
//! Runtime options are validated against these bounds.

/// Quiz round configuration constants
pub mod quiz {
    /// Default number of questions drawn into a round
    pub const QUESTION_COUNT: usize = 10;
    /// Largest number of questions a round may be configured to draw
    pub const MAX_QUESTION_COUNT: usize = 50;
    /// Default seconds on the clock for each question
    pub const TIME_LIMIT: u32 = 15;
    /// Minimum configurable seconds per question
    pub const MIN_TIME_LIMIT: u32 = 5;
    /// Maximum configurable seconds per question
    pub const MAX_TIME_LIMIT: u32 = 120;
    /// Default number of hints available for a whole round
    pub const HINT_BUDGET: u32 = 3;
    /// Maximum configurable hint budget
    pub const MAX_HINT_BUDGET: u32 = 10;
    /// Default pause in milliseconds between an answer and the next question
    pub const QUESTION_DELAY_MS: u64 = 2000;
    /// Maximum configurable pause in milliseconds after an answer
    pub const MAX_QUESTION_DELAY_MS: u64 = 10_000;
    /// Default period in milliseconds of the countdown timer
    pub const TICK_PERIOD_MS: u64 = 1000;
    /// Shortest configurable countdown period in milliseconds
    pub const MIN_TICK_PERIOD_MS: u64 = 100;
    /// Longest configurable countdown period in milliseconds
    pub const MAX_TICK_PERIOD_MS: u64 = 5000;
}

/// Question record constants
pub mod question {
    /// Minimum number of options a question must offer
    pub const MIN_OPTIONS: usize = 2;
    /// Maximum number of options a question may offer
    pub const MAX_OPTIONS: usize = 8;
    /// Maximum length of the question text
    pub const MAX_TEXT_LENGTH: usize = 500;
    /// Maximum length of a single option or hint
    pub const MAX_OPTION_LENGTH: usize = 200;
}

/// High score constants
pub mod high_scores {
    /// Number of entries kept in the persisted global list
    pub const CAPACITY: usize = 20;
    /// Number of entries shown on a per-sport leaderboard
    pub const SPORT_LIMIT: usize = 10;
    /// Number of entries shown on the welcome screen
    pub const MINI_LIMIT: usize = 3;
    /// Name recorded when the player never entered one
    pub const ANONYMOUS: &str = "Anonymous";
}

/// Player name constants
pub mod player_name {
    /// Maximum length of a player name in characters
    pub const MAX_LENGTH: usize = 20;
}

/// Deduction game constants
pub mod deduction {
    /// Default number of clue reveals before the game is lost
    pub const GUESS_BUDGET: u32 = 21;
    /// Maximum configurable clue budget
    pub const MAX_GUESS_BUDGET: u32 = 100;
}

/// Keys used in the external key-value store
pub mod storage {
    /// Display name of the player
    pub const PLAYER_NAME_KEY: &str = "sports-trivia-player-name";
    /// Preferred difficulty
    pub const DIFFICULTY_KEY: &str = "sports-trivia-difficulty";
    /// Last selected sport
    pub const SPORT_KEY: &str = "sports-trivia-selected-sport";
    /// JSON array of high score entries
    pub const HIGH_SCORES_KEY: &str = "sports-trivia-high-scores";
}
