//! "21 Questions" deduction game
//!
//! A secret player is drawn from a roster and the guesser uncovers yes/no
//! facts about them one clue at a time. Every reveal spends one unit of the
//! clue budget; guesses are free. The game ends on a correct guess, or is
//! lost once the clues or the budget run out.

use garde::Validate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Outcome, constants, shuffle};

/// A candidate secret: a name plus arbitrary JSON attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The name the guesser must produce
    pub name: String,
    /// Everything else known about the entity
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Entity {
    /// Looks up an attribute, treating `name` as one
    pub fn lookup(&self, attribute: &str) -> Option<Value> {
        if attribute == "name" {
            Some(Value::String(self.name.clone()))
        } else {
            self.attributes.get(attribute).cloned()
        }
    }
}

/// Deserializes a field that was present, keeping an explicit `null`
/// distinct from a missing key
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Strict equality of two possibly absent values; numbers compare by
/// value, so `3` matches `3.0`
#[allow(clippy::float_cmp)]
fn values_match(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (Some(Value::Number(actual)), Some(Value::Number(expected))) => {
            actual.as_f64() == expected.as_f64()
        }
        (actual, expected) => actual == expected,
    }
}

/// A yes/no question about the secret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueSpec {
    /// The question shown to the guesser
    pub text: String,
    /// Attribute of the secret the question is about
    pub attribute: String,
    /// The value that makes the answer "yes"; `None` when the key was
    /// absent, which only matches an absent attribute
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<Value>,
}

impl ClueSpec {
    /// Answers the clue for `entity`
    pub fn answer_for(&self, entity: &Entity) -> Answer {
        if values_match(
            entity.lookup(&self.attribute).as_ref(),
            self.expected_value.as_ref(),
        ) {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

/// Answer to a clue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// The secret has the expected value
    Yes,
    /// It does not
    No,
}

/// A clue that has been revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueReveal {
    /// The question text
    pub text: String,
    /// Its answer for the secret
    pub answer: Answer,
}

/// History entries are the same shape as the reveal outcome
pub type RevealedClue = ClueReveal;

/// Result of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuessOutcome {
    /// Whether the guess named the secret
    pub correct: bool,
}

/// Why a game was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// No clue or budget left to reveal
    Exhausted,
    /// A wrong guess was made with no budget left
    IncorrectFinalGuess,
}

/// Where a deduction game stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionPhase {
    /// Clues and guesses are accepted
    #[default]
    Active,
    /// The secret was guessed
    Won,
    /// The game ended without the secret being guessed
    Lost(LossReason),
}

/// Roster and clue deck as loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductionData {
    /// Candidate secrets
    pub players: Vec<Entity>,
    /// Clue deck
    pub questions: Vec<ClueSpec>,
}

impl DeductionData {
    /// Parses `{players, questions}` from JSON text
    ///
    /// # Errors
    ///
    /// Returns the `serde_json::Error` when the text does not have that shape.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Deduction game configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Clue reveals allowed before the game is lost
    #[garde(range(max = constants::deduction::MAX_GUESS_BUDGET))]
    guess_budget: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            guess_budget: constants::deduction::GUESS_BUDGET,
        }
    }
}

impl Options {
    /// Sets the clue budget
    #[must_use]
    pub fn with_guess_budget(mut self, guess_budget: u32) -> Self {
        self.guess_budget = guess_budget;
        self
    }

    /// Clue reveals allowed before the game is lost
    pub fn guess_budget(&self) -> u32 {
        self.guess_budget
    }
}

/// Errors reported by the deduction game
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The game has already ended
    #[error("game is over")]
    GameOver,
    /// The roster or the clue deck is empty
    #[error("no players or no clues to play with")]
    EmptyDeck,
    /// The guess was blank
    #[error("guess cannot be empty")]
    EmptyGuess,
    /// The options fall outside the configured bounds
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Inputs to a deduction game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionAction {
    /// Reveal the next clue
    RevealClue,
    /// Guess the secret's name
    Guess(String),
}

/// One deduction game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionSession {
    secret: Entity,
    clues: Vec<ClueSpec>,
    guesses_remaining: u32,
    next_clue: usize,
    phase: DeductionPhase,
    revealed: Vec<RevealedClue>,
}

impl DeductionSession {
    /// Draws a random secret and shuffles the clue deck
    ///
    /// # Errors
    ///
    /// * `Error::EmptyDeck` - `data` has no players or no clues
    /// * `Error::InvalidOptions` - `options` fall outside the allowed bounds
    pub fn new(
        data: &DeductionData,
        options: &Options,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, Error> {
        if data.players.is_empty() {
            return Err(Error::EmptyDeck);
        }

        let secret = data.players[rng.usize(..data.players.len())].clone();
        let mut clues = data.questions.clone();
        shuffle(&mut clues, rng);

        Self::with_secret(secret, clues, options)
    }

    /// Starts a game with a known secret, keeping the clue order as given
    ///
    /// # Errors
    ///
    /// * `Error::EmptyDeck` - `clues` is empty
    /// * `Error::InvalidOptions` - `options` fall outside the allowed bounds
    pub fn with_secret(
        secret: Entity,
        clues: Vec<ClueSpec>,
        options: &Options,
    ) -> Result<Self, Error> {
        options
            .validate()
            .map_err(|report| Error::InvalidOptions(report.to_string()))?;

        if clues.is_empty() {
            return Err(Error::EmptyDeck);
        }

        tracing::info!(clues = clues.len(), budget = options.guess_budget(), "deduction game started");

        Ok(Self {
            secret,
            clues,
            guesses_remaining: options.guess_budget(),
            next_clue: 0,
            phase: DeductionPhase::Active,
            revealed: Vec::new(),
        })
    }

    /// Reveals the next clue and spends one unit of budget
    ///
    /// Returns `Ok(None)` and ends the game when no clue or budget is left.
    ///
    /// # Errors
    ///
    /// `Error::GameOver` once the game has ended.
    pub fn reveal_next_clue(&mut self) -> Result<Option<ClueReveal>, Error> {
        if self.phase != DeductionPhase::Active {
            return Err(Error::GameOver);
        }

        let Some(clue) = self
            .clues
            .get(self.next_clue)
            .filter(|_| self.guesses_remaining > 0)
        else {
            tracing::debug!(next_clue = self.next_clue, "nothing left to reveal");
            self.phase = DeductionPhase::Lost(LossReason::Exhausted);
            return Ok(None);
        };

        let reveal = ClueReveal {
            text: clue.text.clone(),
            answer: clue.answer_for(&self.secret),
        };

        self.revealed.push(reveal.clone());
        self.guesses_remaining -= 1;
        self.next_clue += 1;

        if self.guesses_remaining == 0 {
            self.phase = DeductionPhase::Lost(LossReason::Exhausted);
        }

        Ok(Some(reveal))
    }

    /// Guesses the secret's name, ignoring case and surrounding whitespace
    ///
    /// A wrong guess costs nothing while budget remains.
    ///
    /// # Errors
    ///
    /// * `Error::GameOver` - the game has ended
    /// * `Error::EmptyGuess` - the guess is blank
    pub fn make_guess(&mut self, name: &str) -> Result<GuessOutcome, Error> {
        if self.phase != DeductionPhase::Active {
            return Err(Error::GameOver);
        }

        let guess = name.trim();
        if guess.is_empty() {
            return Err(Error::EmptyGuess);
        }

        let correct = guess.to_lowercase() == self.secret.name.trim().to_lowercase();

        if correct {
            self.phase = DeductionPhase::Won;
        } else if self.guesses_remaining == 0 {
            self.phase = DeductionPhase::Lost(LossReason::IncorrectFinalGuess);
        }

        tracing::debug!(correct, guesses_remaining = self.guesses_remaining, "guess made");

        Ok(GuessOutcome { correct })
    }

    /// Applies an action
    ///
    /// # Errors
    ///
    /// Any error of the underlying transition.
    pub fn apply(&mut self, action: DeductionAction) -> Result<Outcome, Error> {
        match action {
            DeductionAction::RevealClue => self.reveal_next_clue().map(Outcome::from),
            DeductionAction::Guess(name) => self.make_guess(&name).map(Outcome::from),
        }
    }

    /// Where the game stands
    pub fn phase(&self) -> DeductionPhase {
        self.phase
    }

    /// Whether the game has ended
    pub fn over(&self) -> bool {
        self.phase != DeductionPhase::Active
    }

    /// Whether the secret was guessed
    pub fn won(&self) -> bool {
        self.phase == DeductionPhase::Won
    }

    /// The secret, for the end-of-game message
    pub fn secret(&self) -> &Entity {
        &self.secret
    }

    /// Clue reveals still allowed
    pub fn guesses_remaining(&self) -> u32 {
        self.guesses_remaining
    }

    /// Clues revealed so far, oldest first
    pub fn revealed(&self) -> &[RevealedClue] {
        &self.revealed
    }

    /// The shuffled clue deck
    pub fn clues(&self) -> &[ClueSpec] {
        &self.clues
    }
}
