//! Screen flow and round orchestration
//!
//! This module contains the `Game` struct that walks a player from the
//! welcome screen through sport and difficulty selection into a quiz round
//! and back. It owns the question pool, the player's preferences and the
//! high score list, and forwards in-round actions and alarms to the live
//! [`Session`].

use std::{fmt::Display, time::Duration};

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    Outcome, TruncatedVec, constants,
    leaderboard::{HighScoreEntry, HighScores},
    names::{self, PlayerName},
    round_id::RoundId,
    storage::{Preferences, Store},
    trivia::{
        self, Difficulty, SportId,
        pool::QuestionPool,
        session::{Action, Alarm, Session},
    },
};

/// The screen the player is currently on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Name entry and the mini leaderboard
    #[default]
    Welcome,
    /// Picking a sport
    SportSelect,
    /// Picking a difficulty before the round begins
    Start,
    /// A round is in progress
    Playing,
    /// The score screen of a finished round
    Result,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Welcome => "welcome",
            Self::SportSelect => "sport select",
            Self::Start => "start",
            Self::Playing => "playing",
            Self::Result => "result",
        })
    }
}

/// Checks a duration against millisecond bounds
fn validate_millis<const MIN_MS: u64, const MAX_MS: u64>(
    field: &'static str,
    val: &Duration,
) -> garde::Result {
    if (u128::from(MIN_MS)..=u128::from(MAX_MS)).contains(&val.as_millis()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "{field} is outside of the bounds [{MIN_MS},{MAX_MS}] ms",
        )))
    }
}

fn validate_question_delay(val: &Duration) -> garde::Result {
    validate_millis::<0, { constants::quiz::MAX_QUESTION_DELAY_MS }>("question_delay", val)
}

fn validate_tick_period(val: &Duration) -> garde::Result {
    validate_millis::<
        { constants::quiz::MIN_TICK_PERIOD_MS },
        { constants::quiz::MAX_TICK_PERIOD_MS },
    >("tick_period", val)
}

/// Round configuration
///
/// Every field may be omitted when deserializing; missing ones take the
/// default value.
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Questions drawn into each round
    #[garde(range(min = 1, max = constants::quiz::MAX_QUESTION_COUNT))]
    question_count: usize,
    /// Seconds on the clock for each question
    #[garde(range(min = constants::quiz::MIN_TIME_LIMIT, max = constants::quiz::MAX_TIME_LIMIT))]
    time_limit: u32,
    /// Hints available across a whole round
    #[garde(range(max = constants::quiz::MAX_HINT_BUDGET))]
    hint_budget: u32,
    /// Pause between an answer and the next question
    #[garde(custom(|v, _| validate_question_delay(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    question_delay: Duration,
    /// Period of the countdown
    #[garde(custom(|v, _| validate_tick_period(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    tick_period: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            question_count: constants::quiz::QUESTION_COUNT,
            time_limit: constants::quiz::TIME_LIMIT,
            hint_budget: constants::quiz::HINT_BUDGET,
            question_delay: Duration::from_millis(constants::quiz::QUESTION_DELAY_MS),
            tick_period: Duration::from_millis(constants::quiz::TICK_PERIOD_MS),
        }
    }
}

impl Options {
    /// Sets the number of questions per round
    #[must_use]
    pub fn with_question_count(mut self, question_count: usize) -> Self {
        self.question_count = question_count;
        self
    }

    /// Sets the seconds allowed per question
    #[must_use]
    pub fn with_time_limit(mut self, time_limit: u32) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Sets the hint budget of a round
    #[must_use]
    pub fn with_hint_budget(mut self, hint_budget: u32) -> Self {
        self.hint_budget = hint_budget;
        self
    }

    /// Sets the pause after an answer
    #[must_use]
    pub fn with_question_delay(mut self, question_delay: Duration) -> Self {
        self.question_delay = question_delay;
        self
    }

    /// Sets the countdown period
    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Questions drawn into each round
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Seconds on the clock for each question
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    /// Hints available across a whole round
    pub fn hint_budget(&self) -> u32 {
        self.hint_budget
    }

    /// Pause between an answer and the next question
    pub fn question_delay(&self) -> Duration {
        self.question_delay
    }

    /// Period of the countdown
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }
}

/// Errors reported by screen transitions
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation belongs to another screen
    #[error("expected the {expected} screen, currently on {actual}")]
    WrongPhase {
        /// Screen the operation is valid on
        expected: Phase,
        /// Screen the game is on
        actual: Phase,
    },
    /// The sport has no questions loaded
    #[error("sport {0} is not available")]
    UnknownSport(SportId),
    /// The player name was rejected
    #[error("invalid player name: {0}")]
    InvalidName(#[from] names::Error),
    /// The question pool has no sport with questions
    #[error("no sports available")]
    NoSportsAvailable,
    /// The round options fall outside the configured bounds
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    /// The live round rejected the operation
    #[error(transparent)]
    Round(#[from] trivia::Error),
}

/// The whole trivia game
///
/// Menu screens are tracked here; once a round starts the current phase is
/// the one of the live session.
#[derive(Debug, Clone)]
pub struct Game {
    pool: QuestionPool,
    available_sports: Vec<SportId>,
    player_name: Option<PlayerName>,
    sport: SportId,
    difficulty: Difficulty,
    options: Options,
    menu: Phase,
    session: Option<Session>,
    high_scores: HighScores,
    rng: fastrand::Rng,
}

impl Game {
    /// Creates a game on the welcome screen
    ///
    /// A saved sport that is no longer available falls back to the first
    /// available one.
    ///
    /// # Errors
    ///
    /// * `Error::NoSportsAvailable` - the pool has no questions at all
    /// * `Error::InvalidOptions` - `options` fall outside the allowed bounds
    pub fn new(
        pool: QuestionPool,
        preferences: Preferences,
        high_scores: HighScores,
        options: Options,
    ) -> Result<Self, Error> {
        options
            .validate()
            .map_err(|report| Error::InvalidOptions(report.to_string()))?;

        let available_sports = pool.available_sports();
        let sport = preferences
            .sport
            .filter(|sport| available_sports.contains(sport))
            .or_else(|| available_sports.first().cloned())
            .ok_or(Error::NoSportsAvailable)?;

        tracing::debug!(sports = available_sports.len(), questions = pool.len(), "game created");

        Ok(Self {
            pool,
            available_sports,
            player_name: preferences.player_name,
            sport,
            difficulty: preferences.difficulty,
            options,
            menu: Phase::Welcome,
            session: None,
            high_scores,
            rng: fastrand::Rng::new(),
        })
    }

    /// Creates a game from the preferences and high scores held in `store`
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn load(pool: QuestionPool, store: &impl Store, options: Options) -> Result<Self, Error> {
        let preferences = Preferences::load(store, &pool.available_sports());
        let high_scores = HighScores::load(store);
        Self::new(pool, preferences, high_scores, options)
    }

    /// Writes preferences and high scores to `store`
    pub fn save(&self, store: &mut impl Store) {
        self.preferences().save(store);
        self.high_scores.save(store);
    }

    /// Replaces the random source used to draw questions
    #[must_use]
    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = rng;
        self
    }

    /// The screen the player is on
    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(self.menu, Session::phase)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), Error> {
        let actual = self.phase();
        if actual == expected {
            Ok(())
        } else {
            Err(Error::WrongPhase { expected, actual })
        }
    }

    /// Sets the player's display name
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - not on the welcome screen
    /// * `Error::InvalidName` - the name fails validation; the previous
    ///   name is kept
    pub fn set_player_name(&mut self, raw: &str) -> Result<(), Error> {
        self.expect_phase(Phase::Welcome)?;
        self.player_name = Some(PlayerName::new(raw)?);
        Ok(())
    }

    /// Leaves the welcome screen
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - not on the welcome screen
    /// * `Error::InvalidName` - no name has been entered
    pub fn continue_to_sports(&mut self) -> Result<(), Error> {
        self.expect_phase(Phase::Welcome)?;
        if self.player_name.is_none() {
            return Err(names::Error::Empty.into());
        }
        self.menu = Phase::SportSelect;
        Ok(())
    }

    /// Picks the sport for the next round
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - not on the sport selection screen
    /// * `Error::UnknownSport` - the sport has no questions
    pub fn choose_sport(&mut self, sport: SportId) -> Result<(), Error> {
        self.expect_phase(Phase::SportSelect)?;
        if !self.available_sports.contains(&sport) {
            return Err(Error::UnknownSport(sport));
        }
        tracing::debug!(%sport, "sport chosen");
        self.sport = sport;
        Ok(())
    }

    /// Moves from sport selection to the start screen
    ///
    /// # Errors
    ///
    /// `Error::WrongPhase` when not on the sport selection screen.
    pub fn continue_to_start(&mut self) -> Result<(), Error> {
        self.expect_phase(Phase::SportSelect)?;
        self.menu = Phase::Start;
        Ok(())
    }

    /// Changes the difficulty of the next round
    ///
    /// # Errors
    ///
    /// `Error::WrongPhase` when not on the start screen.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Result<(), Error> {
        self.expect_phase(Phase::Start)?;
        self.difficulty = difficulty;
        Ok(())
    }

    /// Starts a round with the chosen sport and difficulty
    ///
    /// The first countdown alarm is requested through `schedule_message`.
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - not on the start screen
    /// * `Error::Round` - the bucket is empty; the game stays on the start
    ///   screen
    pub fn start<S: FnMut(Alarm, Duration)>(
        &mut self,
        schedule_message: S,
    ) -> Result<RoundId, Error> {
        self.expect_phase(Phase::Start)?;

        let session = Session::new(
            &self.pool,
            &self.sport,
            self.difficulty,
            self.player_name.clone(),
            &self.options,
            &mut self.rng,
        )?;
        session.play(schedule_message);

        let id = session.id();
        self.session = Some(session);
        Ok(id)
    }

    /// Returns to sport selection from the start or result screen
    ///
    /// # Errors
    ///
    /// `Error::WrongPhase` when a round is in progress or the player is
    /// still on the welcome or sport selection screen.
    pub fn back_to_sports(&mut self) -> Result<(), Error> {
        match self.phase() {
            Phase::Start | Phase::Result => {
                self.session = None;
                self.menu = Phase::SportSelect;
                Ok(())
            }
            actual => Err(Error::WrongPhase {
                expected: Phase::Start,
                actual,
            }),
        }
    }

    /// Abandons whatever is on screen and returns to sport selection
    ///
    /// The round is dropped, so alarms it scheduled become stale.
    ///
    /// # Errors
    ///
    /// `Error::WrongPhase` on the welcome screen, which must be left
    /// through [`Self::continue_to_sports`].
    pub fn reset_game(&mut self) -> Result<(), Error> {
        let actual = self.phase();
        if actual == Phase::Welcome {
            return Err(Error::WrongPhase {
                expected: Phase::Playing,
                actual,
            });
        }
        if let Some(session) = self.session.take() {
            tracing::debug!(round = %session.id(), "round abandoned");
        }
        self.menu = Phase::SportSelect;
        Ok(())
    }

    /// Forwards an in-round action to the live session
    ///
    /// # Errors
    ///
    /// * `Error::WrongPhase` - no round has been started
    /// * `Error::Round` - the session rejected the action
    pub fn apply<S: FnMut(Alarm, Duration)>(
        &mut self,
        action: Action,
        schedule_message: S,
    ) -> Result<Outcome, Error> {
        let actual = self.phase();
        let Some(session) = self.session.as_mut() else {
            return Err(Error::WrongPhase {
                expected: Phase::Playing,
                actual,
            });
        };
        Ok(session.apply(action, &mut self.high_scores, schedule_message)?)
    }

    /// Delivers an alarm to the live session
    ///
    /// # Errors
    ///
    /// `Error::Round(trivia::Error::StaleAlarm)` when the alarm belongs to a
    /// round that is no longer live, or no longer applies to it.
    pub fn receive_alarm<S: FnMut(Alarm, Duration)>(
        &mut self,
        alarm: &Alarm,
        schedule_message: S,
    ) -> Result<Vec<Outcome>, Error> {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(?alarm, "alarm arrived without a live round");
            return Err(trivia::Error::StaleAlarm.into());
        };
        Ok(session.receive_alarm(alarm, &mut self.high_scores, schedule_message)?)
    }

    /// The loaded questions
    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    /// Sports that have questions, in display order
    pub fn available_sports(&self) -> &[SportId] {
        &self.available_sports
    }

    /// The player's display name, if entered
    pub fn player_name(&self) -> Option<&PlayerName> {
        self.player_name.as_ref()
    }

    /// The sport of the next or current round
    pub fn sport(&self) -> &SportId {
        &self.sport
    }

    /// The difficulty of the next or current round
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Round configuration
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The live or finished round
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Every recorded score
    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Snapshot of what should persist between visits
    pub fn preferences(&self) -> Preferences {
        Preferences {
            player_name: self.player_name.clone(),
            sport: Some(self.sport.clone()),
            difficulty: self.difficulty,
        }
    }

    /// Top scores of the selected sport
    pub fn sport_leaderboard(&self) -> TruncatedVec<HighScoreEntry> {
        self.high_scores
            .sport_leaderboard(&self.sport, constants::high_scores::SPORT_LIMIT)
    }

    /// Top scores across all sports for the welcome screen
    pub fn mini_leaderboard(&self) -> TruncatedVec<HighScoreEntry> {
        self.high_scores.top(constants::high_scores::MINI_LIMIT)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{
        storage::MemoryStore,
        trivia::{
            QuestionRecord,
            session::{AdvanceOutcome, AnswerOutcome},
        },
    };

    fn create_test_pool() -> QuestionPool {
        let mut pool = QuestionPool::new();
        let records = |count: usize, sport: &str| {
            (1..=count)
                .map(|n| {
                    QuestionRecord::new(
                        format!("{sport} question {n}?"),
                        vec!["Yes".to_owned(), "No".to_owned()],
                        "Yes",
                        None,
                    )
                    .unwrap()
                })
                .collect()
        };
        pool.insert("mlb".into(), Difficulty::Easy, records(12, "mlb"));
        pool.insert("nba".into(), Difficulty::Medium, records(3, "nba"));
        pool
    }

    fn create_test_game() -> Game {
        Game::new(
            create_test_pool(),
            Preferences::default(),
            HighScores::default(),
            Options::default(),
        )
        .unwrap()
        .with_rng(fastrand::Rng::with_seed(11))
    }

    fn no_schedule(_alarm: Alarm, _delay: Duration) {}

    /// Walks a fresh game to the start screen for `sport`
    fn to_start(game: &mut Game, sport: &str, difficulty: Difficulty) {
        game.set_player_name("Jackie").unwrap();
        game.continue_to_sports().unwrap();
        game.choose_sport(sport.into()).unwrap();
        game.continue_to_start().unwrap();
        game.change_difficulty(difficulty).unwrap();
    }

    #[test]
    fn test_new_rejects_empty_pool() {
        let result = Game::new(
            QuestionPool::new(),
            Preferences::default(),
            HighScores::default(),
            Options::default(),
        );
        assert_eq!(result.unwrap_err(), Error::NoSportsAvailable);
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let result = Game::new(
            create_test_pool(),
            Preferences::default(),
            HighScores::default(),
            Options::default().with_time_limit(1),
        );
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_new_falls_back_to_first_sport() {
        let preferences = Preferences {
            sport: Some("cricket".into()),
            ..Preferences::default()
        };
        let game = Game::new(
            create_test_pool(),
            preferences,
            HighScores::default(),
            Options::default(),
        )
        .unwrap();

        assert_eq!(game.sport(), &SportId::from("mlb"));
        assert_eq!(game.difficulty(), Difficulty::Medium);
        assert_eq!(game.phase(), Phase::Welcome);
    }

    #[test]
    fn test_continue_requires_name() {
        let mut game = create_test_game();
        assert_eq!(
            game.continue_to_sports(),
            Err(Error::InvalidName(names::Error::Empty))
        );
        assert_eq!(
            game.set_player_name("   "),
            Err(Error::InvalidName(names::Error::Empty))
        );
        assert_eq!(game.phase(), Phase::Welcome);

        game.set_player_name("  Jackie  ").unwrap();
        assert_eq!(game.player_name().map(PlayerName::as_str), Some("Jackie"));
        game.continue_to_sports().unwrap();
        assert_eq!(game.phase(), Phase::SportSelect);
    }

    #[test]
    fn test_choose_unknown_sport() {
        let mut game = create_test_game();
        game.set_player_name("Jackie").unwrap();
        game.continue_to_sports().unwrap();

        assert_eq!(
            game.choose_sport("cricket".into()),
            Err(Error::UnknownSport("cricket".into()))
        );
        assert_eq!(game.sport(), &SportId::from("mlb"));
    }

    #[test]
    fn test_screen_operations_check_phase() {
        let mut game = create_test_game();
        assert_eq!(
            game.change_difficulty(Difficulty::Hard),
            Err(Error::WrongPhase {
                expected: Phase::Start,
                actual: Phase::Welcome
            })
        );
        assert!(matches!(
            game.start(no_schedule),
            Err(Error::WrongPhase { .. })
        ));
        assert!(matches!(
            game.apply(Action::Tick, no_schedule),
            Err(Error::WrongPhase { .. })
        ));
        assert!(matches!(game.reset_game(), Err(Error::WrongPhase { .. })));
        assert!(matches!(game.back_to_sports(), Err(Error::WrongPhase { .. })));
    }

    #[test]
    fn test_start_with_empty_bucket_stays_on_start() {
        let mut game = create_test_game();
        to_start(&mut game, "mlb", Difficulty::Hard);

        let result = game.start(no_schedule);
        assert_eq!(
            result,
            Err(Error::Round(trivia::Error::EmptyPool {
                sport: "mlb".into(),
                difficulty: Difficulty::Hard
            }))
        );
        assert_eq!(game.phase(), Phase::Start);
        assert!(game.session().is_none());
    }

    #[test]
    fn test_full_round_through_game() {
        let mut game = create_test_game();
        to_start(&mut game, "mlb", Difficulty::Easy);

        let mut scheduled = Vec::new();
        let round = game.start(|alarm, _| scheduled.push(alarm)).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().map(|s| s.questions().len()), Some(10));
        assert_eq!(scheduled, vec![Alarm::Tick { round, index: 0 }]);

        let first = game
            .apply(Action::Answer(Some("Yes".to_owned())), no_schedule)
            .unwrap();
        assert!(matches!(
            first,
            Outcome::Answer(AnswerOutcome {
                is_correct: true,
                ..
            })
        ));
        game.apply(Action::Advance, no_schedule).unwrap();

        game.apply(Action::Answer(Some("No".to_owned())), no_schedule)
            .unwrap();
        let session = game.session().unwrap();
        assert_eq!(session.score(), 1);
        assert_eq!(session.streak(), 0);

        game.apply(Action::Advance, no_schedule).unwrap();
        for _ in 2..10 {
            game.apply(Action::AnswerOption(0), no_schedule).unwrap();
            game.apply(Action::Advance, no_schedule).unwrap();
        }

        assert_eq!(game.phase(), Phase::Result);
        assert_eq!(game.high_scores().len(), 1);
        assert_eq!(game.high_scores().entries()[0].score, 9);
        assert_eq!(game.sport_leaderboard().exact_count(), 1);
        assert_eq!(game.mini_leaderboard().items()[0].name, "Jackie");

        game.back_to_sports().unwrap();
        assert_eq!(game.phase(), Phase::SportSelect);
        assert!(game.session().is_none());
    }

    #[test]
    fn test_alarm_driven_round_finishes() {
        let mut game = create_test_game();
        to_start(&mut game, "nba", Difficulty::Medium);

        let mut pending = Vec::new();
        game.start(|alarm, _| pending.push(alarm)).unwrap();

        while let Some(alarm) = pending.pop() {
            game.receive_alarm(&alarm, |next, _| pending.push(next))
                .unwrap();
        }

        assert_eq!(game.phase(), Phase::Result);
        assert_eq!(game.high_scores().entries()[0].score, 0);
    }

    #[test]
    fn test_reset_makes_alarms_stale() {
        let mut game = create_test_game();
        to_start(&mut game, "mlb", Difficulty::Easy);

        let mut pending = Vec::new();
        game.start(|alarm, _| pending.push(alarm)).unwrap();
        game.reset_game().unwrap();
        assert_eq!(game.phase(), Phase::SportSelect);

        assert_eq!(
            game.receive_alarm(&pending[0], no_schedule),
            Err(Error::Round(trivia::Error::StaleAlarm))
        );

        game.continue_to_start().unwrap();
        game.start(no_schedule).unwrap();
        assert_eq!(
            game.receive_alarm(&pending[0], no_schedule),
            Err(Error::Round(trivia::Error::StaleAlarm))
        );
        assert_eq!(game.session().map(Session::time_remaining), Some(15));
    }

    #[test]
    fn test_round_errors_surface_unchanged() {
        let mut game = create_test_game();
        to_start(&mut game, "mlb", Difficulty::Easy);
        game.start(no_schedule).unwrap();

        assert_eq!(
            game.apply(Action::Advance, no_schedule),
            Err(Error::Round(trivia::Error::NotAnswered))
        );
        assert!(matches!(
            game.apply(Action::Tick, no_schedule),
            Ok(Outcome::Tick(_))
        ));
    }

    #[test]
    fn test_back_to_sports_not_allowed_mid_round() {
        let mut game = create_test_game();
        to_start(&mut game, "mlb", Difficulty::Easy);
        game.start(no_schedule).unwrap();

        assert_eq!(
            game.back_to_sports(),
            Err(Error::WrongPhase {
                expected: Phase::Start,
                actual: Phase::Playing
            })
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut game = create_test_game();
        to_start(&mut game, "nba", Difficulty::Medium);
        game.start(no_schedule).unwrap();
        for _ in 0..3 {
            game.apply(Action::AnswerOption(0), no_schedule).unwrap();
            if let Outcome::Advance(AdvanceOutcome::Finished { rank, .. }) =
                game.apply(Action::Advance, no_schedule).unwrap()
            {
                assert_eq!(rank, Some(0));
            }
        }

        let mut store = MemoryStore::default();
        game.save(&mut store);

        let restored = Game::load(create_test_pool(), &store, Options::default()).unwrap();
        assert_eq!(restored.player_name().map(PlayerName::as_str), Some("Jackie"));
        assert_eq!(restored.sport(), &SportId::from("nba"));
        assert_eq!(restored.difficulty(), Difficulty::Medium);
        assert_eq!(restored.high_scores(), game.high_scores());
        assert_eq!(restored.phase(), Phase::Welcome);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: Options = serde_json::from_str(r#"{"question_count": 5}"#).unwrap();
        assert_eq!(options.question_count(), 5);
        assert_eq!(options.time_limit(), 15);
        assert_eq!(options.question_delay(), Duration::from_secs(2));
        assert!(options.validate().is_ok());

        let options: Options = serde_json::from_str(r#"{"question_delay": 60000}"#).unwrap();
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_options_zero_hint_budget_allowed() {
        let options = Options::default().with_hint_budget(0);
        assert!(options.validate().is_ok());
        assert!(Options::default().with_hint_budget(11).validate().is_err());
        assert!(
            Options::default()
                .with_tick_period(Duration::from_millis(10))
                .validate()
                .is_err()
        );
    }
}
