//! Quiz round state machine
//!
//! A `Session` is one round of play: a shuffled subset of a difficulty
//! bucket, answered one question at a time against a countdown. The round
//! never owns a timer. Transitions are plain method calls, and the optional
//! scheduling helpers ask the driver to call back later through an
//! [`Alarm`] stamped with the round id and question index, so a callback
//! that outlives its question is recognised and ignored.

use std::time::Duration;

use chrono::Utc;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    Outcome,
    game::{Options, Phase},
    leaderboard::{HighScoreEntry, HighScores},
    names::{self, PlayerName},
    round_id::RoundId,
    shuffle,
};

use super::{
    Error,
    pool::QuestionPool,
    question::{Difficulty, QuestionRecord, SportId},
};

/// What the player did with the current question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// The question is still open
    #[default]
    None,
    /// The player picked this option
    Chosen(String),
    /// The countdown ran out
    TimedOut,
}

impl Selection {
    /// The chosen option, if the player picked one
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Chosen(answer) => Some(answer),
            Self::None | Self::TimedOut => None,
        }
    }
}

/// Delayed callbacks a round asks the driver to deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alarm {
    /// One second of the countdown has elapsed
    Tick {
        /// Round that scheduled the alarm
        round: RoundId,
        /// Question the countdown belongs to
        index: usize,
    },
    /// The pause after an answer is over
    Advance {
        /// Round that scheduled the alarm
        round: RoundId,
        /// Question that was answered
        index: usize,
    },
}

impl Alarm {
    /// Round the alarm belongs to
    pub fn round(&self) -> RoundId {
        match self {
            Self::Tick { round, .. } | Self::Advance { round, .. } => *round,
        }
    }

    /// Question index the alarm belongs to
    pub fn index(&self) -> usize {
        match self {
            Self::Tick { index, .. } | Self::Advance { index, .. } => *index,
        }
    }
}

/// Player and timer inputs to a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Submit an option by value; `None` is a timeout
    Answer(Option<String>),
    /// Submit an option by its position (the 1-4 keyboard shortcut)
    AnswerOption(usize),
    /// Reveal the hint for the current question
    Hint,
    /// Advance the countdown by one second
    Tick,
    /// Move past the answered question
    Advance,
}

/// Feedback for a submitted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    /// Index of the answered question
    pub index: usize,
    /// Whether the submission scored
    pub is_correct: bool,
    /// The option that would have scored
    pub correct_answer: String,
}

/// Result of moving past an answered question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AdvanceOutcome {
    /// The next question is now current
    NextQuestion {
        /// Index of the new current question
        index: usize,
    },
    /// The last question was resolved and the round is over
    Finished {
        /// The score recorded for this round
        entry: HighScoreEntry,
        /// Position in the high score list, if the entry made the cut
        rank: Option<usize>,
    },
}

/// Result of one countdown step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickOutcome {
    /// Seconds left after the step
    pub time_remaining: u32,
    /// Whether the countdown reached zero
    pub expired: bool,
}

/// Result of revealing a hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HintOutcome {
    /// The hint text; `None` when the question has none and the driver
    /// should show its own fallback
    pub hint: Option<String>,
    /// Hints still available in this round
    pub hints_left: u32,
}

/// Coarse rating of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Performance {
    /// At least 80% correct
    Excellent,
    /// At least 60% correct
    Good,
    /// At least 40% correct
    Average,
    /// Below 40% correct
    Poor,
}

impl Performance {
    /// Rates `score` correct answers out of `total` questions
    pub fn from_score(score: u32, total: usize) -> Self {
        if total == 0 {
            return Self::Poor;
        }
        let percent = score as usize * 100;
        if percent >= 80 * total {
            Self::Excellent
        } else if percent >= 60 * total {
            Self::Good
        } else if percent >= 40 * total {
            Self::Average
        } else {
            Self::Poor
        }
    }
}

/// One round of the quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: RoundId,
    phase: Phase,
    sport: SportId,
    difficulty: Difficulty,
    questions: Vec<QuestionRecord>,
    current_index: usize,
    score: u32,
    streak: u32,
    best_streak: u32,
    time_remaining: u32,
    selection: Selection,
    hints_used: u32,
    hint_visible: bool,
    player_name: Option<PlayerName>,
    options: Options,
}

impl Session {
    /// Builds a round from the `sport`/`difficulty` bucket of `pool`
    ///
    /// The bucket is copied and shuffled, then cut down to the configured
    /// question count. The pool itself is never modified.
    ///
    /// # Errors
    ///
    /// * `Error::EmptyPool` - the bucket is missing or has no questions
    /// * `Error::InvalidOptions` - `options` fall outside the allowed bounds
    pub fn new(
        pool: &QuestionPool,
        sport: &SportId,
        difficulty: Difficulty,
        player_name: Option<PlayerName>,
        options: &Options,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, Error> {
        options
            .validate()
            .map_err(|report| Error::InvalidOptions(report.to_string()))?;

        let bucket = pool.bucket(sport, difficulty);
        if bucket.is_empty() {
            tracing::warn!(%sport, %difficulty, "cannot start a round without questions");
            return Err(Error::EmptyPool {
                sport: sport.clone(),
                difficulty,
            });
        }

        let mut questions = bucket.to_vec();
        shuffle(&mut questions, rng);
        questions.truncate(options.question_count());

        let session = Self {
            id: RoundId::new(),
            phase: Phase::Playing,
            sport: sport.clone(),
            difficulty,
            questions,
            current_index: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            time_remaining: options.time_limit(),
            selection: Selection::None,
            hints_used: 0,
            hint_visible: false,
            player_name,
            options: *options,
        };

        tracing::info!(
            round = %session.id,
            %sport,
            %difficulty,
            questions = session.questions.len(),
            "round started"
        );

        Ok(session)
    }

    /// Starts the countdown of the current question
    ///
    /// Asks the driver for the first tick alarm. Calling it again on the
    /// same question schedules a duplicate chain, so drivers call it once
    /// per round.
    pub fn play<S: FnMut(Alarm, Duration)>(&self, mut schedule_message: S) {
        if self.phase == Phase::Playing && !self.answered() {
            self.schedule_tick(&mut schedule_message);
        }
    }

    /// Submits an answer for the current question
    ///
    /// `None` means the countdown ran out and always scores as incorrect.
    /// The round stays on the same question; use [`Self::advance`] to move on.
    ///
    /// # Errors
    ///
    /// * `Error::NotPlaying` - the round is over
    /// * `Error::AlreadyAnswered` - the question already has an answer
    pub fn submit_answer(&mut self, answer: Option<&str>) -> Result<AnswerOutcome, Error> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        if self.answered() {
            return Err(Error::AlreadyAnswered);
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return Err(Error::NotPlaying);
        };

        let is_correct = answer.is_some_and(|answer| question.is_correct(answer));
        let correct_answer = question.correct_answer().to_owned();

        self.selection = match answer {
            Some(answer) => Selection::Chosen(answer.to_owned()),
            None => Selection::TimedOut,
        };

        if is_correct {
            self.score += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        tracing::debug!(
            round = %self.id,
            index = self.current_index,
            is_correct,
            timed_out = answer.is_none(),
            score = self.score,
            streak = self.streak,
            "answer submitted"
        );

        Ok(AnswerOutcome {
            index: self.current_index,
            is_correct,
            correct_answer,
        })
    }

    /// Submits the option at `index` of the current question
    ///
    /// # Errors
    ///
    /// * `Error::NoSuchOption` - the question has fewer options
    /// * any error of [`Self::submit_answer`]
    pub fn answer_option(&mut self, index: usize) -> Result<AnswerOutcome, Error> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        let option = self
            .current_question()
            .and_then(|question| question.options().get(index))
            .cloned()
            .ok_or(Error::NoSuchOption(index))?;
        self.submit_answer(Some(&option))
    }

    /// Moves past the answered question
    ///
    /// On the last question this records the round in `high_scores` and
    /// switches to the result phase. The recorded score is read from the
    /// round at this moment, so the final answer is always included.
    ///
    /// # Errors
    ///
    /// * `Error::NotPlaying` - the round is over
    /// * `Error::NotAnswered` - the current question is still open
    pub fn advance(&mut self, high_scores: &mut HighScores) -> Result<AdvanceOutcome, Error> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        if !self.answered() {
            return Err(Error::NotAnswered);
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.selection = Selection::None;
            self.time_remaining = self.options.time_limit();
            self.hint_visible = false;

            tracing::debug!(round = %self.id, index = self.current_index, "next question");

            return Ok(AdvanceOutcome::NextQuestion {
                index: self.current_index,
            });
        }

        let entry = HighScoreEntry::new(
            names::display_or_anonymous(self.player_name.as_ref()),
            self.score,
            self.difficulty,
            self.sport.clone(),
            Utc::now(),
        );
        let rank = high_scores.insert(entry.clone());
        self.phase = Phase::Result;

        tracing::info!(
            round = %self.id,
            score = self.score,
            total = self.questions.len(),
            best_streak = self.best_streak,
            ?rank,
            "round finished"
        );

        Ok(AdvanceOutcome::Finished { entry, rank })
    }

    /// Counts the countdown down by one second
    ///
    /// Reaching zero does not answer the question; the caller submits
    /// `None` when it sees `expired`.
    ///
    /// # Errors
    ///
    /// * `Error::NotPlaying` - the round is over
    /// * `Error::AlreadyAnswered` - the countdown stops once answered
    /// * `Error::TimerExpired` - the countdown is already at zero
    pub fn tick(&mut self) -> Result<TickOutcome, Error> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        if self.answered() {
            return Err(Error::AlreadyAnswered);
        }
        if self.time_remaining == 0 {
            return Err(Error::TimerExpired);
        }

        self.time_remaining -= 1;

        Ok(TickOutcome {
            time_remaining: self.time_remaining,
            expired: self.time_remaining == 0,
        })
    }

    /// Reveals the hint for the current question
    ///
    /// # Errors
    ///
    /// * `Error::NotPlaying` - the round is over
    /// * `Error::AlreadyAnswered` - hints are only offered on open questions
    /// * `Error::HintAlreadyVisible` - the hint is already shown
    /// * `Error::HintBudgetExceeded` - every hint of the round is used
    pub fn request_hint(&mut self) -> Result<HintOutcome, Error> {
        if self.phase != Phase::Playing {
            return Err(Error::NotPlaying);
        }
        if self.answered() {
            return Err(Error::AlreadyAnswered);
        }
        if self.hint_visible {
            return Err(Error::HintAlreadyVisible);
        }
        if self.hints_used >= self.options.hint_budget() {
            return Err(Error::HintBudgetExceeded);
        }

        self.hint_visible = true;
        self.hints_used += 1;

        tracing::debug!(round = %self.id, index = self.current_index, hints_used = self.hints_used, "hint shown");

        Ok(HintOutcome {
            hint: self.current_hint().map(str::to_owned),
            hints_left: self.hints_left(),
        })
    }

    /// Applies an action, scheduling any follow-up alarm it implies
    ///
    /// Answers schedule the advance after the question delay, and moving to
    /// a new question schedules its first tick. [`Action::Tick`] is the raw
    /// countdown step and schedules nothing.
    ///
    /// # Errors
    ///
    /// Any error of the underlying transition; the round is then unchanged
    /// and nothing is scheduled.
    pub fn apply<S: FnMut(Alarm, Duration)>(
        &mut self,
        action: Action,
        high_scores: &mut HighScores,
        mut schedule_message: S,
    ) -> Result<Outcome, Error> {
        match action {
            Action::Answer(answer) => {
                let outcome = self.submit_answer(answer.as_deref())?;
                self.schedule_advance(&mut schedule_message);
                Ok(outcome.into())
            }
            Action::AnswerOption(index) => {
                let outcome = self.answer_option(index)?;
                self.schedule_advance(&mut schedule_message);
                Ok(outcome.into())
            }
            Action::Hint => self.request_hint().map(Outcome::from),
            Action::Tick => self.tick().map(Outcome::from),
            Action::Advance => {
                let outcome = self.advance(high_scores)?;
                if matches!(outcome, AdvanceOutcome::NextQuestion { .. }) {
                    self.schedule_tick(&mut schedule_message);
                }
                Ok(outcome.into())
            }
        }
    }

    /// Handles an alarm previously requested through `schedule_message`
    ///
    /// A tick alarm counts down and, once the clock reaches zero, submits
    /// the timeout answer. An advance alarm moves past the answered
    /// question. Each step schedules the next alarm in the chain.
    ///
    /// # Errors
    ///
    /// `Error::StaleAlarm` when the alarm belongs to another round, another
    /// question, an answered question's countdown, or a finished round.
    pub fn receive_alarm<S: FnMut(Alarm, Duration)>(
        &mut self,
        alarm: &Alarm,
        high_scores: &mut HighScores,
        mut schedule_message: S,
    ) -> Result<Vec<Outcome>, Error> {
        if alarm.round() != self.id
            || alarm.index() != self.current_index
            || self.phase != Phase::Playing
        {
            tracing::debug!(round = %self.id, ?alarm, "ignoring stale alarm");
            return Err(Error::StaleAlarm);
        }

        match alarm {
            Alarm::Tick { .. } => {
                if self.answered() {
                    return Err(Error::StaleAlarm);
                }

                let mut outcomes = Vec::with_capacity(2);
                if self.time_remaining > 0 {
                    outcomes.push(self.tick()?.into());
                }
                if self.time_remaining == 0 {
                    outcomes.push(self.submit_answer(None)?.into());
                    self.schedule_advance(&mut schedule_message);
                } else {
                    self.schedule_tick(&mut schedule_message);
                }
                Ok(outcomes)
            }
            Alarm::Advance { .. } => {
                let outcome = self.advance(high_scores)?;
                if matches!(outcome, AdvanceOutcome::NextQuestion { .. }) {
                    self.schedule_tick(&mut schedule_message);
                }
                Ok(vec![outcome.into()])
            }
        }
    }

    fn schedule_tick<S: FnMut(Alarm, Duration)>(&self, schedule_message: &mut S) {
        schedule_message(
            Alarm::Tick {
                round: self.id,
                index: self.current_index,
            },
            self.options.tick_period(),
        );
    }

    fn schedule_advance<S: FnMut(Alarm, Duration)>(&self, schedule_message: &mut S) {
        schedule_message(
            Alarm::Advance {
                round: self.id,
                index: self.current_index,
            },
            self.options.question_delay(),
        );
    }

    /// Identity of this round
    pub fn id(&self) -> RoundId {
        self.id
    }

    /// Either `Phase::Playing` or `Phase::Result`
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sport the questions were drawn from
    pub fn sport(&self) -> &SportId {
        &self.sport
    }

    /// Difficulty the questions were drawn from
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The questions of this round in play order
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    /// The question currently shown
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.current_index)
    }

    /// Index of the question currently shown
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of correct answers so far
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Consecutive correct answers up to now
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Longest streak of this round
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Seconds left on the current question
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// What happened to the current question
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the current question has been resolved
    pub fn answered(&self) -> bool {
        self.selection != Selection::None
    }

    /// Hints revealed so far
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Hints still available
    pub fn hints_left(&self) -> u32 {
        self.options.hint_budget().saturating_sub(self.hints_used)
    }

    /// Whether the hint of the current question is shown
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    /// The hint text of the current question, if it has one
    pub fn current_hint(&self) -> Option<&str> {
        self.current_question().and_then(QuestionRecord::hint)
    }

    /// The player this round is recorded for
    pub fn player_name(&self) -> Option<&PlayerName> {
        self.player_name.as_ref()
    }

    /// Rating of the score against the round length
    pub fn performance(&self) -> Performance {
        Performance::from_score(self.score, self.questions.len())
    }
}
