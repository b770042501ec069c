//! Question records and their classification keys
//!
//! A question offers a handful of options, exactly one of which matches the
//! stored correct answer. Records are immutable once loaded and validated.

use std::{fmt::Display, str::FromStr};

use enum_map::Enum;
use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

/// Difficulty bucket of a question
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Enum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Entry-level questions
    Easy,
    /// The default bucket
    #[default]
    Medium,
    /// Questions for dedicated fans
    Hard,
}

impl Difficulty {
    /// All difficulties from easiest to hardest
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The lowercase identifier used in data files and preferences
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown difficulty identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(UnknownDifficulty(other.to_owned())),
        }
    }
}

/// Identifier of a sport catalog such as `mlb` or `nfl`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SportId(String);

impl SportId {
    /// Creates a sport identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SportId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Builds a garde check that the correct answer is one of the options
#[allow(clippy::ptr_arg)]
fn is_one_of(options: &[String]) -> impl FnOnce(&String, &()) -> garde::Result + '_ {
    move |answer, _ctx| {
        if options.iter().any(|option| option == answer) {
            Ok(())
        } else {
            Err(garde::Error::new("correct answer is not among the options"))
        }
    }
}

/// A single multiple-choice question
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// The question text shown to the player
    #[garde(length(min = 1, max = crate::constants::question::MAX_TEXT_LENGTH))]
    question: String,
    /// The answer options in display order
    #[garde(
        length(min = crate::constants::question::MIN_OPTIONS, max = crate::constants::question::MAX_OPTIONS),
        inner(length(min = 1, max = crate::constants::question::MAX_OPTION_LENGTH))
    )]
    options: Vec<String>,
    /// The option that scores
    #[garde(custom(is_one_of(&self.options)))]
    correct_answer: String,
    /// Optional hint revealed on request
    #[garde(length(max = crate::constants::question::MAX_OPTION_LENGTH))]
    #[serde(default)]
    hint: Option<String>,
    /// Optional image key carried through for the renderer
    #[garde(skip)]
    #[serde(default)]
    image: Option<String>,
}

impl QuestionRecord {
    /// Creates and validates a question record
    ///
    /// # Errors
    ///
    /// Returns the `garde::Report` describing every rule the record breaks,
    /// such as fewer than two options or a correct answer missing from them.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        hint: Option<String>,
    ) -> Result<Self, garde::Report> {
        let record = Self {
            question: question.into(),
            options,
            correct_answer: correct_answer.into(),
            hint,
            image: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// The question text
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The answer options in display order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The correct option
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// The hint, if the record has one
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// The image key, if the record has one
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Whether `answer` is exactly the correct option
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn options(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_question_record_valid() {
        let record = QuestionRecord::new(
            "Who holds the single-season home run record?",
            options(&["Barry Bonds", "Mark McGwire", "Sammy Sosa"]),
            "Barry Bonds",
            Some("He played for the Giants".to_owned()),
        )
        .unwrap();

        assert_eq!(record.correct_answer(), "Barry Bonds");
        assert_eq!(record.hint(), Some("He played for the Giants"));
        assert!(record.is_correct("Barry Bonds"));
        assert!(!record.is_correct("barry bonds"));
    }

    #[test]
    fn test_question_record_requires_two_options() {
        let result = QuestionRecord::new("Q?", options(&["Only"]), "Only", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_record_too_many_options() {
        let many: Vec<String> = (0..9).map(|i| format!("Option {i}")).collect();
        let result = QuestionRecord::new("Q?", many, "Option 0", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_record_answer_must_be_an_option() {
        let result = QuestionRecord::new("Q?", options(&["A", "B"]), "C", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_record_empty_text_rejected() {
        let result = QuestionRecord::new("", options(&["A", "B"]), "A", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_record_json_shape() {
        let json = r#"{
            "question": "Which team won the 2016 World Series?",
            "options": ["Cubs", "Indians"],
            "correctAnswer": "Cubs",
            "image": "wrigley-field"
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert!(record.validate().is_ok());
        assert_eq!(record.hint(), None);
        assert_eq!(record.image(), Some("wrigley-field"));

        let serialized = serde_json::to_string(&record).unwrap();
        assert!(serialized.contains("\"correctAnswer\":\"Cubs\""));
        assert!(!serialized.contains("hint"));
    }

    #[test]
    fn test_difficulty_parse_and_display() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<Difficulty>(), Ok(difficulty));
            assert_eq!(difficulty.to_string(), difficulty.as_str());
        }
        assert_eq!(
            "legendary".parse::<Difficulty>(),
            Err(UnknownDifficulty("legendary".to_owned()))
        );
    }

    #[test]
    fn test_difficulty_default_is_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
    }

    #[test]
    fn test_sport_id_transparent() {
        let sport = SportId::from("nba");
        assert_eq!(serde_json::to_string(&sport).unwrap(), "\"nba\"");
        assert_eq!(sport.to_string(), "nba");
    }
}
