//! Player name validation
//!
//! The player enters a display name on the welcome screen. It is trimmed,
//! bounded in length and checked for inappropriate content before it is
//! stored in preferences or written into the high score list.

use std::fmt::Display;

use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Errors that can occur during name validation
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// A validated, trimmed player display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Validates and cleans a raw name
    ///
    /// # Errors
    ///
    /// * `Error::Empty` - Name is empty after trimming whitespace
    /// * `Error::TooLong` - Name exceeds 20 characters after trimming
    /// * `Error::Sinful` - Name contains inappropriate content
    pub fn new(raw: &str) -> Result<Self, Error> {
        let name = rustrict::trim_whitespace(raw);
        if name.is_empty() {
            return Err(Error::Empty);
        }
        if name.chars().count() > constants::player_name::MAX_LENGTH {
            return Err(Error::TooLong);
        }
        if name.is_inappropriate() {
            return Err(Error::Sinful);
        }
        Ok(Self(name.to_owned()))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}

impl Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name written into records for a player without a name
pub fn display_or_anonymous(name: Option<&PlayerName>) -> String {
    name.map_or_else(
        || constants::high_scores::ANONYMOUS.to_owned(),
        |name| name.as_str().to_owned(),
    )
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_accepts_plain_name() {
        let name = PlayerName::new("Derek").unwrap();
        assert_eq!(name.as_str(), "Derek");
        assert_eq!(name.to_string(), "Derek");
    }

    #[test]
    fn test_player_name_whitespace_trimming() {
        let name = PlayerName::new("  Mookie Betts  ").unwrap();
        assert_eq!(name.as_str(), "Mookie Betts");
    }

    #[test]
    fn test_player_name_empty() {
        assert_eq!(PlayerName::new(""), Err(Error::Empty));
        assert_eq!(PlayerName::new("   "), Err(Error::Empty));
        assert_eq!(PlayerName::new("\t\n"), Err(Error::Empty));
    }

    #[test]
    fn test_player_name_too_long() {
        let long_name = "a".repeat(21);
        assert_eq!(PlayerName::new(&long_name), Err(Error::TooLong));
    }

    #[test]
    fn test_player_name_max_length_allowed() {
        let max_name = "a".repeat(20);
        assert_eq!(PlayerName::new(&max_name).unwrap().as_str(), max_name);
    }

    #[test]
    fn test_player_name_length_counts_characters() {
        // 20 multi-byte characters are still within the limit
        let name = "é".repeat(20);
        assert!(PlayerName::new(&name).is_ok());
    }

    #[test]
    fn test_player_name_inappropriate_content() {
        for name in ["damn", "fuck", "shit"] {
            assert_eq!(
                PlayerName::new(name),
                Err(Error::Sinful),
                "Expected '{name}' to be flagged as inappropriate"
            );
        }
    }

    #[test]
    fn test_player_name_serde_validates() {
        let name: PlayerName = serde_json::from_str("\"  Ichiro \"").unwrap();
        assert_eq!(name.as_str(), "Ichiro");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Ichiro\"");

        let result: Result<PlayerName, _> = serde_json::from_str("\"   \"");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_or_anonymous() {
        let name = PlayerName::new("Ken").unwrap();
        assert_eq!(display_or_anonymous(Some(&name)), "Ken");
        assert_eq!(display_or_anonymous(None), "Anonymous");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Empty.to_string(), "name cannot be empty");
        assert_eq!(Error::Sinful.to_string(), "name is inappropriate");
        assert_eq!(Error::TooLong.to_string(), "name is too long");
    }
}
