//! Round identity
//!
//! Every quiz round receives a fresh `RoundId` when it is
//! built. Alarms scheduled by a round carry its id, so an alarm that fires
//! after the round was reset or replaced can be recognised and dropped.

use std::{fmt::Display, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use uuid::Uuid;

/// A unique identifier for one built round
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct RoundId(Uuid);

impl RoundId {
    /// Creates a new random round ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoundId {
    /// Creates a new random round ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoundId {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RoundId {
    type Err = uuid::Error;

    /// Parses a round ID from its UUID string form
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}
