//! Key-value persistence of player preferences
//!
//! The driver provides the actual storage (browser local storage, a file,
//! anything string keyed) behind the [`Store`] trait. Reads never fail: a
//! missing or unreadable value falls back to its default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    constants::storage,
    names::PlayerName,
    trivia::{Difficulty, SportId},
};

/// String key-value storage supplied by the driver
pub trait Store {
    /// Reads the value stored at `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Writes `value` at `key`, replacing any previous value
    fn set(&mut self, key: &str, value: String);
}

/// A [`Store`] held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore(HashMap<String, String>);

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_owned(), value);
    }
}

/// Choices remembered between visits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// The name entered on the welcome screen
    pub player_name: Option<PlayerName>,
    /// The last selected sport
    pub sport: Option<SportId>,
    /// The last selected difficulty
    pub difficulty: Difficulty,
}

impl Preferences {
    /// Reads preferences from `store`
    ///
    /// The saved sport is kept only when it is in `available`; otherwise the
    /// first available sport is used. Unknown difficulties fall back to
    /// medium and names that no longer validate are dropped.
    pub fn load(store: &impl Store, available: &[SportId]) -> Self {
        let player_name = store
            .get(storage::PLAYER_NAME_KEY)
            .and_then(|raw| match PlayerName::new(&raw) {
                Ok(name) => Some(name),
                Err(error) => {
                    tracing::debug!(%error, "ignoring saved player name");
                    None
                }
            });

        let sport = store
            .get(storage::SPORT_KEY)
            .map(SportId::new)
            .filter(|sport| available.contains(sport))
            .or_else(|| available.first().cloned());

        let difficulty = store
            .get(storage::DIFFICULTY_KEY)
            .and_then(|raw| raw.parse::<Difficulty>().ok())
            .unwrap_or_default();

        Self {
            player_name,
            sport,
            difficulty,
        }
    }

    /// Writes preferences to `store`
    ///
    /// Nothing is written for an unset name or sport.
    pub fn save(&self, store: &mut impl Store) {
        if let Some(name) = &self.player_name {
            store.set(storage::PLAYER_NAME_KEY, name.to_string());
        }
        if let Some(sport) = &self.sport {
            store.set(storage::SPORT_KEY, sport.to_string());
        }
        store.set(storage::DIFFICULTY_KEY, self.difficulty.to_string());
    }
}
