//! Players and game setup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::colony::ColonyId;
use crate::error::{ConfigError, GameError};
use crate::fleet::FleetId;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;

/// Index of a player in turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Display name; need not be unique.
    pub name: String,
    /// Accumulated colony production.
    pub net_worth: i64,
    /// Lowercased colony name → colony.
    pub owned_colonies: IndexMap<String, ColonyId>,
    /// Lowercased fleet name → fleet.
    pub owned_fleets: IndexMap<String, FleetId>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            net_worth: 0,
            owned_colonies: IndexMap::new(),
            owned_fleets: IndexMap::new(),
        }
    }
}

/// Who is playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSetup {
    /// `n` players named "Player 1" .. "Player n".
    Numbered(usize),
    /// Custom names, in turn order.
    Named(Vec<String>),
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self::Numbered(MIN_PLAYERS)
    }
}

impl PlayerSetup {
    pub fn count(&self) -> usize {
        match self {
            Self::Numbered(n) => *n,
            Self::Named(names) => names.len(),
        }
    }
}

/// Validate a player setup, returning all errors found.
pub fn validate_players(setup: &PlayerSetup) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let count = setup.count();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
        errors.push(ConfigError::PlayerCountOutOfRange(count));
    }
    if let PlayerSetup::Named(names) = setup {
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(ConfigError::EmptyPlayerName(i + 1));
            }
        }
    }
    errors
}

/// Create the players for a new game, in turn order.
pub fn join_players(setup: &PlayerSetup) -> Result<Vec<Player>, GameError> {
    let errors = validate_players(setup);
    if !errors.is_empty() {
        return Err(GameError::InvalidConfiguration(errors));
    }
    let players = match setup {
        PlayerSetup::Numbered(n) => (1..=*n).map(|i| Player::new(format!("Player {}", i))).collect(),
        PlayerSetup::Named(names) => names.iter().map(|n| Player::new(n.trim())).collect(),
    };
    Ok(players)
}
