//! Error kinds shared by every game operation.
//!
//! All runtime errors are recoverable at the command boundary: the caller
//! reports them and re-prompts. Only [`GameError::InvalidConfiguration`]
//! stops an operation before it starts.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What kind of thing a name failed to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Body,
    Colony,
    Fleet,
    Player,
    Ship,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Body => "body",
            EntityKind::Colony => "colony",
            EntityKind::Fleet => "fleet",
            EntityKind::Player => "player",
            EntityKind::Ship => "ship",
        };
        f.write_str(label)
    }
}

/// A single defect found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("the system name cannot be blank")]
    EmptySystemName,
    #[error("a system needs at least one star")]
    NoStars,
    #[error("star {index} has temperature {temperature}, expected 1-7")]
    StarTemperatureOutOfRange { index: usize, temperature: u8 },
    #[error("a system needs at least one planet")]
    NoPlanets,
    #[error("the maximum planet count must be at least 1")]
    ZeroMaxPlanets,
    #[error("planet {index} has area {area}, expected 0-{max}")]
    PlanetAreaOutOfRange { index: usize, area: u32, max: u32 },
    #[error("moon {moon} of planet {planet} has area {area}, expected 1-{max}")]
    MoonAreaOutOfRange {
        planet: usize,
        moon: usize,
        area: u32,
        max: u32,
    },
    #[error("planet {planet} has {count} moons, at most {max} can be named")]
    TooManyMoons {
        planet: usize,
        count: usize,
        max: usize,
    },
    #[error("{0} players requested, expected 2-8")]
    PlayerCountOutOfRange(usize),
    #[error("player {0} has an empty name")]
    EmptyPlayerName(usize),
}

/// Errors returned by game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{name} was not found anywhere in the system ({kind})")]
    NotFound { kind: EntityKind, name: String },
    #[error("you cannot establish a colony on {0}, it is a gas giant")]
    GasGiantIneligible(String),
    #[error("{body} already has the maximum number of colonies ({capacity})")]
    CapacityExceeded { body: String, capacity: u32 },
    #[error("{0} is not a ship in the catalog")]
    UnknownBuild(String),
    #[error("you have no colony named {0}")]
    UnknownColony(String),
    #[error("the {kind} name {name} is already in use")]
    NameCollision { kind: EntityKind, name: String },
    #[error("invalid configuration: {}", describe(.0))]
    InvalidConfiguration(Vec<ConfigError>),
}

impl GameError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        GameError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn collision(kind: EntityKind, name: impl Into<String>) -> Self {
        GameError::NameCollision {
            kind,
            name: name.into(),
        }
    }
}

fn describe(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_lists_every_defect() {
        let err = GameError::InvalidConfiguration(vec![
            ConfigError::NoStars,
            ConfigError::NoPlanets,
        ]);
        let text = err.to_string();
        assert!(text.contains("at least one star"));
        assert!(text.contains("at least one planet"));
    }

    #[test]
    fn blank_system_name_is_a_config_defect() {
        let err = GameError::InvalidConfiguration(vec![ConfigError::EmptySystemName]);
        assert!(err.to_string().contains("system name cannot be blank"));
    }

    #[test]
    fn not_found_names_the_kind() {
        let err = GameError::not_found(EntityKind::Fleet, "Ghost Fleet");
        assert_eq!(
            err.to_string(),
            "Ghost Fleet was not found anywhere in the system (fleet)"
        );
    }
}
