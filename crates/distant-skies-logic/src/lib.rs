//! Pure game logic for Distant Skies.
//!
//! This crate contains everything about the game that is independent of
//! the console: generating a star system, indexing its bodies, founding
//! colonies, buying ships, moving fleets and running turns. Functions take
//! plain data (usually a `&mut WorldState`) and return `Result`s, so a
//! front end only has to parse text and print outcomes.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`builds`] | Ship build catalog (dreadnaught, colony ship, capital ship, fighter) |
//! | [`celestial`] | Stars, planets, moons, the frost line and system renaming |
//! | [`colony`] | Colony entity and the establishment rules |
//! | [`command`] | Free text → [`command::Command`] |
//! | [`draws`] | Weighted random draws used by the generator |
//! | [`engine`] | Turn engine: active player, rounds, command dispatch |
//! | [`error`] | Game, configuration and parse errors |
//! | [`fleet`] | Ships, fleets, orbits and movement |
//! | [`generation`] | Random and explicit system generation |
//! | [`names`] | Colony name library |
//! | [`player`] | Players and game setup |
//! | [`registry`] | Case-insensitive body lookup by full name |
//! | [`reports`] | Read-only views: system summary, colony and ship listings |
//! | [`shipyard`] | Ship purchase at a colony |
//! | [`world`] | World aggregate, JSON snapshots, invariant audit |

pub mod builds;
pub mod celestial;
pub mod colony;
pub mod command;
pub mod draws;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod generation;
pub mod names;
pub mod player;
pub mod registry;
pub mod reports;
pub mod shipyard;
pub mod world;
