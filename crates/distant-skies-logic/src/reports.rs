//! Read-only views for the console renderer.

use std::fmt;

use serde::Serialize;

use crate::celestial::{BodyRef, SpectralClass, System};
use crate::colony::colonies_on;
use crate::error::GameError;
use crate::fleet::Location;
use crate::player::PlayerId;
use crate::world::WorldState;

// ============================================================================
// SYSTEM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonSummary {
    pub name: String,
    pub area: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetSummary {
    pub name: String,
    pub area: u32,
    pub gas_giant: bool,
    pub moons: Vec<MoonSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSummary {
    pub name: String,
    pub stars: Vec<SpectralClass>,
    pub planets: Vec<PlanetSummary>,
}

pub fn describe_system(system: &System) -> SystemSummary {
    SystemSummary {
        name: system.name.clone(),
        stars: system
            .stars
            .iter()
            .filter_map(|s| s.spectral_class())
            .collect(),
        planets: system
            .planets
            .iter()
            .map(|p| PlanetSummary {
                name: p.name.clone(),
                area: p.area,
                gas_giant: p.is_gas_giant(),
                moons: p
                    .moons
                    .iter()
                    .map(|m| MoonSummary {
                        name: m.name.clone(),
                        area: m.area,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {}", one)
    } else {
        format!("{} {}", n, many)
    }
}

impl fmt::Display for SystemSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The {} system consists of the following:", self.name)?;
        for class in &self.stars {
            writeln!(f, "> One {} type star", class.letter())?;
        }
        for planet in &self.planets {
            let moons = match planet.moons.len() {
                0 => "no moons".to_string(),
                n => plural(n, "moon", "moons"),
            };
            if planet.gas_giant {
                writeln!(f, "> A gas giant planet, {}, with {}.", planet.name, moons)?;
            } else {
                writeln!(
                    f,
                    "> A terrestrial planet, {}, with {} suitable for colonies, and {}.",
                    planet.name,
                    plural(planet.area as usize, "site", "sites"),
                    moons
                )?;
            }
            for moon in &planet.moons {
                writeln!(
                    f,
                    "\t{} has {} suitable for colonies.",
                    moon.name,
                    plural(moon.area as usize, "site", "sites")
                )?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// COLONIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColonyListing {
    pub colony: String,
    pub owner: String,
}

/// Colonies on a body with their owners, in founding order.
pub fn list_colonies(world: &WorldState, body: BodyRef) -> Vec<ColonyListing> {
    colonies_on(world, body)
        .into_iter()
        .map(|c| ColonyListing {
            colony: c.name.clone(),
            owner: world
                .players
                .get(c.owner.0)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
        })
        .collect()
}

impl fmt::Display for ColonyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is owned by {}.", self.colony, self.owner)
    }
}

// ============================================================================
// SHIPS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Whereabouts {
    At(String),
    EnRoute { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipListing {
    pub ship: String,
    pub build: &'static str,
    pub fleet: String,
    pub whereabouts: Whereabouts,
}

/// Every ship a player owns, fleet by fleet.
pub fn list_ships(world: &WorldState, player: PlayerId) -> Result<Vec<ShipListing>, GameError> {
    let owner = world.player(player)?;
    let mut listings = Vec::new();
    for fleet in owner.owned_fleets.values().filter_map(|id| world.fleet(*id)) {
        let whereabouts = match &fleet.location {
            Location::Orbit(orbit) => Whereabouts::EnRoute {
                from: world.body_name(orbit.origin),
                to: world.body_name(orbit.destination),
            },
            other => Whereabouts::At(world.location_name(other)),
        };
        for ship in &fleet.members {
            listings.push(ShipListing {
                ship: ship.name.clone(),
                build: ship.build.name(),
                fleet: fleet.name.clone(),
                whereabouts: whereabouts.clone(),
            });
        }
    }
    Ok(listings)
}

impl fmt::Display for ShipListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.whereabouts {
            Whereabouts::At(place) => {
                write!(f, "{}, a {}, currently at {}", self.ship, self.build, place)
            }
            Whereabouts::EnRoute { from, to } => write!(
                f,
                "{}, a {}, currently en route from {} to {}",
                self.ship, self.build, from, to
            ),
        }
    }
}
