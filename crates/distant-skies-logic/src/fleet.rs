//! Ships, fleets and fleet movement.
//!
//! A fleet is always at exactly one [`Location`]. Moving puts it in an
//! [`Orbit`] between two bodies; it lands when its owner ends the turn.

use serde::{Deserialize, Serialize};

use crate::builds::BuildKind;
use crate::celestial::BodyRef;
use crate::error::{EntityKind, GameError};
use crate::player::PlayerId;
use crate::world::WorldState;

/// Starting value of each depletable ship resource.
pub const FULL_TANK: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FleetId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Unique among the owner's ships.
    pub name: String,
    pub build: BuildKind,
    /// Name of the fleet this ship flies with.
    pub parent_fleet: String,
    pub fuel: f32,
    pub drive_charge: f32,
    pub attack: f32,
}

impl Ship {
    pub fn new(name: impl Into<String>, build: BuildKind, parent_fleet: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            build,
            parent_fleet: parent_fleet.into(),
            fuel: FULL_TANK,
            drive_charge: FULL_TANK,
            attack: FULL_TANK,
        }
    }
}

/// A fleet in transit between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orbit {
    pub origin: BodyRef,
    pub destination: BodyRef,
}

/// Where a fleet is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Planet(usize),
    Moon { planet: usize, moon: usize },
    Colony(crate::colony::ColonyId),
    Orbit(Orbit),
}

impl Location {
    pub fn at_body(body: BodyRef) -> Self {
        match body {
            BodyRef::Planet(p) => Self::Planet(p),
            BodyRef::Moon { planet, moon } => Self::Moon { planet, moon },
        }
    }

    pub fn in_flight(&self) -> bool {
        matches!(self, Self::Orbit(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    /// Unique among the owner's fleets.
    pub name: String,
    pub owner: PlayerId,
    pub location: Location,
    /// Never empty while the fleet exists.
    pub members: Vec<Ship>,
}

impl Fleet {
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn in_flight(&self) -> bool {
        self.location.in_flight()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Departed(Orbit),
    /// The fleet was already travelling; nothing changed.
    AlreadyInFlight,
}

/// Send a fleet towards `destination`.
///
/// A fleet already in orbit is not redirected. A fleet leaving a colony is
/// undocked and its orbit starts from the colony's body.
pub fn begin_move(
    world: &mut WorldState,
    fleet_id: FleetId,
    destination: BodyRef,
) -> Result<MoveOutcome, GameError> {
    let fleet = world
        .fleet(fleet_id)
        .ok_or_else(|| GameError::not_found(EntityKind::Fleet, format!("#{}", fleet_id.0)))?;
    if world.system.site(destination).is_none() {
        return Err(GameError::not_found(
            EntityKind::Body,
            format!("{:?}", destination),
        ));
    }
    if fleet.in_flight() {
        log::debug!("Fleet {} is already in flight", fleet.name);
        return Ok(MoveOutcome::AlreadyInFlight);
    }

    let location = fleet.location;
    let key = fleet.key();
    let origin = world
        .body_of(&location)
        .ok_or_else(|| GameError::not_found(EntityKind::Body, world.location_name(&location)))?;
    let orbit = Orbit {
        origin,
        destination,
    };

    if let Location::Colony(colony_id) = location {
        if let Some(colony) = world.colony_mut(colony_id) {
            colony.docked.shift_remove(&key);
        }
    }
    let (from, to) = (world.body_name(origin), world.body_name(destination));
    if let Some(fleet) = world.fleet_mut(fleet_id) {
        fleet.location = Location::Orbit(orbit);
        log::info!("Fleet {} departed {} for {}", fleet.name, from, to);
    }
    Ok(MoveOutcome::Departed(orbit))
}

/// Land every in-flight fleet owned by `player` at its destination.
/// Returns the fleets that arrived.
pub fn resolve_arrivals(world: &mut WorldState, player: PlayerId) -> Result<Vec<FleetId>, GameError> {
    let owned: Vec<FleetId> = world.player(player)?.owned_fleets.values().copied().collect();
    let mut arrived = Vec::new();
    for id in owned {
        let Some(fleet) = world.fleet_mut(id) else {
            continue;
        };
        if let Location::Orbit(orbit) = fleet.location {
            fleet.location = Location::at_body(orbit.destination);
            arrived.push(id);
        }
    }
    for id in &arrived {
        if let Some(fleet) = world.fleet(*id) {
            log::info!(
                "Fleet {} arrived at {}",
                fleet.name,
                world.location_name(&fleet.location)
            );
        }
    }
    Ok(arrived)
}
