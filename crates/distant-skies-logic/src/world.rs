//! The world aggregate: system, registry, players, colonies and fleets.
//!
//! Every game operation takes a `&mut WorldState` explicitly. Colonies and
//! fleets live in arenas here; bodies, players and colonies refer to them
//! by id, so a colony listed under a planet and under its owner is one
//! entity seen from two places.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::celestial::{self, BodyRef, System};
use crate::colony::{Colony, ColonyId};
use crate::command::Lexicon;
use crate::error::{EntityKind, GameError};
use crate::fleet::{Fleet, FleetId, Location};
use crate::player::{Player, PlayerId};
use crate::registry::{self, Registry};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub system: System,
    pub registry: Registry,
    /// Lowercased names of every colony ever founded.
    pub used_colony_names: HashSet<String>,
    pub players: Vec<Player>,
    pub colonies: Vec<Colony>,
    pub fleets: Vec<Fleet>,
}

impl WorldState {
    pub fn new(system: System, players: Vec<Player>) -> Self {
        let registry = registry::index(&system);
        Self {
            system,
            registry,
            used_colony_names: HashSet::new(),
            players,
            colonies: Vec::new(),
            fleets: Vec::new(),
        }
    }

    /// Rename the system and rebuild the registry.
    pub fn rename_system(&mut self, new_name: &str) -> Result<(), GameError> {
        let old_name = self.system.name.clone();
        celestial::rename_system(&mut self.system, new_name)?;
        log::info!("Renamed system {} to {}", old_name, self.system.name);
        self.registry = registry::index(&self.system);
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players
            .get(id.0)
            .ok_or_else(|| GameError::not_found(EntityKind::Player, format!("#{}", id.0)))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(id.0)
            .ok_or_else(|| GameError::not_found(EntityKind::Player, format!("#{}", id.0)))
    }

    /// First player whose name matches, ignoring case.
    pub fn find_player(&self, name: &str) -> Option<PlayerId> {
        let wanted = name.trim().to_lowercase();
        self.players
            .iter()
            .position(|p| p.name.to_lowercase() == wanted)
            .map(PlayerId)
    }

    pub fn colony(&self, id: ColonyId) -> Option<&Colony> {
        self.colonies.get(id.0 as usize)
    }

    pub fn colony_mut(&mut self, id: ColonyId) -> Option<&mut Colony> {
        self.colonies.get_mut(id.0 as usize)
    }

    /// Any colony in the system by name, ignoring case.
    pub fn find_colony(&self, name: &str) -> Option<&Colony> {
        let wanted = name.trim().to_lowercase();
        self.colonies.iter().find(|c| c.key() == wanted)
    }

    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.get(id.0 as usize)
    }

    pub fn fleet_mut(&mut self, id: FleetId) -> Option<&mut Fleet> {
        self.fleets.get_mut(id.0 as usize)
    }

    /// A fleet owned by `player`, by name (ignoring case).
    pub fn owned_fleet(&self, player: PlayerId, name: &str) -> Result<FleetId, GameError> {
        self.player(player)?
            .owned_fleets
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| GameError::not_found(EntityKind::Fleet, name.trim()))
    }

    /// Resolve a destination: a planet or moon name, or a colony name
    /// (which resolves to the body the colony sits on).
    pub fn resolve_destination(&self, name: &str) -> Result<BodyRef, GameError> {
        self.registry
            .lookup(name)
            .or_else(|| self.find_colony(name).map(|c| c.site))
            .ok_or_else(|| GameError::not_found(EntityKind::Body, name.trim()))
    }

    /// The planet or moon a location is on or around.
    pub fn body_of(&self, location: &Location) -> Option<BodyRef> {
        match location {
            Location::Planet(p) => Some(BodyRef::Planet(*p)),
            Location::Moon { planet, moon } => Some(BodyRef::Moon {
                planet: *planet,
                moon: *moon,
            }),
            Location::Colony(id) => self.colony(*id).map(|c| c.site),
            Location::Orbit(_) => None,
        }
    }

    pub fn body_name(&self, body: BodyRef) -> String {
        self.system
            .body_name(body)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", body))
    }

    /// Human-readable place name for a location.
    pub fn location_name(&self, location: &Location) -> String {
        match location {
            Location::Colony(id) => self
                .colony(*id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("colony #{}", id.0)),
            Location::Orbit(orbit) => format!(
                "orbit from {} to {}",
                self.body_name(orbit.origin),
                self.body_name(orbit.destination)
            ),
            other => self
                .body_of(other)
                .map(|b| self.body_name(b))
                .unwrap_or_default(),
        }
    }

    /// Serialize the full world to JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a world from [`WorldState::to_json`] output.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut world: WorldState = serde_json::from_str(json)?;
        let problems = world.audit();
        if let Some(first) = problems.into_iter().next() {
            return Err(SnapshotError::Inconsistent(first));
        }
        world.registry = registry::index(&world.system);
        Ok(world)
    }

    /// Check the ownership and capacity invariants, returning every violation.
    pub fn audit(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for body in self.system.bodies() {
            let Some(site) = self.system.site(body) else {
                continue;
            };
            if site.colonies().len() as u32 > site.area() {
                problems.push(format!(
                    "{} holds {} colonies but has {} sites",
                    site.name(),
                    site.colonies().len(),
                    site.area()
                ));
            }
            for (key, id) in site.colonies() {
                match self.colony(*id) {
                    Some(c) if c.site == body && &c.key() == key => {}
                    _ => problems.push(format!("{} lists stray colony {}", site.name(), key)),
                }
            }
        }

        for colony in &self.colonies {
            let owned = self
                .players
                .get(colony.owner.0)
                .and_then(|p| p.owned_colonies.get(&colony.key()));
            if owned != Some(&colony.id) {
                problems.push(format!("colony {} missing from its owner", colony.name));
            }
            if !self.used_colony_names.contains(&colony.key()) {
                problems.push(format!("colony {} not in used names", colony.name));
            }
            for (key, fleet_id) in &colony.docked {
                match self.fleet(*fleet_id) {
                    Some(f) if f.location == Location::Colony(colony.id) => {}
                    _ => problems.push(format!("colony {} docks absent fleet {}", colony.name, key)),
                }
            }
        }

        for fleet in &self.fleets {
            if fleet.members.is_empty() {
                problems.push(format!("fleet {} has no ships", fleet.name));
            }
            let owned = self
                .players
                .get(fleet.owner.0)
                .and_then(|p| p.owned_fleets.get(&fleet.key()));
            if owned != Some(&fleet.id) {
                problems.push(format!("fleet {} missing from its owner", fleet.name));
            }
            if fleet.members.iter().any(|s| s.parent_fleet != fleet.name) {
                problems.push(format!("fleet {} has a ship pointing elsewhere", fleet.name));
            }
        }

        problems
    }
}

impl Lexicon for WorldState {
    fn is_body(&self, name: &str) -> bool {
        self.registry.lookup(name).is_some()
    }

    fn is_colony(&self, name: &str) -> bool {
        self.find_colony(name).is_some()
    }

    fn is_fleet(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.players.iter().any(|p| p.owned_fleets.contains_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celestial::{Moon, Planet, PlanetKind, Star};

    fn world() -> WorldState {
        let system = System::new(
            "Vega",
            vec![Star::new(5)],
            vec![Planet::new(
                "1",
                3,
                PlanetKind::Terrestrial,
                vec![Moon::new("1a", 2)],
            )],
        );
        WorldState::new(system, vec![Player::new("Ada"), Player::new("Grace")])
    }

    #[test]
    fn new_world_indexes_bodies() {
        let world = world();
        assert_eq!(world.registry.len(), 2);
        assert!(world.audit().is_empty());
    }

    #[test]
    fn rename_rebuilds_registry() {
        let mut world = world();
        world.rename_system("Lyra").unwrap();
        assert_eq!(world.registry.lookup("lyra 1a"), Some(BodyRef::Moon { planet: 0, moon: 0 }));
        assert_eq!(world.registry.lookup("vega 1"), None);
    }

    #[test]
    fn blank_rename_keeps_bodies_resolvable() {
        let mut world = world();
        assert!(matches!(
            world.rename_system("   "),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert_eq!(world.system.planets[0].name, "Vega 1");
        assert_eq!(world.registry.lookup("vega 1"), Some(BodyRef::Planet(0)));
    }

    #[test]
    fn find_player_ignores_case() {
        let world = world();
        assert_eq!(world.find_player("grace"), Some(PlayerId(1)));
        assert_eq!(world.find_player("linus"), None);
    }

    #[test]
    fn unknown_player_is_not_found() {
        let world = world();
        assert!(matches!(
            world.player(PlayerId(7)),
            Err(GameError::NotFound { kind: EntityKind::Player, .. })
        ));
    }

    #[test]
    fn destination_resolves_bodies() {
        let world = world();
        assert_eq!(world.resolve_destination("VEGA 1").unwrap(), BodyRef::Planet(0));
        assert!(world.resolve_destination("nowhere").is_err());
    }

    #[test]
    fn json_snapshot_round_trip() {
        let world = world();
        let json = world.to_json().unwrap();
        let restored = WorldState::from_json(&json).unwrap();
        assert_eq!(restored, world);
    }
}
