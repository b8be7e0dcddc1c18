//! Colonies and the rules for founding them.
//!
//! A body can hold at most `area` colonies; gas giants (area 0) can hold
//! none. Colony names are unique across the whole system.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::celestial::BodyRef;
use crate::error::{EntityKind, GameError};
use crate::fleet::FleetId;
use crate::names::NameSource;
use crate::player::PlayerId;
use crate::world::WorldState;

/// Resources every colony produces per turn.
pub const PRODUCTION_PER_TURN: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonyId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    pub id: ColonyId,
    pub name: String,
    pub owner: PlayerId,
    /// The planet or moon this colony is built on.
    pub site: BodyRef,
    /// Lowercased fleet name → fleets currently at this colony.
    pub docked: IndexMap<String, FleetId>,
    pub production_per_turn: u32,
}

impl Colony {
    /// Map key used by bodies, owners and the used-names set.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// How the new colony gets its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColonyName {
    /// Player-supplied; rejected if already used.
    Custom(String),
    /// Drawn from the name source.
    Generated,
}

/// Found a colony for `player` on the body called `body_name`.
///
/// | Condition                      | Result                 |
/// |--------------------------------|------------------------|
/// | body not in the registry       | `NotFound`             |
/// | planet with area 0             | `GasGiantIneligible`   |
/// | body already at capacity       | `CapacityExceeded`     |
/// | custom name already used       | `NameCollision`        |
/// | otherwise                      | colony created         |
pub fn establish_colony(
    world: &mut WorldState,
    player: PlayerId,
    body_name: &str,
    naming: ColonyName,
    names: &mut impl NameSource,
) -> Result<ColonyId, GameError> {
    let body = world
        .registry
        .lookup(body_name)
        .ok_or_else(|| GameError::not_found(EntityKind::Body, body_name.trim()))?;
    establish_colony_at(world, player, body, naming, names)
}

/// Found a colony on an already-resolved body.
pub fn establish_colony_at(
    world: &mut WorldState,
    player: PlayerId,
    body: BodyRef,
    naming: ColonyName,
    names: &mut impl NameSource,
) -> Result<ColonyId, GameError> {
    world.player(player)?;
    let site = world
        .system
        .site(body)
        .ok_or_else(|| GameError::not_found(EntityKind::Body, format!("{:?}", body)))?;
    let body_name = site.name().to_string();

    if site.is_gas_giant() {
        return Err(GameError::GasGiantIneligible(body_name));
    }
    if !site.has_free_slot() {
        return Err(GameError::CapacityExceeded {
            body: body_name,
            capacity: site.area(),
        });
    }

    let name = match naming {
        ColonyName::Custom(name) => {
            let name = name.trim().to_string();
            if name.is_empty() || world.used_colony_names.contains(&name.to_lowercase()) {
                return Err(GameError::collision(EntityKind::Colony, name));
            }
            name
        }
        ColonyName::Generated => names.random_unique_name(&world.used_colony_names),
    };
    let key = name.to_lowercase();
    if world.used_colony_names.contains(&key) {
        return Err(GameError::collision(EntityKind::Colony, name));
    }

    let id = ColonyId(world.colonies.len() as u32);
    world.colonies.push(Colony {
        id,
        name: name.clone(),
        owner: player,
        site: body,
        docked: IndexMap::new(),
        production_per_turn: PRODUCTION_PER_TURN,
    });
    if let Some(site) = world.system.site_mut(body) {
        site.colonies_mut().insert(key.clone(), id);
    }
    world.player_mut(player)?.owned_colonies.insert(key.clone(), id);
    world.used_colony_names.insert(key);

    log::info!(
        "New colony {} established on {}, outputting {} resources per turn",
        name,
        body_name,
        PRODUCTION_PER_TURN
    );
    Ok(id)
}

/// Colonies on a body, in founding order.
pub fn colonies_on(world: &WorldState, body: BodyRef) -> Vec<&Colony> {
    world
        .system
        .site(body)
        .map(|site| {
            site.colonies()
                .values()
                .filter_map(|id| world.colony(*id))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celestial::{Moon, Planet, PlanetKind, Star, System};
    use crate::player::Player;
    use std::collections::HashSet;

    /// Hands out "Colony 1", "Colony 2", ...
    struct Counter(u32);

    impl NameSource for Counter {
        fn random_unique_name(&mut self, _used: &HashSet<String>) -> String {
            self.0 += 1;
            format!("Colony {}", self.0)
        }
    }

    fn world() -> WorldState {
        let system = System::new(
            "Sol",
            vec![Star::new(3)],
            vec![
                Planet::new("1", 2, PlanetKind::Terrestrial, vec![Moon::new("1a", 1)]),
                Planet::new("2", 0, PlanetKind::GasGiant, vec![]),
            ],
        );
        WorldState::new(system, vec![Player::new("Ada"), Player::new("Grace")])
    }

    #[test]
    fn colony_appears_under_body_and_owner() {
        let mut world = world();
        let id = establish_colony(&mut world, PlayerId(0), "sol 1", ColonyName::Generated, &mut Counter(0))
            .unwrap();
        assert_eq!(world.system.planets[0].colonies.get("colony 1"), Some(&id));
        assert_eq!(world.players[0].owned_colonies.get("colony 1"), Some(&id));
        assert!(world.used_colony_names.contains("colony 1"));
        let colony = world.colony(id).unwrap();
        assert_eq!(colony.owner, PlayerId(0));
        assert_eq!(colony.production_per_turn, 25);
        assert!(world.audit().is_empty());
    }

    #[test]
    fn unknown_body_fails() {
        let mut world = world();
        let err = establish_colony(&mut world, PlayerId(0), "sol 9", ColonyName::Generated, &mut Counter(0))
            .unwrap_err();
        assert!(matches!(err, GameError::NotFound { kind: EntityKind::Body, .. }));
    }

    #[test]
    fn gas_giant_rejected_and_unchanged() {
        let mut world = world();
        let err = establish_colony(&mut world, PlayerId(0), "Sol 2", ColonyName::Generated, &mut Counter(0))
            .unwrap_err();
        assert_eq!(err, GameError::GasGiantIneligible("Sol 2".into()));
        assert!(world.system.planets[1].colonies.is_empty());
        assert!(world.colonies.is_empty());
    }

    #[test]
    fn capacity_enforced() {
        let mut world = world();
        let mut names = Counter(0);
        establish_colony(&mut world, PlayerId(0), "sol 1", ColonyName::Generated, &mut names).unwrap();
        establish_colony(&mut world, PlayerId(1), "sol 1", ColonyName::Generated, &mut names).unwrap();
        let err = establish_colony(&mut world, PlayerId(0), "sol 1", ColonyName::Generated, &mut names)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::CapacityExceeded {
                body: "Sol 1".into(),
                capacity: 2
            }
        );
        assert_eq!(world.system.planets[0].colonies.len(), 2);
    }

    #[test]
    fn moons_hold_colonies_too() {
        let mut world = world();
        let mut names = Counter(0);
        establish_colony(&mut world, PlayerId(1), "sol 1a", ColonyName::Generated, &mut names).unwrap();
        assert!(matches!(
            establish_colony(&mut world, PlayerId(1), "sol 1a", ColonyName::Generated, &mut names),
            Err(GameError::CapacityExceeded { capacity: 1, .. })
        ));
    }

    #[test]
    fn custom_name_must_be_unused() {
        let mut world = world();
        let mut names = Counter(0);
        establish_colony(
            &mut world,
            PlayerId(0),
            "sol 1",
            ColonyName::Custom("Landfall".into()),
            &mut names,
        )
        .unwrap();
        let err = establish_colony(
            &mut world,
            PlayerId(1),
            "sol 1a",
            ColonyName::Custom("LANDFALL".into()),
            &mut names,
        )
        .unwrap_err();
        assert!(matches!(err, GameError::NameCollision { kind: EntityKind::Colony, .. }));
        assert!(world.system.planets[0].moons[0].colonies.is_empty());
    }

    #[test]
    fn colonies_on_lists_in_order() {
        let mut world = world();
        let mut names = Counter(0);
        establish_colony(&mut world, PlayerId(0), "sol 1", ColonyName::Generated, &mut names).unwrap();
        establish_colony(&mut world, PlayerId(1), "sol 1", ColonyName::Generated, &mut names).unwrap();
        let listed: Vec<_> = colonies_on(&world, BodyRef::Planet(0))
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(listed, vec!["Colony 1", "Colony 2"]);
    }
}
