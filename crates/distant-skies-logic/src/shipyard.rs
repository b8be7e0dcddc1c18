//! Ship purchase at a player's colony.

use serde::{Deserialize, Serialize};

use crate::builds::BuildKind;
use crate::colony::ColonyId;
use crate::error::{EntityKind, GameError};
use crate::fleet::{Fleet, FleetId, Location, Ship};
use crate::player::PlayerId;
use crate::world::WorldState;

/// What the player asked the shipyard for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Catalog name of the build.
    pub build: String,
    /// Name of one of the player's colonies.
    pub origin_colony: String,
    /// Custom ship name (None = `<build><n>`).
    pub ship_name: Option<String>,
    /// Fleet docked at the origin colony to join (None = new fleet).
    pub join_fleet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub ship_name: String,
    pub build: BuildKind,
    pub fleet: FleetId,
    pub fleet_name: String,
    pub colony: ColonyId,
    /// True when the ship joined a fleet that was already docked.
    pub joined_existing: bool,
}

/// Build a ship at one of the player's colonies.
///
/// The new ship either joins a fleet docked at the colony or starts its own
/// fleet named `"<ship> Fleet"`. A custom name that matches one of the
/// player's ships (exact, case-sensitive) fails with `NameCollision` so the
/// caller can ask again.
pub fn purchase_ship(
    world: &mut WorldState,
    player_id: PlayerId,
    order: &PurchaseOrder,
) -> Result<PurchaseReceipt, GameError> {
    let player = world.player(player_id)?;
    let build = BuildKind::from_name(&order.build)
        .ok_or_else(|| GameError::UnknownBuild(order.build.trim().to_string()))?;

    let owned_ships: Vec<&Ship> = player
        .owned_fleets
        .values()
        .filter_map(|id| world.fleet(*id))
        .flat_map(|f| f.members.iter())
        .collect();
    let same_build = owned_ships.iter().filter(|s| s.build == build).count();

    let colony_id = *player
        .owned_colonies
        .get(&order.origin_colony.trim().to_lowercase())
        .ok_or_else(|| GameError::UnknownColony(order.origin_colony.trim().to_string()))?;

    let taken = |name: &str| owned_ships.iter().any(|s| s.name == name);
    let ship_name = match &order.ship_name {
        Some(custom) => {
            let custom = custom.trim();
            if custom.is_empty() || taken(custom) {
                return Err(GameError::collision(EntityKind::Ship, custom));
            }
            custom.to_string()
        }
        None => (same_build + 1..)
            .map(|n| format!("{}{}", build.name(), n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| build.name().to_string()),
    };

    let colony = world
        .colony(colony_id)
        .ok_or_else(|| GameError::UnknownColony(order.origin_colony.trim().to_string()))?;
    let colony_name = colony.name.clone();

    let receipt = match &order.join_fleet {
        Some(wanted) => {
            let fleet_id = *colony
                .docked
                .get(&wanted.trim().to_lowercase())
                .ok_or_else(|| GameError::not_found(EntityKind::Fleet, wanted.trim()))?;
            let fleet = world
                .fleet_mut(fleet_id)
                .ok_or_else(|| GameError::not_found(EntityKind::Fleet, wanted.trim()))?;
            fleet
                .members
                .push(Ship::new(ship_name.clone(), build, fleet.name.clone()));
            PurchaseReceipt {
                ship_name,
                build,
                fleet: fleet_id,
                fleet_name: fleet.name.clone(),
                colony: colony_id,
                joined_existing: true,
            }
        }
        None => {
            let fleet_name = format!("{} Fleet", ship_name);
            let key = fleet_name.to_lowercase();
            if world.player(player_id)?.owned_fleets.contains_key(&key) {
                return Err(GameError::collision(EntityKind::Fleet, fleet_name));
            }
            let fleet_id = FleetId(world.fleets.len() as u32);
            world.fleets.push(Fleet {
                id: fleet_id,
                name: fleet_name.clone(),
                owner: player_id,
                location: Location::Colony(colony_id),
                members: vec![Ship::new(ship_name.clone(), build, fleet_name.clone())],
            });
            if let Some(colony) = world.colony_mut(colony_id) {
                colony.docked.insert(key.clone(), fleet_id);
            }
            world.player_mut(player_id)?.owned_fleets.insert(key, fleet_id);
            PurchaseReceipt {
                ship_name,
                build,
                fleet: fleet_id,
                fleet_name,
                colony: colony_id,
                joined_existing: false,
            }
        }
    };

    log::info!(
        "Purchase successful! {} has been added to {} at {}",
        receipt.ship_name,
        receipt.fleet_name,
        colony_name
    );
    Ok(receipt)
}
