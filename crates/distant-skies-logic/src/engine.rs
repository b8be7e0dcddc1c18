//! Turn engine.
//!
//! A [`Session`] owns the world and whose turn it is. The console front end
//! parses a line into a [`Command`], hands it to [`Session::execute`] and
//! renders the returned [`Outcome`]. A failed command never ends the turn.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::colony::{establish_colony, ColonyId, ColonyName};
use crate::command::{Command, ParseError};
use crate::error::{EntityKind, GameError};
use crate::fleet::{begin_move, resolve_arrivals, FleetId, MoveOutcome};
use crate::generation::{generate_system_with, SystemConfig};
use crate::names::{LibraryNames, NameSource};
use crate::player::{join_players, PlayerId, PlayerSetup};
use crate::reports::{list_colonies, list_ships, ColonyListing, ShipListing};
use crate::shipyard::{purchase_ship, PurchaseReceipt};
use crate::world::{SnapshotError, WorldState};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Result of a successful command, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// JSON snapshot of the world.
    Snapshot(String),
    ColonyEstablished {
        colony: String,
        body: String,
    },
    Colonies {
        body: String,
        colonies: Vec<ColonyListing>,
    },
    Ships {
        player: String,
        ships: Vec<ShipListing>,
    },
    ShipPurchased(PurchaseReceipt),
    FleetMoved {
        fleet: String,
        outcome: MoveOutcome,
    },
    TurnEnded(TurnSummary),
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnSummary {
    pub ended: PlayerId,
    pub next: PlayerId,
    /// Round the next player is playing in.
    pub round: u32,
    pub income: i64,
    pub arrivals: Vec<FleetId>,
}

pub struct Session<N: NameSource> {
    pub world: WorldState,
    active: PlayerId,
    round: u32,
    names: N,
    stopped: bool,
}

impl Session<LibraryNames<StdRng>> {
    /// Generate a system, seat the players and start round 1.
    ///
    /// The same RNG drives generation and colony naming, so a seeded config
    /// replays identically.
    pub fn start(
        config: &SystemConfig,
        players: &PlayerSetup,
        system_name: Option<&str>,
    ) -> Result<Self, GameError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let system = generate_system_with(config, &mut rng)?;
        let players = join_players(players)?;
        let mut world = WorldState::new(system, players);
        if let Some(name) = system_name {
            world.rename_system(name)?;
        }
        log::info!(
            "Game started in the {} system with {} players",
            world.system.name,
            world.players.len()
        );
        Ok(Self::new(world, LibraryNames::new(rng)))
    }
}

impl<N: NameSource> Session<N> {
    pub fn new(world: WorldState, names: N) -> Self {
        Self {
            world,
            active: PlayerId(0),
            round: 1,
            names,
            stopped: false,
        }
    }

    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Players that still need their first colony, in turn order.
    pub fn awaiting_first_colony(&self) -> Vec<PlayerId> {
        self.world
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owned_colonies.is_empty())
            .map(|(i, _)| PlayerId(i))
            .collect()
    }

    /// Found a player's starting colony. On error nothing changes and the
    /// caller asks again.
    pub fn place_first_colony(
        &mut self,
        player: PlayerId,
        body: &str,
        naming: ColonyName,
    ) -> Result<ColonyId, GameError> {
        establish_colony(&mut self.world, player, body, naming, &mut self.names)
    }

    /// Parse and run one line of player input.
    pub fn submit(&mut self, line: &str) -> Result<Outcome, SessionError> {
        let command = Command::parse_in(line, &self.world).map_err(|e| {
            log::warn!("Rejected input {:?}: {}", line, e);
            e
        })?;
        self.execute(command)
    }

    /// Run a command for the active player.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let result = self.dispatch(command);
        if let Err(e) = &result {
            log::warn!("Command failed for {}: {}", self.active_name(), e);
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let player = self.active;
        match command {
            Command::Save => Ok(Outcome::Snapshot(self.world.to_json()?)),
            Command::Establish { body, colony_name } => {
                let naming = match colony_name {
                    Some(name) => ColonyName::Custom(name),
                    None => ColonyName::Generated,
                };
                let id = establish_colony(&mut self.world, player, &body, naming, &mut self.names)?;
                let colony = self
                    .world
                    .colony(id)
                    .ok_or_else(|| GameError::not_found(EntityKind::Colony, format!("#{}", id.0)))?;
                Ok(Outcome::ColonyEstablished {
                    colony: colony.name.clone(),
                    body: self.world.body_name(colony.site),
                })
            }
            Command::GetColonies { body } => {
                let found = self
                    .world
                    .registry
                    .lookup(&body)
                    .ok_or_else(|| GameError::not_found(EntityKind::Body, body.trim()))?;
                Ok(Outcome::Colonies {
                    body: self.world.body_name(found),
                    colonies: list_colonies(&self.world, found),
                })
            }
            Command::GetShips { player: named } => {
                let whose = match named {
                    Some(name) => self
                        .world
                        .find_player(&name)
                        .ok_or_else(|| GameError::not_found(EntityKind::Player, name.trim()))?,
                    None => player,
                };
                Ok(Outcome::Ships {
                    player: self.world.player(whose)?.name.clone(),
                    ships: list_ships(&self.world, whose)?,
                })
            }
            Command::Purchase(order) => Ok(Outcome::ShipPurchased(purchase_ship(
                &mut self.world,
                player,
                &order,
            )?)),
            Command::MoveFleet { fleet, destination } => {
                let fleet_id = self.world.owned_fleet(player, &fleet)?;
                let target = self.world.resolve_destination(&destination)?;
                let outcome = begin_move(&mut self.world, fleet_id, target)?;
                let fleet = self
                    .world
                    .fleet(fleet_id)
                    .map(|f| f.name.clone())
                    .unwrap_or(fleet);
                Ok(Outcome::FleetMoved { fleet, outcome })
            }
            Command::EndTurn => Ok(Outcome::TurnEnded(self.end_turn()?)),
            Command::Stop => {
                self.stopped = true;
                log::info!("Game stopped by {}", self.active_name());
                Ok(Outcome::Stopped)
            }
        }
    }

    /// Land the active player's fleets, credit colony production and pass
    /// the turn on. The round advances when play wraps to the first player.
    pub fn end_turn(&mut self) -> Result<TurnSummary, GameError> {
        let ended = self.active;
        let arrivals = resolve_arrivals(&mut self.world, ended)?;

        let income: i64 = self
            .world
            .player(ended)?
            .owned_colonies
            .values()
            .filter_map(|id| self.world.colony(*id))
            .map(|c| i64::from(c.production_per_turn))
            .sum();
        self.world.player_mut(ended)?.net_worth += income;

        let next = PlayerId((ended.0 + 1) % self.world.players.len().max(1));
        if next.0 == 0 {
            self.round += 1;
        }
        self.active = next;

        log::info!(
            "{} ended their turn (+{} net worth), {} is up in round {}",
            self.world.player(ended)?.name,
            income,
            self.active_name(),
            self.round
        );
        Ok(TurnSummary {
            ended,
            next,
            round: self.round,
            income,
            arrivals,
        })
    }

    fn active_name(&self) -> String {
        self.world
            .player(self.active)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}
