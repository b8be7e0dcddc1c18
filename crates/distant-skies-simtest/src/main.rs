//! Distant Skies Headless Scenario Harness
//!
//! Drives the game logic through generation sweeps and scripted turns and
//! checks the world invariants after each step. No console, no prompts.
//!
//! Usage:
//!   cargo run -p distant-skies-simtest
//!   cargo run -p distant-skies-simtest -- --verbose
//!   cargo run -p distant-skies-simtest -- --seed 7
//!
//! Library logs go to stderr; set `RUST_LOG=info` to see them.

use std::collections::HashSet;

use distant_skies_logic::builds::BuildKind;
use distant_skies_logic::celestial::{BodyRef, PlanetKind, Site};
use distant_skies_logic::colony::{establish_colony, ColonyName};
use distant_skies_logic::draws::GAS_GIANT_MOON_BOUND;
use distant_skies_logic::engine::{Outcome, Session};
use distant_skies_logic::error::GameError;
use distant_skies_logic::fleet::{begin_move, resolve_arrivals, Location, MoveOutcome};
use distant_skies_logic::generation::{
    generate_system, validate_config, ExplicitLayout, ExplicitPlanet, SystemConfig,
};
use distant_skies_logic::names::LibraryNames;
use distant_skies_logic::player::{join_players, PlayerId, PlayerSetup};
use distant_skies_logic::registry::index;
use distant_skies_logic::reports::describe_system;
use distant_skies_logic::shipyard::{purchase_ship, PurchaseOrder};
use distant_skies_logic::world::WorldState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random systems generated per sweep.
const SWEEP: u64 = 200;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn parse_seed() -> u64 {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    let seed = parse_seed();
    println!("=== Distant Skies Scenario Harness (seed {}) ===\n", seed);

    let mut results = Vec::new();

    // 1. Random generation sweep
    results.extend(validate_generation(seed, verbose));

    // 2. Explicit layouts
    results.extend(validate_explicit_layouts(verbose));

    // 3. Registry
    results.extend(validate_registry(seed));

    // 4. Colony rules
    results.extend(validate_colonies(seed));

    // 5. Shipyard and fleets
    results.extend(validate_fleets(seed));

    // 6. Scripted session
    results.extend(validate_session(seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded(seed: u64) -> SystemConfig {
    SystemConfig {
        seed: Some(seed),
        ..SystemConfig::default()
    }
}

fn world_for(seed: u64, players: usize) -> Result<WorldState, GameError> {
    let system = generate_system(&seeded(seed))?;
    Ok(WorldState::new(system, join_players(&PlayerSetup::Numbered(players))?))
}

// ── 1. Random Generation ────────────────────────────────────────────────

fn validate_generation(base: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Generation ---");
    let mut results = Vec::new();

    let mut failures = Vec::new();
    let mut bad_frost = 0;
    let mut bad_moons = 0;
    let mut star_histogram = [0u32; 6];
    for seed in base..base + SWEEP {
        let system = match generate_system(&seeded(seed)) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("seed {}: {}", seed, e));
                continue;
            }
        };
        star_histogram[system.stars.len().min(5)] += 1;
        if system.stars.is_empty() || system.planets.is_empty() {
            failures.push(format!("seed {}: empty system", seed));
        }
        let line = system.frost_line();
        for (i, planet) in system.planets.iter().enumerate() {
            let terrestrial = (i as f64 + 1.0) <= line;
            let ok = if terrestrial {
                planet.kind == PlanetKind::Terrestrial && (3..=6).contains(&planet.area)
            } else {
                planet.kind == PlanetKind::GasGiant && planet.area == 0
            };
            if !ok {
                bad_frost += 1;
            }
            let size = if planet.area == 0 {
                GAS_GIANT_MOON_BOUND
            } else {
                planet.area
            };
            let bound = if size > 5 { size / 2 } else { size };
            bad_moons += planet
                .moons
                .iter()
                .filter(|m| m.area < 1 || m.area >= bound)
                .count();
        }
    }

    results.push(TestResult {
        name: "generation_succeeds".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!("{} systems generated", SWEEP)
        } else {
            failures.join("; ")
        },
    });
    results.push(TestResult {
        name: "generation_frost_line".into(),
        passed: bad_frost == 0,
        detail: format!("{} planets on the wrong side of the frost line", bad_frost),
    });
    results.push(TestResult {
        name: "generation_moon_bounds".into(),
        passed: bad_moons == 0,
        detail: format!("{} moons outside 1..bound", bad_moons),
    });

    let a = generate_system(&seeded(base));
    let b = generate_system(&seeded(base));
    results.push(TestResult {
        name: "generation_deterministic".into(),
        passed: matches!((&a, &b), (Ok(x), Ok(y)) if x == y),
        detail: "same seed, same system".into(),
    });

    // Single-star systems should dominate the weighted draw.
    results.push(TestResult {
        name: "generation_star_weights".into(),
        passed: star_histogram[1] > star_histogram[2] && star_histogram[2] > star_histogram[3],
        detail: format!("star count histogram {:?}", &star_histogram[1..]),
    });

    if verbose {
        if let Ok(system) = a {
            println!("{}", describe_system(&system));
        }
    }

    results
}

// ── 2. Explicit Layouts ─────────────────────────────────────────────────

fn validate_explicit_layouts(verbose: bool) -> Vec<TestResult> {
    println!("--- Explicit Layouts ---");
    let mut results = Vec::new();

    let twin = SystemConfig::explicit(ExplicitLayout {
        star_temperatures: vec![4, 4],
        planets: vec![ExplicitPlanet::new(3, vec![]); 5],
    });
    match generate_system(&twin) {
        Ok(system) => results.push(TestResult {
            name: "explicit_frost_line".into(),
            passed: system.frost_line() == 4.0
                && system.planets[3].kind == PlanetKind::Terrestrial
                && system.planets[4].kind == PlanetKind::GasGiant,
            detail: format!("frost line {:.2}", system.frost_line()),
        }),
        Err(e) => results.push(TestResult {
            name: "explicit_frost_line".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let broken = SystemConfig::explicit(ExplicitLayout {
        star_temperatures: vec![0],
        planets: vec![ExplicitPlanet::new(11, vec![]), ExplicitPlanet::new(3, vec![3])],
    });
    let errors = validate_config(&broken);
    results.push(TestResult {
        name: "explicit_rejects_bad_config".into(),
        passed: errors.len() == 3
            && matches!(generate_system(&broken), Err(GameError::InvalidConfiguration(_))),
        detail: format!("{} config errors reported", errors.len()),
    });
    if verbose {
        for e in &errors {
            println!("    {}", e);
        }
    }

    results
}

// ── 3. Registry ─────────────────────────────────────────────────────────

fn validate_registry(base: u64) -> Vec<TestResult> {
    println!("--- Registry ---");
    let mut results = Vec::new();

    let mut mismatched = 0;
    let mut incomplete = 0;
    for seed in base..base + SWEEP / 4 {
        let Ok(system) = generate_system(&seeded(seed)) else {
            incomplete += 1;
            continue;
        };
        if index(&system) != index(&system) {
            mismatched += 1;
        }
        let registry = index(&system);
        let all_found = system.bodies().all(|b| {
            system
                .body_name(b)
                .map(|n| registry.lookup(&n.to_uppercase()) == Some(b))
                .unwrap_or(false)
        });
        if !all_found || registry.len() != system.planets.len() + system.moon_count() {
            incomplete += 1;
        }
    }
    results.push(TestResult {
        name: "registry_idempotent".into(),
        passed: mismatched == 0,
        detail: format!("{} seeds with differing indexes", mismatched),
    });
    results.push(TestResult {
        name: "registry_complete".into(),
        passed: incomplete == 0,
        detail: format!("{} seeds with unindexed bodies", incomplete),
    });

    match world_for(base, 2) {
        Ok(mut world) => {
            let blank_rejected = world.rename_system("  ").is_err()
                && world.registry.lookup("default 1") == Some(BodyRef::Planet(0));
            results.push(TestResult {
                name: "registry_blank_rename".into(),
                passed: blank_rejected,
                detail: "blank system name rejected, bodies still resolve".into(),
            });
            let renamed = world.rename_system("Tabby").is_ok()
                && world.registry.lookup("tabby 1") == Some(BodyRef::Planet(0))
                && world.registry.lookup("default 1").is_none()
                && world.system.planets[0].designation == "1";
            results.push(TestResult {
                name: "registry_rename".into(),
                passed: renamed,
                detail: "rename rewrites prefixes and reindexes".into(),
            });
        }
        Err(e) => results.push(TestResult {
            name: "registry_rename".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 4. Colony Rules ─────────────────────────────────────────────────────

fn validate_colonies(base: u64) -> Vec<TestResult> {
    println!("--- Colony Rules ---");
    let mut results = Vec::new();

    // Random play across many systems never breaks capacity.
    let mut violations = Vec::new();
    let mut gas_giant_accepts = 0;
    let mut founded = 0;
    let mut names_seen = HashSet::new();
    let mut duplicate_names = 0;
    for seed in base..base + SWEEP / 4 {
        let Ok(mut world) = world_for(seed, 4) else {
            violations.push(format!("seed {}: generation failed", seed));
            continue;
        };
        let mut names = LibraryNames::new(StdRng::seed_from_u64(seed));
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        let bodies: Vec<BodyRef> = world.system.bodies().collect();
        names_seen.clear();
        for _ in 0..50 {
            let body = bodies[rng.gen_range(0..bodies.len())];
            let player = PlayerId(rng.gen_range(0..world.players.len()));
            let name = world.body_name(body);
            let gas_giant = world.system.site(body).map_or(false, |s| s.is_gas_giant());
            if let Ok(id) = establish_colony(&mut world, player, &name, ColonyName::Generated, &mut names) {
                founded += 1;
                if gas_giant {
                    gas_giant_accepts += 1;
                }
                if let Some(colony) = world.colony(id) {
                    if !names_seen.insert(colony.key()) {
                        duplicate_names += 1;
                    }
                }
            }
        }
        let audit = world.audit();
        if !audit.is_empty() {
            violations.push(format!("seed {}: {}", seed, audit.join(", ")));
        }
    }
    results.push(TestResult {
        name: "colony_invariants_hold".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            format!("{} colonies founded, no violations", founded)
        } else {
            violations.join("; ")
        },
    });
    results.push(TestResult {
        name: "colony_gas_giants_rejected".into(),
        passed: gas_giant_accepts == 0,
        detail: format!("{} colonies accepted on gas giants", gas_giant_accepts),
    });
    results.push(TestResult {
        name: "colony_names_unique".into(),
        passed: duplicate_names == 0,
        detail: format!("{} duplicate colony names", duplicate_names),
    });

    // Area 3, three colonies, then full.
    let config = SystemConfig::explicit(ExplicitLayout {
        star_temperatures: vec![4],
        planets: vec![ExplicitPlanet::new(3, vec![]), ExplicitPlanet::new(0, vec![])],
    });
    let outcome = generate_system(&config)
        .and_then(|system| Ok(WorldState::new(system, join_players(&PlayerSetup::Numbered(2))?)))
        .map(|mut world| {
            let mut names = LibraryNames::new(StdRng::seed_from_u64(base));
            let attempts: Vec<_> = (0..4)
                .map(|_| {
                    establish_colony(&mut world, PlayerId(0), "default 1", ColonyName::Generated, &mut names)
                })
                .collect();
            let gas = establish_colony(&mut world, PlayerId(1), "default 2", ColonyName::Generated, &mut names);
            (attempts, gas)
        });
    match outcome {
        Ok((attempts, gas)) => {
            let capacity_ok = attempts[..3].iter().all(Result::is_ok)
                && matches!(attempts[3], Err(GameError::CapacityExceeded { capacity: 3, .. }));
            results.push(TestResult {
                name: "colony_capacity_scenario".into(),
                passed: capacity_ok,
                detail: format!("fourth attempt: {:?}", attempts[3]),
            });
            results.push(TestResult {
                name: "colony_gas_giant_scenario".into(),
                passed: matches!(gas, Err(GameError::GasGiantIneligible(_))),
                detail: format!("{:?}", gas),
            });
        }
        Err(e) => results.push(TestResult {
            name: "colony_capacity_scenario".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 5. Shipyard & Fleets ────────────────────────────────────────────────

fn validate_fleets(base: u64) -> Vec<TestResult> {
    println!("--- Shipyard & Fleets ---");
    let mut results = Vec::new();

    let config = SystemConfig::explicit(ExplicitLayout {
        star_temperatures: vec![6],
        planets: vec![ExplicitPlanet::new(4, vec![2]), ExplicitPlanet::new(0, vec![])],
    });
    let world = generate_system(&config)
        .and_then(|system| Ok(WorldState::new(system, join_players(&PlayerSetup::Numbered(2))?)));
    let mut world = match world {
        Ok(w) => w,
        Err(e) => {
            results.push(TestResult {
                name: "fleet_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let mut names = LibraryNames::new(StdRng::seed_from_u64(base));
    if let Err(e) = establish_colony(
        &mut world,
        PlayerId(0),
        "default 1",
        ColonyName::Custom("Dockyard".into()),
        &mut names,
    ) {
        results.push(TestResult {
            name: "fleet_setup".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }

    let order = |build: BuildKind, join: Option<&str>| PurchaseOrder {
        build: build.name().to_string(),
        origin_colony: "dockyard".into(),
        ship_name: None,
        join_fleet: join.map(str::to_string),
    };

    let first = purchase_ship(&mut world, PlayerId(0), &order(BuildKind::CapitalShip, None));
    let singleton = match &first {
        Ok(r) => {
            r.fleet_name == "capital ship1 Fleet"
                && world
                    .colony(r.colony)
                    .map_or(false, |c| c.docked.contains_key("capital ship1 fleet"))
                && world.players[0].owned_fleets.contains_key("capital ship1 fleet")
        }
        Err(_) => false,
    };
    results.push(TestResult {
        name: "fleet_singleton_purchase".into(),
        passed: singleton,
        detail: format!("{:?}", first.as_ref().map(|r| &r.fleet_name)),
    });

    let joined = purchase_ship(
        &mut world,
        PlayerId(0),
        &order(BuildKind::Fighter, Some("capital ship1 fleet")),
    );
    let join_ok = match (&first, &joined) {
        (Ok(a), Ok(b)) => {
            b.joined_existing
                && a.fleet == b.fleet
                && world.fleet(a.fleet).map_or(0, |f| f.members.len()) == 2
        }
        _ => false,
    };
    results.push(TestResult {
        name: "fleet_join_docked".into(),
        passed: join_ok,
        detail: "second ship joins the docked fleet".into(),
    });

    let unknown = purchase_ship(&mut world, PlayerId(0), &PurchaseOrder {
        build: "frigate".into(),
        ..order(BuildKind::Fighter, None)
    });
    results.push(TestResult {
        name: "fleet_unknown_build".into(),
        passed: matches!(unknown, Err(GameError::UnknownBuild(_))),
        detail: format!("{:?}", unknown.map(|r| r.ship_name)),
    });

    if let Ok(receipt) = first {
        let destination = BodyRef::Moon { planet: 0, moon: 0 };
        let departed = begin_move(&mut world, receipt.fleet, destination);
        let again = begin_move(&mut world, receipt.fleet, BodyRef::Planet(1));
        let undocked = world
            .colony(receipt.colony)
            .map_or(false, |c| c.docked.is_empty());
        results.push(TestResult {
            name: "fleet_departure".into(),
            passed: matches!(departed, Ok(MoveOutcome::Departed(_)))
                && again == Ok(MoveOutcome::AlreadyInFlight)
                && undocked,
            detail: "fleet enters orbit once and leaves the dock".into(),
        });

        let arrived = resolve_arrivals(&mut world, PlayerId(0));
        let landed = world.fleet(receipt.fleet).map(|f| f.location);
        results.push(TestResult {
            name: "fleet_arrival".into(),
            passed: arrived.map_or(false, |a| a == vec![receipt.fleet])
                && landed == Some(Location::Moon { planet: 0, moon: 0 }),
            detail: format!("landed at {:?}", landed),
        });
    }

    let audit = world.audit();
    results.push(TestResult {
        name: "fleet_invariants_hold".into(),
        passed: audit.is_empty(),
        detail: if audit.is_empty() {
            "ownership consistent".into()
        } else {
            audit.join("; ")
        },
    });

    results
}

// ── 6. Scripted Session ─────────────────────────────────────────────────

fn validate_session(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Session ---");
    let mut results = Vec::new();

    let config = SystemConfig::explicit(ExplicitLayout {
        star_temperatures: vec![5],
        planets: vec![
            ExplicitPlanet::new(5, vec![3]),
            ExplicitPlanet::new(4, vec![]),
            ExplicitPlanet::new(0, vec![6, 2]),
        ],
    });
    let config = SystemConfig {
        seed: Some(seed),
        ..config
    };
    let mut session = match Session::start(&config, &PlayerSetup::Numbered(3), Some("Ross")) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "session_start".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    // Each player keeps trying bodies until their first colony sticks.
    let candidates = ["ross 3", "ross 1", "ross 2", "ross 1a", "ross 3a"];
    let mut placement_failures = 0;
    for player in session.awaiting_first_colony() {
        let placed = candidates.iter().any(|body| {
            let ok = session
                .place_first_colony(player, body, ColonyName::Generated)
                .is_ok();
            if !ok {
                placement_failures += 1;
            }
            ok
        });
        if !placed {
            placement_failures += 100;
        }
    }
    results.push(TestResult {
        name: "session_first_colonies".into(),
        passed: session.awaiting_first_colony().is_empty(),
        detail: format!("{} rejected placements before success", placement_failures),
    });

    let home = session
        .world
        .players
        .first()
        .and_then(|p| p.owned_colonies.values().next().copied())
        .and_then(|id| session.world.colony(id))
        .map(|c| c.name.clone())
        .unwrap_or_default();

    let script = [
        format!("purchase fighter at {}", home),
        "move fleet fighter1 fleet to ross 3b".to_string(),
        "get ships".to_string(),
        "end turn".to_string(),
        "end turn".to_string(),
        "end turn".to_string(),
    ];
    let mut script_errors = Vec::new();
    for line in &script {
        match session.submit(line) {
            Ok(outcome) => {
                if verbose {
                    println!("    > {} => {:?}", line, outcome);
                }
            }
            Err(e) => script_errors.push(format!("{}: {}", line, e)),
        }
    }
    results.push(TestResult {
        name: "session_script".into(),
        passed: script_errors.is_empty(),
        detail: if script_errors.is_empty() {
            format!("{} commands executed", script.len())
        } else {
            script_errors.join("; ")
        },
    });

    let worth: Vec<i64> = session.world.players.iter().map(|p| p.net_worth).collect();
    results.push(TestResult {
        name: "session_round_and_production".into(),
        passed: session.round() == 2
            && session.active_player() == PlayerId(0)
            && worth.iter().all(|&w| w == 25),
        detail: format!("round {}, net worth {:?}", session.round(), worth),
    });

    let rejected = session.submit("establish ross 3").is_err()
        && session.submit("launch everything").is_err()
        && session.active_player() == PlayerId(0);
    results.push(TestResult {
        name: "session_errors_keep_turn".into(),
        passed: rejected,
        detail: "failed commands do not end the turn".into(),
    });

    let snapshot = match session.submit("save") {
        Ok(Outcome::Snapshot(json)) => Some(json),
        _ => None,
    };
    let restored = snapshot
        .as_deref()
        .map(|json| WorldState::from_json(json).map(|w| w == session.world));
    let has_players = snapshot
        .as_deref()
        .and_then(|json| serde_json::from_str::<serde_json::Value>(json).ok())
        .and_then(|v| v.get("players").and_then(|p| p.as_array()).map(|a| a.len()));
    results.push(TestResult {
        name: "session_snapshot".into(),
        passed: matches!(restored, Some(Ok(true))) && has_players == Some(3),
        detail: format!(
            "{} bytes, {:?} players",
            snapshot.as_ref().map_or(0, String::len),
            has_players
        ),
    });

    let audit = session.world.audit();
    results.push(TestResult {
        name: "session_invariants_hold".into(),
        passed: audit.is_empty() && session.world.system.capacity_respected(),
        detail: if audit.is_empty() {
            "ownership consistent".into()
        } else {
            audit.join("; ")
        },
    });

    results
}
