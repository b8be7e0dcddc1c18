//! Procedural star system generation.
//!
//! A system is built either from random draws or from an explicit layout
//! (the numeric answers a player gives when designing a system by hand).
//!
//! # Random generation
//!
//! 1. Draw the star count (weighted) and each star's temperature (1–7).
//! 2. `frost_line = Σ sqrt(temperature)`. Planet slots with a 1-based index
//!    at or inside the frost line are terrestrial, the rest gas giants.
//! 3. Planet count is one diminishing contribution per star, clamped to the
//!    configured maximum.
//! 4. Terrestrial planets get 3–6 colony sites; gas giants get none and use a
//!    fixed size of 8 when bounding their moons.
//! 5. Moons are named `<planet designation><letter>` and are always smaller
//!    than their bounding size.
//!
//! ```
//! use distant_skies_logic::generation::{generate_system, SystemConfig};
//!
//! let config = SystemConfig {
//!     seed: Some(42),
//!     ..SystemConfig::default()
//! };
//! let system = generate_system(&config).unwrap();
//! assert!(!system.stars.is_empty());
//! assert!(!system.planets.is_empty());
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::celestial::{frost_line, Moon, Planet, PlanetKind, Star, System, DEFAULT_SYSTEM_NAME};
use crate::draws::{self, GAS_GIANT_MOON_BOUND};
use crate::error::{ConfigError, GameError};

/// Largest planet area accepted in an explicit layout.
pub const MAX_EXPLICIT_AREA: u32 = 10;

/// Moons are lettered a–z.
pub const MAX_MOONS_PER_PLANET: usize = 26;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// One planet of a hand-designed system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitPlanet {
    /// Colony sites (0 makes the planet a gas giant).
    pub area: u32,
    /// Area of each moon, in orbital order.
    pub moon_areas: Vec<u32>,
}

impl ExplicitPlanet {
    pub fn new(area: u32, moon_areas: Vec<u32>) -> Self {
        Self { area, moon_areas }
    }

    /// Exclusive upper bound for this planet's moon areas.
    pub fn moon_bound(&self) -> u32 {
        if self.area == 0 {
            GAS_GIANT_MOON_BOUND
        } else {
            self.area
        }
    }
}

/// Every dimension of a hand-designed system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitLayout {
    pub star_temperatures: Vec<u8>,
    pub planets: Vec<ExplicitPlanet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    #[default]
    Random,
    Explicit(ExplicitLayout),
}

/// Inputs for [`generate_system`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub mode: GenerationMode,
    /// Cap on the total number of planets (None = uncapped).
    pub max_planets: Option<u32>,
    /// Random seed (None = seeded from entropy).
    pub seed: Option<u64>,
    /// Name given to the system before the player renames it.
    pub name: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Random,
            max_planets: None,
            seed: None,
            name: DEFAULT_SYSTEM_NAME.to_string(),
        }
    }
}

impl SystemConfig {
    pub fn explicit(layout: ExplicitLayout) -> Self {
        Self {
            mode: GenerationMode::Explicit(layout),
            ..Self::default()
        }
    }
}

/// Validate a system configuration, returning all errors found.
pub fn validate_config(config: &SystemConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ConfigError::EmptySystemName);
    }
    if config.max_planets == Some(0) {
        errors.push(ConfigError::ZeroMaxPlanets);
    }

    let GenerationMode::Explicit(layout) = &config.mode else {
        return errors;
    };

    if layout.star_temperatures.is_empty() {
        errors.push(ConfigError::NoStars);
    }
    for (index, &temperature) in layout.star_temperatures.iter().enumerate() {
        if !(draws::STAR_TEMPERATURE_RANGE.0..=draws::STAR_TEMPERATURE_RANGE.1)
            .contains(&temperature)
        {
            errors.push(ConfigError::StarTemperatureOutOfRange { index, temperature });
        }
    }

    if layout.planets.is_empty() {
        errors.push(ConfigError::NoPlanets);
    }
    for (index, planet) in layout.planets.iter().enumerate() {
        if planet.area > MAX_EXPLICIT_AREA {
            errors.push(ConfigError::PlanetAreaOutOfRange {
                index,
                area: planet.area,
                max: MAX_EXPLICIT_AREA,
            });
        }
        if planet.moon_areas.len() > MAX_MOONS_PER_PLANET {
            errors.push(ConfigError::TooManyMoons {
                planet: index,
                count: planet.moon_areas.len(),
                max: MAX_MOONS_PER_PLANET,
            });
        }
        let max = planet.moon_bound().saturating_sub(1);
        for (moon, &area) in planet.moon_areas.iter().enumerate() {
            if area < 1 || area > max {
                errors.push(ConfigError::MoonAreaOutOfRange {
                    planet: index,
                    moon,
                    area,
                    max,
                });
            }
        }
    }

    errors
}

// ============================================================================
// GENERATION
// ============================================================================

/// Generate a system, seeding the RNG from the config.
pub fn generate_system(config: &SystemConfig) -> Result<System, GameError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_system_with(config, &mut rng)
}

/// Generate a system using the caller's RNG.
///
/// Fails fast with [`GameError::InvalidConfiguration`] before drawing
/// anything if the config is malformed.
pub fn generate_system_with(config: &SystemConfig, rng: &mut impl Rng) -> Result<System, GameError> {
    let errors = validate_config(config);
    if !errors.is_empty() {
        log::warn!("Refusing to generate system: {} config errors", errors.len());
        return Err(GameError::InvalidConfiguration(errors));
    }

    let (stars, planets) = match &config.mode {
        GenerationMode::Random => random_bodies(config.max_planets, rng),
        GenerationMode::Explicit(layout) => explicit_bodies(layout, config.max_planets),
    };

    let system = System::new(config.name.clone(), stars, planets);
    log::info!(
        "Generated system {} (frost line {:.2})",
        system,
        system.frost_line()
    );
    Ok(system)
}

fn random_bodies(max_planets: Option<u32>, rng: &mut impl Rng) -> (Vec<Star>, Vec<Planet>) {
    let star_count = draws::draw_star_count(rng);
    let stars: Vec<Star> = (0..star_count)
        .map(|_| Star::new(draws::draw_star_temperature(rng)))
        .collect();
    let line = frost_line(&stars);

    let mut planet_count = draws::draw_planet_count(star_count, rng);
    if let Some(max) = max_planets {
        planet_count = planet_count.min(max);
    }
    // At least one planet per system.
    planet_count = planet_count.max(1);

    let planets = (1..=planet_count)
        .map(|index| {
            let designation = index.to_string();
            match PlanetKind::classify(index, line) {
                PlanetKind::Terrestrial => {
                    let area = draws::draw_terrestrial_area(rng);
                    let moons = random_moons(&designation, area, rng);
                    Planet::new(designation, area, PlanetKind::Terrestrial, moons)
                }
                PlanetKind::GasGiant => {
                    let moons = random_moons(&designation, GAS_GIANT_MOON_BOUND, rng);
                    Planet::new(designation, 0, PlanetKind::GasGiant, moons)
                }
            }
        })
        .collect();

    (stars, planets)
}

fn random_moons(designation: &str, size: u32, rng: &mut impl Rng) -> Vec<Moon> {
    let plan = draws::draw_moon_plan(size, rng);
    log::debug!(
        "Planet {}: {} moons bounded by {}",
        designation,
        plan.count,
        plan.bound
    );
    (0..plan.count as usize)
        .map_while(|i| {
            draws::draw_moon_area(plan.bound, rng).map(|area| Moon::new(moon_designation(designation, i), area))
        })
        .collect()
}

fn explicit_bodies(layout: &ExplicitLayout, max_planets: Option<u32>) -> (Vec<Star>, Vec<Planet>) {
    let stars: Vec<Star> = layout
        .star_temperatures
        .iter()
        .map(|&t| Star::new(t))
        .collect();
    let line = frost_line(&stars);
    let limit = max_planets.map_or(usize::MAX, |m| m as usize);

    let planets = layout
        .planets
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, planet)| {
            let index = i as u32 + 1;
            let designation = index.to_string();
            let moons = planet
                .moon_areas
                .iter()
                .enumerate()
                .map(|(m, &area)| Moon::new(moon_designation(&designation, m), area))
                .collect();
            Planet::new(designation, planet.area, PlanetKind::classify(index, line), moons)
        })
        .collect();

    (stars, planets)
}

/// `"3"` + 1 → `"3b"`.
fn moon_designation(planet: &str, index: usize) -> String {
    let letter = (b'a' + (index % MAX_MOONS_PER_PLANET) as u8) as char;
    format!("{}{}", planet, letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SystemConfig {
        SystemConfig {
            seed: Some(seed),
            ..SystemConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SystemConfig::default()).is_empty());
    }

    #[test]
    fn zero_max_planets_rejected() {
        let config = SystemConfig {
            max_planets: Some(0),
            ..SystemConfig::default()
        };
        let err = generate_system(&config).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidConfiguration(vec![ConfigError::ZeroMaxPlanets])
        );
    }

    #[test]
    fn blank_system_name_rejected() {
        let config = SystemConfig {
            name: "  ".into(),
            ..seeded(3)
        };
        assert_eq!(
            generate_system(&config).unwrap_err(),
            GameError::InvalidConfiguration(vec![ConfigError::EmptySystemName])
        );
    }

    #[test]
    fn explicit_layout_without_stars_or_planets_rejected() {
        let config = SystemConfig::explicit(ExplicitLayout::default());
        let errors = validate_config(&config);
        assert!(errors.contains(&ConfigError::NoStars));
        assert!(errors.contains(&ConfigError::NoPlanets));
    }

    #[test]
    fn explicit_moon_must_be_smaller_than_planet() {
        let config = SystemConfig::explicit(ExplicitLayout {
            star_temperatures: vec![3],
            planets: vec![ExplicitPlanet::new(4, vec![4])],
        });
        assert!(validate_config(&config).contains(&ConfigError::MoonAreaOutOfRange {
            planet: 0,
            moon: 0,
            area: 4,
            max: 3,
        }));
    }

    #[test]
    fn explicit_star_temperature_checked() {
        let config = SystemConfig::explicit(ExplicitLayout {
            star_temperatures: vec![0, 8],
            planets: vec![ExplicitPlanet::new(3, vec![])],
        });
        assert_eq!(validate_config(&config).len(), 2);
    }

    #[test]
    fn random_generation_is_deterministic_per_seed() {
        let a = generate_system(&seeded(99)).unwrap();
        let b = generate_system(&seeded(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_planets_follow_frost_line() {
        for seed in 0..200 {
            let system = generate_system(&seeded(seed)).unwrap();
            let line = system.frost_line();
            for (i, planet) in system.planets.iter().enumerate() {
                let index = i as u32 + 1;
                if (index as f64) <= line {
                    assert_eq!(planet.kind, PlanetKind::Terrestrial);
                    assert!((3..=6).contains(&planet.area), "seed {seed}");
                } else {
                    assert_eq!(planet.kind, PlanetKind::GasGiant);
                    assert_eq!(planet.area, 0, "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn random_moons_are_smaller_than_bound() {
        for seed in 0..200 {
            let system = generate_system(&seeded(seed)).unwrap();
            for planet in &system.planets {
                let size = if planet.area == 0 {
                    GAS_GIANT_MOON_BOUND
                } else {
                    planet.area
                };
                let bound = if size > 5 { size / 2 } else { size };
                assert!(!planet.moons.is_empty());
                for moon in &planet.moons {
                    assert!(moon.area >= 1 && moon.area < bound, "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn moons_are_lettered_after_their_planet() {
        let system = generate_system(&seeded(1)).unwrap();
        let planet = &system.planets[0];
        assert_eq!(planet.moons[0].designation, "1a");
        assert_eq!(planet.moons[0].name, "Default 1a");
        if planet.moons.len() > 1 {
            assert_eq!(planet.moons[1].designation, "1b");
        }
    }

    #[test]
    fn max_planets_caps_random_count() {
        for seed in 0..50 {
            let config = SystemConfig {
                max_planets: Some(2),
                ..seeded(seed)
            };
            let system = generate_system(&config).unwrap();
            assert!(system.planets.len() <= 2);
            assert!(!system.planets.is_empty());
        }
    }

    #[test]
    fn explicit_layout_is_used_verbatim() {
        let config = SystemConfig::explicit(ExplicitLayout {
            star_temperatures: vec![4, 4],
            planets: vec![
                ExplicitPlanet::new(4, vec![1, 3]),
                ExplicitPlanet::new(4, vec![]),
                ExplicitPlanet::new(5, vec![]),
                ExplicitPlanet::new(3, vec![2]),
                ExplicitPlanet::new(0, vec![7]),
            ],
        });
        let system = generate_system(&config).unwrap();
        assert_eq!(system.frost_line(), 4.0);
        assert_eq!(system.planets.len(), 5);
        assert_eq!(system.planets[3].kind, PlanetKind::Terrestrial);
        assert_eq!(system.planets[4].kind, PlanetKind::GasGiant);
        assert_eq!(system.planets[0].moons[1].area, 3);
        assert_eq!(system.planets[4].moons[0].name, "Default 5a");
    }

    #[test]
    fn explicit_layout_respects_max_planets() {
        let config = SystemConfig {
            max_planets: Some(2),
            ..SystemConfig::explicit(ExplicitLayout {
                star_temperatures: vec![1],
                planets: vec![ExplicitPlanet::new(3, vec![]); 4],
            })
        };
        let system = generate_system(&config).unwrap();
        assert_eq!(system.planets.len(), 2);
    }
}
