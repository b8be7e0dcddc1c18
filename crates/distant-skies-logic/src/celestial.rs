//! Celestial data model: stars, planets, moons and the system that holds them.
//!
//! Planets and moons carry a stable `designation` (`"3"`, `"3b"`) and a
//! display `name` of the form `"<system> <designation>"`. Renaming the
//! system only rewrites the prefix.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::colony::ColonyId;
use crate::error::{ConfigError, GameError};

// ============================================================================
// STARS
// ============================================================================

/// Spectral class derived from a star's temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SpectralClass {
    M = 1,
    K = 2,
    G = 3,
    F = 4,
    A = 5,
    B = 6,
    O = 7,
}

impl SpectralClass {
    pub fn from_temperature(temperature: u8) -> Option<Self> {
        match temperature {
            1 => Some(Self::M),
            2 => Some(Self::K),
            3 => Some(Self::G),
            4 => Some(Self::F),
            5 => Some(Self::A),
            6 => Some(Self::B),
            7 => Some(Self::O),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::M => 'M',
            Self::K => 'K',
            Self::G => 'G',
            Self::F => 'F',
            Self::A => 'A',
            Self::B => 'B',
            Self::O => 'O',
        }
    }
}

/// A star. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    temperature: u8,
}

impl Star {
    pub fn new(temperature: u8) -> Self {
        Self { temperature }
    }

    /// Temperature on the 1–7 scale.
    pub fn temperature(&self) -> u8 {
        self.temperature
    }

    pub fn spectral_class(&self) -> Option<SpectralClass> {
        SpectralClass::from_temperature(self.temperature)
    }
}

/// Rocky/gas boundary: sum of the square roots of all star temperatures.
pub fn frost_line(stars: &[Star]) -> f64 {
    stars
        .iter()
        .map(|s| (s.temperature() as f64).sqrt())
        .sum()
}

// ============================================================================
// PLANETS AND MOONS
// ============================================================================

/// Frost-line classification of a planet slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetKind {
    Terrestrial,
    GasGiant,
}

impl PlanetKind {
    /// Planets whose 1-based index is at or inside the frost line are rocky.
    pub fn classify(index: u32, frost_line: f64) -> Self {
        if index as f64 <= frost_line {
            Self::Terrestrial
        } else {
            Self::GasGiant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    pub designation: String,
    pub name: String,
    pub area: u32,
    /// Lowercased colony name → colony.
    pub colonies: IndexMap<String, ColonyId>,
}

impl Moon {
    pub fn new(designation: impl Into<String>, area: u32) -> Self {
        let designation = designation.into();
        Self {
            name: designation.clone(),
            designation,
            area,
            colonies: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub designation: String,
    pub name: String,
    /// Colony sites; 0 for a gas giant.
    pub area: u32,
    /// Frost-line classification at generation time.
    pub kind: PlanetKind,
    pub moons: Vec<Moon>,
    /// Lowercased colony name → colony.
    pub colonies: IndexMap<String, ColonyId>,
}

impl Planet {
    pub fn new(designation: impl Into<String>, area: u32, kind: PlanetKind, moons: Vec<Moon>) -> Self {
        let designation = designation.into();
        Self {
            name: designation.clone(),
            designation,
            area,
            kind,
            moons,
            colonies: IndexMap::new(),
        }
    }

    pub fn is_gas_giant(&self) -> bool {
        self.area == 0
    }
}

/// Something a colony can be founded on.
pub trait Site {
    fn name(&self) -> &str;
    fn area(&self) -> u32;
    fn colonies(&self) -> &IndexMap<String, ColonyId>;
    fn colonies_mut(&mut self) -> &mut IndexMap<String, ColonyId>;
    /// True when the site can never hold a colony.
    fn is_gas_giant(&self) -> bool;

    fn has_free_slot(&self) -> bool {
        (self.colonies().len() as u32) < self.area()
    }
}

impl Site for Planet {
    fn name(&self) -> &str {
        &self.name
    }
    fn area(&self) -> u32 {
        self.area
    }
    fn colonies(&self) -> &IndexMap<String, ColonyId> {
        &self.colonies
    }
    fn colonies_mut(&mut self) -> &mut IndexMap<String, ColonyId> {
        &mut self.colonies
    }
    fn is_gas_giant(&self) -> bool {
        Planet::is_gas_giant(self)
    }
}

impl Site for Moon {
    fn name(&self) -> &str {
        &self.name
    }
    fn area(&self) -> u32 {
        self.area
    }
    fn colonies(&self) -> &IndexMap<String, ColonyId> {
        &self.colonies
    }
    fn colonies_mut(&mut self) -> &mut IndexMap<String, ColonyId> {
        &mut self.colonies
    }
    fn is_gas_giant(&self) -> bool {
        false
    }
}

/// Address of a planet or moon inside a [`System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRef {
    Planet(usize),
    Moon { planet: usize, moon: usize },
}

// ============================================================================
// SYSTEM
// ============================================================================

/// Placeholder name given to a freshly generated system.
pub const DEFAULT_SYSTEM_NAME: &str = "Default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub name: String,
    pub stars: Vec<Star>,
    /// Planets in orbital order.
    pub planets: Vec<Planet>,
}

impl System {
    /// Build a system and prefix every body with the system name.
    pub fn new(name: impl Into<String>, stars: Vec<Star>, planets: Vec<Planet>) -> Self {
        let mut system = Self {
            name: String::new(),
            stars,
            planets,
        };
        prefix_bodies(&mut system, name.into());
        system
    }

    pub fn frost_line(&self) -> f64 {
        frost_line(&self.stars)
    }

    pub fn planet(&self, index: usize) -> Option<&Planet> {
        self.planets.get(index)
    }

    pub fn moon(&self, planet: usize, moon: usize) -> Option<&Moon> {
        self.planets.get(planet)?.moons.get(moon)
    }

    pub fn site(&self, body: BodyRef) -> Option<&dyn Site> {
        match body {
            BodyRef::Planet(p) => self.planet(p).map(|p| p as &dyn Site),
            BodyRef::Moon { planet, moon } => self.moon(planet, moon).map(|m| m as &dyn Site),
        }
    }

    pub fn site_mut(&mut self, body: BodyRef) -> Option<&mut dyn Site> {
        match body {
            BodyRef::Planet(p) => self.planets.get_mut(p).map(|p| p as &mut dyn Site),
            BodyRef::Moon { planet, moon } => self
                .planets
                .get_mut(planet)?
                .moons
                .get_mut(moon)
                .map(|m| m as &mut dyn Site),
        }
    }

    /// Display name of a body, if it exists.
    pub fn body_name(&self, body: BodyRef) -> Option<&str> {
        self.site(body).map(|s| s.name())
    }

    /// Every body in the system: each planet followed by its moons.
    pub fn bodies(&self) -> impl Iterator<Item = BodyRef> + '_ {
        self.planets.iter().enumerate().flat_map(|(p, planet)| {
            std::iter::once(BodyRef::Planet(p)).chain(
                (0..planet.moons.len()).map(move |m| BodyRef::Moon { planet: p, moon: m }),
            )
        })
    }

    pub fn moon_count(&self) -> usize {
        self.planets.iter().map(|p| p.moons.len()).sum()
    }

    /// Check that every body holds no more colonies than it has sites.
    pub fn capacity_respected(&self) -> bool {
        self.bodies().all(|b| {
            self.site(b)
                .map(|s| s.colonies().len() as u32 <= s.area())
                .unwrap_or(false)
        })
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} stars, {} planets, {} moons)",
            self.name,
            self.stars.len(),
            self.planets.len(),
            self.moon_count()
        )
    }
}

/// Rename a system, re-prefixing every planet and moon name.
///
/// Designations are untouched, so the registry must be rebuilt afterwards.
/// A blank name is rejected and leaves the system as it was.
pub fn rename_system(system: &mut System, new_name: &str) -> Result<(), GameError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(GameError::InvalidConfiguration(vec![ConfigError::EmptySystemName]));
    }
    prefix_bodies(system, new_name.to_string());
    Ok(())
}

fn prefix_bodies(system: &mut System, name: String) {
    for planet in &mut system.planets {
        planet.name = format!("{} {}", name, planet.designation);
        for moon in &mut planet.moons {
            moon.name = format!("{} {}", name, moon.designation);
        }
    }
    system.name = name;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> System {
        let planets = vec![
            Planet::new("1", 4, PlanetKind::Terrestrial, vec![Moon::new("1a", 2)]),
            Planet::new(
                "12",
                0,
                PlanetKind::GasGiant,
                vec![Moon::new("12a", 3), Moon::new("12b", 1)],
            ),
        ];
        System::new(DEFAULT_SYSTEM_NAME, vec![Star::new(4)], planets)
    }

    #[test]
    fn frost_line_of_two_f_stars() {
        let stars = [Star::new(4), Star::new(4)];
        assert_eq!(frost_line(&stars), 4.0);
        assert_eq!(PlanetKind::classify(4, 4.0), PlanetKind::Terrestrial);
        assert_eq!(PlanetKind::classify(5, 4.0), PlanetKind::GasGiant);
    }

    #[test]
    fn spectral_classes() {
        assert_eq!(Star::new(1).spectral_class(), Some(SpectralClass::M));
        assert_eq!(Star::new(3).spectral_class().map(|c| c.letter()), Some('G'));
        assert_eq!(Star::new(7).spectral_class(), Some(SpectralClass::O));
        assert_eq!(Star::new(9).spectral_class(), None);
    }

    #[test]
    fn new_system_prefixes_names() {
        let system = sample();
        assert_eq!(system.planets[0].name, "Default 1");
        assert_eq!(system.planets[1].moons[1].name, "Default 12b");
    }

    #[test]
    fn rename_keeps_multi_digit_designations() {
        let mut system = sample();
        rename_system(&mut system, " Proxima ").unwrap();
        assert_eq!(system.name, "Proxima");
        assert_eq!(system.planets[1].name, "Proxima 12");
        assert_eq!(system.planets[1].moons[0].name, "Proxima 12a");
        assert_eq!(system.planets[1].designation, "12");
    }

    #[test]
    fn blank_rename_is_rejected() {
        let mut system = sample();
        for blank in ["", "   ", "\t"] {
            assert_eq!(
                rename_system(&mut system, blank),
                Err(GameError::InvalidConfiguration(vec![ConfigError::EmptySystemName]))
            );
        }
        assert_eq!(system.name, "Default");
        assert_eq!(system.planets[0].name, "Default 1");
    }

    #[test]
    fn bodies_walk_planets_then_moons() {
        let system = sample();
        let bodies: Vec<_> = system.bodies().collect();
        assert_eq!(
            bodies,
            vec![
                BodyRef::Planet(0),
                BodyRef::Moon { planet: 0, moon: 0 },
                BodyRef::Planet(1),
                BodyRef::Moon { planet: 1, moon: 0 },
                BodyRef::Moon { planet: 1, moon: 1 },
            ]
        );
    }

    #[test]
    fn gas_giant_has_no_free_slot() {
        let system = sample();
        let giant = system.site(BodyRef::Planet(1)).unwrap();
        assert!(giant.is_gas_giant());
        assert!(!giant.has_free_slot());
        let moon = system.site(BodyRef::Moon { planet: 1, moon: 0 }).unwrap();
        assert!(!moon.is_gas_giant());
        assert!(moon.has_free_slot());
    }

    #[test]
    fn missing_body_is_none() {
        let system = sample();
        assert!(system.site(BodyRef::Planet(5)).is_none());
        assert!(system.site(BodyRef::Moon { planet: 0, moon: 3 }).is_none());
    }
}
