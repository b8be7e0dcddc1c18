//! Case-insensitive lookup of planets and moons by display name.
//!
//! The registry is a flat index built from a [`System`]; it holds addresses,
//! not bodies, so it never goes stale on colony changes. It does go stale on
//! a rename and must be rebuilt then.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::celestial::{BodyRef, System};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Lowercased full name → body.
    bodies: HashMap<String, BodyRef>,
}

/// Index every planet and moon of a system by lowercased full name.
///
/// Later insertions win on a name collision.
pub fn index(system: &System) -> Registry {
    let mut bodies = HashMap::new();
    for body in system.bodies() {
        if let Some(name) = system.body_name(body) {
            if let Some(previous) = bodies.insert(name.to_lowercase(), body) {
                log::warn!("Body name {} shadows {:?}", name, previous);
            }
        }
    }
    Registry { bodies }
}

impl Registry {
    /// Resolve a body by name, ignoring case and surrounding whitespace.
    pub fn lookup(&self, name: &str) -> Option<BodyRef> {
        self.bodies.get(&name.trim().to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// All indexed names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bodies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celestial::{rename_system, Moon, Planet, PlanetKind, Star};

    fn sample() -> System {
        System::new(
            "Tau",
            vec![Star::new(2)],
            vec![
                Planet::new("1", 3, PlanetKind::Terrestrial, vec![Moon::new("1a", 1)]),
                Planet::new("2", 0, PlanetKind::GasGiant, vec![]),
            ],
        )
    }

    #[test]
    fn indexes_every_planet_and_moon() {
        let registry = index(&sample());
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["tau 1", "tau 1a", "tau 2"]);
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = index(&sample());
        assert_eq!(registry.lookup("TAU 1A"), Some(BodyRef::Moon { planet: 0, moon: 0 }));
        assert_eq!(registry.lookup("  tau 2 "), Some(BodyRef::Planet(1)));
        assert_eq!(registry.lookup("tau 3"), None);
    }

    #[test]
    fn index_is_idempotent() {
        let system = sample();
        assert_eq!(index(&system), index(&system));
    }

    #[test]
    fn rebuilt_after_rename() {
        let mut system = sample();
        rename_system(&mut system, "Ceti").unwrap();
        let registry = index(&system);
        assert!(registry.lookup("tau 1").is_none());
        assert_eq!(registry.lookup("ceti 1"), Some(BodyRef::Planet(0)));
    }

    #[test]
    fn later_body_wins_on_collision() {
        let mut system = sample();
        system.planets[1].name = "Tau 1".to_string();
        let registry = index(&system);
        assert_eq!(registry.lookup("tau 1"), Some(BodyRef::Planet(1)));
    }
}
