//! Colony name generation.

use std::collections::HashSet;

use rand::Rng;

/// Mints colony names that have not been issued before in a world.
pub trait NameSource {
    /// Return a name whose lowercase form is not in `used`.
    fn random_unique_name(&mut self, used: &HashSet<String>) -> String;
}

/// Draws names from the built-in colony library.
pub struct LibraryNames<R: Rng> {
    rng: R,
}

impl<R: Rng> LibraryNames<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NameSource for LibraryNames<R> {
    fn random_unique_name(&mut self, used: &HashSet<String>) -> String {
        random_unique_name(used, &mut self.rng)
    }
}

/// Pick an unused library name. Once every name is taken, an ordinal is
/// appended (`"Halcyon 2"`) so the result is still unique.
pub fn random_unique_name(used: &HashSet<String>, rng: &mut impl Rng) -> String {
    let free: Vec<&str> = COLONY_NAMES
        .iter()
        .copied()
        .filter(|n| !used.contains(&n.to_lowercase()))
        .collect();
    if !free.is_empty() {
        return free[rng.gen_range(0..free.len())].to_string();
    }

    let base = COLONY_NAMES[rng.gen_range(0..COLONY_NAMES.len())];
    (2..)
        .map(|n| format!("{} {}", base, n))
        .find(|candidate| !used.contains(&candidate.to_lowercase()))
        .unwrap_or_else(|| base.to_string())
}

pub fn library_size() -> usize {
    COLONY_NAMES.len()
}

static COLONY_NAMES: &[&str] = &[
    // Virtues and hopes
    "Halcyon",
    "Providence",
    "Concord",
    "Serenity",
    "Endurance",
    "Fortitude",
    "Prosperity",
    "Harmony",
    "Resolve",
    "Tranquility",
    // Explorers
    "Magellan",
    "Shackleton",
    "Tasman",
    "Cabot",
    "Amundsen",
    "Nansen",
    "Vespucci",
    "Hudson",
    "Zheng He",
    "Ibn Battuta",
    // Myth
    "Elysium",
    "Avalon",
    "Arcadia",
    "Hesperia",
    "Thule",
    "Asgard",
    "Olympus",
    "Atlantis",
    "Lemuria",
    "Hyperborea",
    // Frontier towns
    "New Haven",
    "Port Lowell",
    "Fort Kepler",
    "Landfall",
    "First Light",
    "Bright Harbor",
    "Redwater",
    "Stonebridge",
    "Cinder Gap",
    "Last Reach",
    // Astronomers
    "Herschel",
    "Leavitt",
    "Hubble",
    "Cannon",
    "Tycho",
    "Galileo",
    "Huygens",
    "Messier",
    "Sagan",
    "Rubin",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_repeats_while_library_lasts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut used = HashSet::new();
        for _ in 0..library_size() {
            let name = random_unique_name(&used, &mut rng);
            assert!(used.insert(name.to_lowercase()), "repeated {name}");
        }
    }

    #[test]
    fn appends_ordinal_when_exhausted() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut used: HashSet<String> = COLONY_NAMES.iter().map(|n| n.to_lowercase()).collect();
        let name = random_unique_name(&used, &mut rng);
        assert!(name.ends_with(" 2"), "got {name}");
        used.insert(name.to_lowercase());
        let next = random_unique_name(&used, &mut rng);
        assert!(!used.contains(&next.to_lowercase()));
    }

    #[test]
    fn used_names_compare_case_insensitively() {
        let mut rng = StdRng::seed_from_u64(3);
        let used: HashSet<String> = COLONY_NAMES[1..].iter().map(|n| n.to_lowercase()).collect();
        assert_eq!(random_unique_name(&used, &mut rng), "Halcyon");
    }

    #[test]
    fn library_source_delegates() {
        let mut source = LibraryNames::new(StdRng::seed_from_u64(4));
        let name = source.random_unique_name(&HashSet::new());
        assert!(COLONY_NAMES.contains(&name.as_str()));
    }
}
