//! Ship build catalog.
//!
//! Builds are fixed templates. Each one lists its components and their
//! resource cost; players can only purchase what is in the catalog.

use serde::{Deserialize, Serialize};

/// The four ship builds in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BuildKind {
    Dreadnaught = 0,
    ColonyShip = 1,
    CapitalShip = 2,
    Fighter = 3,
}

/// Read-only build template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Build {
    pub name: &'static str,
    /// (component, resource cost)
    pub parts: &'static [(&'static str, u32)],
}

impl Build {
    pub fn total_cost(&self) -> u32 {
        self.parts.iter().map(|(_, cost)| cost).sum()
    }
}

static DREADNAUGHT: Build = Build {
    name: "dreadnaught",
    parts: &[("hyperdrive", 200), ("life support", 100), ("targeting", 100)],
};

static COLONY_SHIP: Build = Build {
    name: "colony ship",
    parts: &[("shield generator", 500)],
};

static CAPITAL_SHIP: Build = Build {
    name: "capital ship",
    parts: &[
        ("hyperdrive", 300),
        ("life support", 200),
        ("shield generator", 100),
    ],
};

static FIGHTER: Build = Build {
    name: "fighter",
    parts: &[("life support", 50)],
};

impl BuildKind {
    pub fn all() -> &'static [BuildKind] {
        &[
            Self::Dreadnaught,
            Self::ColonyShip,
            Self::CapitalShip,
            Self::Fighter,
        ]
    }

    pub fn build(&self) -> &'static Build {
        match self {
            Self::Dreadnaught => &DREADNAUGHT,
            Self::ColonyShip => &COLONY_SHIP,
            Self::CapitalShip => &CAPITAL_SHIP,
            Self::Fighter => &FIGHTER,
        }
    }

    pub fn name(&self) -> &'static str {
        self.build().name
    }

    /// Resolve a catalog name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Self::all().iter().copied().find(|b| b.name() == wanted)
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Dreadnaught),
            1 => Some(Self::ColonyShip),
            2 => Some(Self::CapitalShip),
            3 => Some(Self::Fighter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_builds() {
        assert_eq!(BuildKind::all().len(), 4);
        for (i, kind) in BuildKind::all().iter().enumerate() {
            assert_eq!(BuildKind::from_u8(i as u8), Some(*kind));
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(BuildKind::from_name("Colony Ship"), Some(BuildKind::ColonyShip));
        assert_eq!(BuildKind::from_name(" fighter "), Some(BuildKind::Fighter));
        assert_eq!(BuildKind::from_name("battlecruiser"), None);
    }

    #[test]
    fn costs() {
        assert_eq!(BuildKind::Dreadnaught.build().total_cost(), 400);
        assert_eq!(BuildKind::ColonyShip.build().total_cost(), 500);
        assert_eq!(BuildKind::CapitalShip.build().total_cost(), 600);
        assert_eq!(BuildKind::Fighter.build().total_cost(), 50);
    }
}
