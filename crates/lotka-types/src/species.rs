//! Tracked species and the configurable species set.
//!
//! The producer may report any number of species per year. Which ones the
//! session tracks, how they are labelled in charts, and which side of the
//! predator/prey relation they sit on is decided by a [`SpeciesSet`]
//! rather than hard-coded fields, so the two-species and three-species
//! (foxes) variants share one code path.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::SpeciesRole;

/// One tracked species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Species {
    /// Key used on the wire and in sample maps (e.g. `rabbits`).
    pub key: String,
    /// Display label for charts (e.g. `Rabbits`).
    pub label: String,
    /// Predator or prey.
    pub role: SpeciesRole,
}

impl Species {
    /// Create a species entry.
    pub fn new(key: impl Into<String>, label: impl Into<String>, role: SpeciesRole) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            role,
        }
    }
}

/// Ordered set of species tracked by a session.
///
/// Order is significant: statistics, pie slices and chart rows are
/// emitted in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct SpeciesSet(Vec<Species>);

impl SpeciesSet {
    /// Build a set from an ordered list of species.
    pub const fn new(species: Vec<Species>) -> Self {
        Self(species)
    }

    /// The classic two-species model: rabbits (prey) and wolves (predator).
    pub fn predator_prey() -> Self {
        Self(vec![
            Species::new("rabbits", "Rabbits", SpeciesRole::Prey),
            Species::new("wolves", "Wolves", SpeciesRole::Predator),
        ])
    }

    /// Rabbits, wolves and foxes, with foxes as a second predator.
    pub fn with_foxes() -> Self {
        let mut set = Self::predator_prey();
        set.0
            .push(Species::new("foxes", "Foxes", SpeciesRole::Predator));
        set
    }

    /// Iterate species in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, Species> {
        self.0.iter()
    }

    /// Number of tracked species.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no species are tracked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a species by key.
    pub fn get(&self, key: &str) -> Option<&Species> {
        self.0.iter().find(|s| s.key == key)
    }

    /// Iterate the species holding the given role.
    pub fn with_role(&self, role: SpeciesRole) -> impl Iterator<Item = &Species> {
        self.0.iter().filter(move |s| s.role == role)
    }
}

impl Default for SpeciesSet {
    fn default() -> Self {
        Self::predator_prey()
    }
}

impl<'a> IntoIterator for &'a SpeciesSet {
    type Item = &'a Species;
    type IntoIter = std::slice::Iter<'a, Species>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
