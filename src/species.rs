use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Stable handle for an agent type. Indexes into per-type tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

impl SpeciesId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Species {
    pub name: String,
    /// Display colour, RGB 0-255.
    pub color: [u8; 3],
}

/// Declared agent types and who eats whom.
///
/// Relations live in one registry keyed by [`SpeciesId`], so a predator never
/// holds a reference to its prey or vice versa.
#[derive(Clone, Debug, Default)]
pub struct SpeciesGraph {
    species: Vec<Species>,
    prey: Vec<BTreeSet<SpeciesId>>,
    predators: Vec<BTreeSet<SpeciesId>>,
}

impl SpeciesGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_species(&mut self, name: impl Into<String>, color: [u8; 3]) -> SpeciesId {
        let id = SpeciesId(self.species.len() as u16);
        self.species.push(Species {
            name: name.into(),
            color,
        });
        self.prey.push(BTreeSet::new());
        self.predators.push(BTreeSet::new());
        id
    }

    /// `predator` eats `prey`. Both relation sets are updated together.
    pub fn declare_predation(&mut self, predator: SpeciesId, prey: SpeciesId) {
        self.prey[predator.index()].insert(prey);
        self.predators[prey.index()].insert(predator);
    }

    /// True when the type eats nothing (bottom of the food chain).
    pub fn is_base_of_chain(&self, id: SpeciesId) -> bool {
        self.prey[id.index()].is_empty()
    }

    pub fn prey_of(&self, id: SpeciesId) -> &BTreeSet<SpeciesId> {
        &self.prey[id.index()]
    }

    pub fn predators_of(&self, id: SpeciesId) -> &BTreeSet<SpeciesId> {
        &self.predators[id.index()]
    }

    pub fn species(&self, id: SpeciesId) -> &Species {
        &self.species[id.index()]
    }

    pub fn name(&self, id: SpeciesId) -> &str {
        &self.species[id.index()].name
    }

    pub fn find(&self, name: &str) -> Option<SpeciesId> {
        self.species
            .iter()
            .position(|s| s.name == name)
            .map(|idx| SpeciesId(idx as u16))
    }

    /// All ids in declaration order.
    /// First name registered more than once, if any.
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.species
            .iter()
            .map(|s| s.name.as_str())
            .find(|&name| !seen.insert(name))
    }

    pub fn ids(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        (0..self.species.len()).map(|idx| SpeciesId(idx as u16))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
