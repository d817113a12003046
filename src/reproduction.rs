use ::rand::seq::SliceRandom;
use ::rand::Rng;

use crate::config::{BirthLocation, EcosystemMode, SimConfig};
use crate::entity::AgentId;
use crate::species::SpeciesGraph;
use crate::store::PopulationStore;

/// Density band a type must beat to reproduce:
/// `(count - capacity / 2) / capacity`.
///
/// Negative well below half capacity (birth nearly certain), 0 at half
/// capacity, 0.5 at capacity and above 1 past one and a half capacity.
pub fn reproduction_threshold(count: u32, capacity: f64) -> f64 {
    (count as f64 - capacity / 2.0) / capacity
}

/// Thresholds for every type, indexed by `SpeciesId`, from current counts.
pub fn reproduction_thresholds(
    graph: &SpeciesGraph,
    store: &PopulationStore,
    config: &SimConfig,
) -> Vec<f64> {
    let counts = store.aggregate_counts_by_type();
    let cells = store.topology().len() as f64;
    graph
        .ids()
        .map(|id| {
            let multiplier = config.reproduction_multiplier.get(config.role_of(graph, id));
            reproduction_threshold(counts[id.index()], cells * multiplier)
        })
        .collect()
}

/// Whether an agent with birth intent gets to reproduce this tick.
pub fn passes_density_gate(threshold: f64, config: &SimConfig, rng: &mut impl Rng) -> bool {
    !config.density_reproduction || rng.gen::<f64>() > threshold
}

/// Reproduce phase for one agent. `allowed` is the outcome of the density
/// gate. Returns the number of offspring added.
///
/// Birth intent is cleared whether or not a birth happened.
pub fn reproduce(
    id: AgentId,
    allowed: bool,
    store: &mut PopulationStore,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> usize {
    let (species, position) = match store.agent(id) {
        Some(agent) if !agent.is_dead() && agent.birth_intent() => {
            (agent.species(), agent.position())
        }
        _ => return 0,
    };

    let mut born = 0;
    if allowed {
        let birth_cell = match config.birth_location {
            BirthLocation::SameCell => Some(position),
            BirthLocation::Adjacent => store.topology().adjacent(position).choose(rng).copied(),
        };
        if let Some(cell) = birth_cell {
            store.add(species, cell);
            born += 1;
            if config.mode == EcosystemMode::MultiSpecies
                && rng.gen::<f64>() < config.second_birth_chance
            {
                store.add(species, cell);
                born += 1;
            }
        }
    }

    if let Some(agent) = store.agent_mut(id) {
        agent.birth_intent = false;
    }
    born
}
