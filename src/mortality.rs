use ::rand::Rng;

use crate::config::SimConfig;
use crate::entity::AgentId;
use crate::species::{SpeciesGraph, SpeciesId};
use crate::store::PopulationStore;
use crate::topology::Position;

/// Age phase for one agent. Returns true if the agent died of old age.
pub fn age(id: AgentId, graph: &SpeciesGraph, store: &mut PopulationStore, config: &SimConfig) -> bool {
    let Some(agent) = store.agent_mut(id) else {
        return false;
    };
    if agent.dead {
        return false;
    }
    agent.birth_intent = false;
    agent.age += 1;
    let (species, age) = (agent.species(), agent.age);

    if age > config.max_age_of(graph, species) {
        store.remove(id)
    } else {
        false
    }
}

/// The cell holding the most agents of `species`. Ties go to the greatest
/// position, i.e. the maximum of `(count, position)`.
pub fn densest_cell(store: &PopulationStore, species: SpeciesId) -> Option<(u32, Position)> {
    store
        .topology()
        .valid_cells()
        .iter()
        .map(|&pos| (store.count_at(pos, species) as u32, pos))
        .max()
}

/// Saturating crowding pressure: `1 - e^(-densest / allowance)` where
/// `allowance = n / sqrt(n)` for `n` valid cells.
pub fn crowding_death_chance(densest_count: u32, valid_cells: usize) -> f64 {
    if valid_cells == 0 {
        return 0.0;
    }
    let n = valid_cells as f64;
    let allowance = n / n.sqrt();
    1.0 - (-(densest_count as f64) / allowance).exp()
}

/// Density cull for one type. Agents of `species` in the cells around its
/// densest cell (the densest cell itself excluded) each die with the scaled
/// crowding chance. Returns how many were removed.
pub fn cull_crowded(
    species: SpeciesId,
    graph: &SpeciesGraph,
    store: &mut PopulationStore,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> usize {
    let Some((densest_count, densest)) = densest_cell(store, species) else {
        return 0;
    };
    let multiplier = config.death_chance_multiplier.get(config.role_of(graph, species));
    let death_chance = crowding_death_chance(densest_count, store.topology().len()) * multiplier;
    if death_chance <= 0.0 {
        return 0;
    }

    let mut removed = 0;
    for cell in store.topology().adjacent(densest) {
        if cell == densest {
            continue;
        }
        let victims: Vec<AgentId> = store
            .occupants(cell, species)
            .iter()
            .copied()
            .filter(|_| rng.gen::<f64>() < death_chance)
            .collect();
        for victim in victims {
            if store.remove(victim) {
                removed += 1;
            }
        }
    }
    log::trace!(
        "cull {}: densest {:?} holds {}, chance {:.3}, removed {}",
        graph.name(species),
        densest,
        densest_count,
        death_chance,
        removed
    );
    removed
}
