use ::rand::seq::SliceRandom;
use ::rand::Rng;

use crate::config::SimConfig;
use crate::entity::AgentId;
use crate::species::{SpeciesGraph, SpeciesId};
use crate::store::PopulationStore;

/// A successful predation this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kill {
    pub predator: AgentId,
    pub victim: AgentId,
    pub victim_species: SpeciesId,
}

/// Eat phase for one agent.
///
/// Predators try their prey types in random order and eat at most one victim
/// from their own cell. A lone prey individual is only caught with
/// `last_prey_catch_chance`. Base-of-chain agents instead roll
/// `prey_birth_chance` for birth intent.
pub fn eat(
    id: AgentId,
    graph: &SpeciesGraph,
    store: &mut PopulationStore,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Option<Kill> {
    let (species, position) = match store.agent(id) {
        Some(agent) if !agent.is_dead() => (agent.species(), agent.position()),
        _ => return None,
    };

    if graph.is_base_of_chain(species) {
        if rng.gen::<f64>() < config.prey_birth_chance {
            if let Some(agent) = store.agent_mut(id) {
                agent.birth_intent = true;
            }
        }
        return None;
    }

    let mut prey_types: Vec<SpeciesId> = graph.prey_of(species).iter().copied().collect();
    prey_types.shuffle(rng);

    for prey in prey_types {
        let present = store.count_at(position, prey);
        let catchable =
            present > 1 || (present == 1 && rng.gen::<f64>() < config.last_prey_catch_chance);
        if !catchable {
            continue;
        }
        let Some(&victim) = store.occupants(position, prey).choose(rng) else {
            continue;
        };
        store.remove(victim);
        if let Some(agent) = store.agent_mut(id) {
            agent.birth_intent = true;
        }
        return Some(Kill {
            predator: id,
            victim,
            victim_species: prey,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{GridTopology, Position};
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(height: usize, width: usize) -> (SpeciesGraph, SpeciesId, SpeciesId, PopulationStore) {
        let mut graph = SpeciesGraph::new();
        let fox = graph.add_species("Fox", [200, 60, 0]);
        let rabbit = graph.add_species("Rabbit", [230, 230, 230]);
        graph.declare_predation(fox, rabbit);
        let store = PopulationStore::new(GridTopology::rectangle(height, width), graph.len());
        (graph, fox, rabbit, store)
    }

    #[test]
    fn predator_eats_exactly_one_of_a_crowd() {
        let (graph, fox, rabbit, mut store) = setup(2, 2);
        let cell = Position::new(0, 0);
        let predator = store.add(fox, cell);
        for _ in 0..4 {
            store.add(rabbit, cell);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let kill = eat(predator, &graph, &mut store, &SimConfig::default(), &mut rng).unwrap();

        assert_eq!(kill.victim_species, rabbit);
        assert!(store.agent(kill.victim).unwrap().is_dead());
        assert_eq!(store.count_at(cell, rabbit), 3);
        assert!(store.agent(predator).unwrap().birth_intent());
        store.assert_consistent();
    }

    #[test]
    fn lone_prey_survives_when_catch_chance_is_zero() {
        let (graph, fox, rabbit, mut store) = setup(1, 1);
        let cell = Position::new(0, 0);
        let predator = store.add(fox, cell);
        let lone = store.add(rabbit, cell);
        let config = SimConfig {
            last_prey_catch_chance: 0.0,
            ..SimConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for _ in 0..20 {
            assert!(eat(predator, &graph, &mut store, &config, &mut rng).is_none());
        }
        assert!(!store.agent(lone).unwrap().is_dead());
        assert!(!store.agent(predator).unwrap().birth_intent());
    }

    #[test]
    fn lone_prey_is_caught_when_catch_chance_is_certain() {
        let (graph, fox, rabbit, mut store) = setup(1, 1);
        let cell = Position::new(0, 0);
        let predator = store.add(fox, cell);
        let lone = store.add(rabbit, cell);
        let config = SimConfig {
            last_prey_catch_chance: 1.0,
            ..SimConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let kill = eat(predator, &graph, &mut store, &config, &mut rng).unwrap();
        assert_eq!(kill.victim, lone);
        assert_eq!(store.count_at(cell, rabbit), 0);
    }

    #[test]
    fn dead_agents_neither_eat_nor_get_eaten_twice() {
        let (graph, fox, rabbit, mut store) = setup(1, 1);
        let cell = Position::new(0, 0);
        let first = store.add(fox, cell);
        let second = store.add(fox, cell);
        let prey_a = store.add(rabbit, cell);
        let prey_b = store.add(rabbit, cell);
        let config = SimConfig {
            last_prey_catch_chance: 1.0,
            ..SimConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(10);

        store.remove(second);
        assert!(eat(second, &graph, &mut store, &config, &mut rng).is_none());

        let k1 = eat(first, &graph, &mut store, &config, &mut rng).unwrap();
        let k2 = eat(first, &graph, &mut store, &config, &mut rng).unwrap();
        assert_ne!(k1.victim, k2.victim);
        assert!([prey_a, prey_b].contains(&k1.victim));
        assert!(eat(first, &graph, &mut store, &config, &mut rng).is_none());
        store.assert_consistent();
    }

    #[test]
    fn unrelated_types_only_roll_birth_chance() {
        let mut graph = SpeciesGraph::new();
        let a = graph.add_species("A", [0, 0, 0]);
        let b = graph.add_species("B", [0, 0, 0]);
        let mut store = PopulationStore::new(GridTopology::rectangle(1, 1), graph.len());
        let cell = Position::new(0, 0);
        let agent = store.add(a, cell);
        for _ in 0..5 {
            store.add(b, cell);
        }
        let config = SimConfig {
            prey_birth_chance: 1.0,
            ..SimConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        assert!(eat(agent, &graph, &mut store, &config, &mut rng).is_none());
        assert!(store.agent(agent).unwrap().birth_intent());
        assert_eq!(store.count_at(cell, b), 5);

        let never = SimConfig {
            prey_birth_chance: 0.0,
            ..SimConfig::default()
        };
        let other = store.add(a, cell);
        assert!(eat(other, &graph, &mut store, &never, &mut rng).is_none());
        assert!(!store.agent(other).unwrap().birth_intent());
    }

    #[test]
    fn predator_only_hunts_its_own_cell() {
        let (graph, fox, rabbit, mut store) = setup(1, 2);
        let predator = store.add(fox, Position::new(0, 0));
        for _ in 0..3 {
            store.add(rabbit, Position::new(0, 1));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        assert!(eat(predator, &graph, &mut store, &SimConfig::default(), &mut rng).is_none());
        assert_eq!(store.count_at(Position::new(0, 1), rabbit), 3);
    }
}
