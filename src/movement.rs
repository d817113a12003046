use ::rand::seq::SliceRandom;
use ::rand::Rng;

use crate::config::SimConfig;
use crate::entity::AgentId;
use crate::species::{SpeciesGraph, SpeciesId};
use crate::store::{CountGrid, PopulationStore};
use crate::topology::Position;

/// How attractive a cell is: chance to eat minus chance to be eaten, both
/// capped at 1. An empty own-type count scores 0 on each side.
pub fn position_score(pred_count: u32, prey_count: u32, own_count: u32) -> f64 {
    if own_count == 0 {
        return 0.0;
    }
    let own = own_count as f64;
    let chance_to_eat = (prey_count as f64 / own).min(1.0);
    let chance_to_be_eaten = (pred_count as f64 / own).min(1.0);
    chance_to_eat - chance_to_be_eaten
}

/// Score every candidate as seen from `from`, in candidate order.
pub fn score_candidates(
    graph: &SpeciesGraph,
    store: &PopulationStore,
    counts: &CountGrid,
    species: SpeciesId,
    from: Position,
    candidates: &[Position],
) -> Vec<f64> {
    let topology = store.topology();
    candidates
        .iter()
        .map(|&cell| {
            let pred_count: u32 = graph
                .predators_of(species)
                .iter()
                .map(|&p| counts.get(topology, cell, p))
                .sum();
            let prey_count: u32 = graph
                .prey_of(species)
                .iter()
                .map(|&p| counts.get(topology, cell, p))
                .sum();
            let mut own_count = counts.get(topology, cell, species);
            if cell != from {
                own_count += 1;
            }
            position_score(pred_count, prey_count, own_count)
        })
        .collect()
}

/// Index of the strictly greatest score; the first one wins ties.
pub fn best_candidate(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Move phase for one agent.
///
/// `counts` is shared by every mover in the tick and updated here, so later
/// movers see where earlier ones went.
pub fn move_agent(
    id: AgentId,
    graph: &SpeciesGraph,
    store: &mut PopulationStore,
    counts: &mut CountGrid,
    config: &SimConfig,
    rng: &mut impl Rng,
) {
    let (species, from) = match store.agent(id) {
        Some(agent) if !agent.is_dead() => (agent.species(), agent.position()),
        _ => return,
    };

    let candidates = store.topology().adjacent(from);
    let scores = score_candidates(graph, store, counts, species, from, &candidates);
    let Some(best) = best_candidate(&scores) else {
        return;
    };

    let no_signal = scores.iter().all(|&s| s == 0.0);
    let mut target = candidates[best];
    if no_signal || rng.gen::<f64>() < config.random_move_chance {
        if let Some(&random) = candidates.choose(rng) {
            target = random;
        }
    }

    let topology = store.topology();
    let (Some(from_cell), Some(to_cell)) = (topology.cell_index(from), topology.cell_index(target))
    else {
        return;
    };
    counts.decrement(from_cell, species);
    counts.increment(to_cell, species);
    store.move_agent(id, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::GridTopology;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fox_and_rabbit() -> (SpeciesGraph, SpeciesId, SpeciesId) {
        let mut graph = SpeciesGraph::new();
        let fox = graph.add_species("Fox", [200, 60, 0]);
        let rabbit = graph.add_species("Rabbit", [230, 230, 230]);
        graph.declare_predation(fox, rabbit);
        (graph, fox, rabbit)
    }

    fn never_random() -> SimConfig {
        SimConfig {
            random_move_chance: 0.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn score_caps_both_ratios_and_guards_zero() {
        assert_eq!(position_score(0, 5, 2), 1.0);
        assert_eq!(position_score(5, 0, 2), -1.0);
        assert_eq!(position_score(1, 1, 2), 0.0);
        assert_eq!(position_score(0, 1, 4), 0.25);
        assert_eq!(position_score(3, 3, 0), 0.0);
    }

    #[test]
    fn first_maximal_candidate_wins() {
        assert_eq!(best_candidate(&[0.0, 0.5, 0.5, -1.0]), Some(1));
        assert_eq!(best_candidate(&[-1.0, -1.0]), Some(0));
        assert_eq!(best_candidate(&[]), None);
    }

    #[test]
    fn predator_moves_towards_prey() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut store = PopulationStore::new(GridTopology::rectangle(3, 3), graph.len());
        let centre = Position::new(1, 1);
        let id = store.add(fox, centre);
        // Prey sits on the +col neighbour only.
        store.add(rabbit, Position::new(1, 2));

        let mut counts = store.counts_by_position_and_type();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        move_agent(id, &graph, &mut store, &mut counts, &never_random(), &mut rng);

        assert_eq!(store.agent(id).unwrap().position(), Position::new(1, 2));
        let topo = store.topology().clone();
        assert_eq!(counts.get(&topo, centre, fox), 0);
        assert_eq!(counts.get(&topo, Position::new(1, 2), fox), 1);
        store.assert_consistent();
    }

    #[test]
    fn prey_flees_predators() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut store = PopulationStore::new(GridTopology::rectangle(1, 2), graph.len());
        let id = store.add(rabbit, Position::new(0, 0));
        store.add(fox, Position::new(0, 0));

        let mut counts = store.counts_by_position_and_type();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        move_agent(id, &graph, &mut store, &mut counts, &never_random(), &mut rng);
        assert_eq!(store.agent(id).unwrap().position(), Position::new(0, 1));
    }

    #[test]
    fn scoring_is_deterministic_for_fixed_counts() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut store = PopulationStore::new(GridTopology::rectangle(6, 6), graph.len());
        store.add_random(fox, 20, &mut rng);
        store.add_random(rabbit, 40, &mut rng);
        let counts = store.counts_by_position_and_type();

        for &cell in store.topology().valid_cells() {
            let candidates = store.topology().adjacent(cell);
            let a = score_candidates(&graph, &store, &counts, fox, cell, &candidates);
            let b = score_candidates(&graph, &store, &counts, fox, cell, &candidates);
            assert_eq!(best_candidate(&a), best_candidate(&b));
        }
    }

    #[test]
    fn own_arrival_counts_against_other_cells() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut store = PopulationStore::new(GridTopology::rectangle(1, 2), graph.len());
        let here = Position::new(0, 0);
        let there = Position::new(0, 1);
        store.add(fox, here);
        store.add(rabbit, here);
        store.add(rabbit, there);
        let counts = store.counts_by_position_and_type();

        // Staying: own 1, prey 1 -> 1.0. Moving: own 0+1, prey 1 -> 1.0. Stay wins the tie.
        let scores = score_candidates(&graph, &store, &counts, fox, here, &[here, there]);
        assert_eq!(scores, vec![1.0, 1.0]);
        assert_eq!(best_candidate(&scores), Some(0));
    }

    #[test]
    fn single_cell_grid_always_stays() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut store = PopulationStore::new(GridTopology::rectangle(1, 1), graph.len());
        let origin = Position::new(0, 0);
        let f = store.add(fox, origin);
        let r = store.add(rabbit, origin);
        let mut counts = store.counts_by_position_and_type();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = SimConfig {
            random_move_chance: 1.0,
            ..SimConfig::default()
        };
        for _ in 0..10 {
            move_agent(f, &graph, &mut store, &mut counts, &config, &mut rng);
            move_agent(r, &graph, &mut store, &mut counts, &config, &mut rng);
        }
        assert_eq!(store.agent(f).unwrap().position(), origin);
        assert_eq!(store.agent(r).unwrap().position(), origin);
        assert_eq!(counts.get(store.topology(), origin, fox), 1);
    }

    #[test]
    fn no_signal_moves_to_a_random_candidate() {
        let (graph, fox, _) = fox_and_rabbit();
        let centre = Position::new(1, 1);
        let mut reached = std::collections::BTreeSet::new();
        for seed in 0..50 {
            let mut store = PopulationStore::new(GridTopology::rectangle(3, 3), graph.len());
            let id = store.add(fox, centre);
            let mut counts = store.counts_by_position_and_type();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            move_agent(id, &graph, &mut store, &mut counts, &never_random(), &mut rng);
            reached.insert(store.agent(id).unwrap().position());
        }
        assert!(reached.len() > 1, "lone agent never left {centre:?}");
        let candidates = GridTopology::rectangle(3, 3).adjacent(centre);
        assert!(reached.iter().all(|pos| candidates.contains(pos)));
    }

    #[test]
    fn later_movers_see_earlier_moves() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut store = PopulationStore::new(GridTopology::rectangle(1, 2), graph.len());
        let here = Position::new(0, 0);
        let there = Position::new(0, 1);
        let first = store.add(fox, here);
        let second = store.add(fox, here);
        store.add(rabbit, here);
        store.add(rabbit, there);

        let mut counts = store.counts_by_position_and_type();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // First fox: stay 1/2, move 1/1. Second fox then sees stay 1/1, move 1/2.
        move_agent(first, &graph, &mut store, &mut counts, &never_random(), &mut rng);
        move_agent(second, &graph, &mut store, &mut counts, &never_random(), &mut rng);

        assert_eq!(store.agent(first).unwrap().position(), there);
        assert_eq!(store.agent(second).unwrap().position(), here);
        assert_eq!(counts, store.counts_by_position_and_type());
        store.assert_consistent();
    }

    #[test]
    fn dead_agents_do_not_move() {
        let (graph, fox, rabbit) = fox_and_rabbit();
        let mut store = PopulationStore::new(GridTopology::rectangle(3, 3), graph.len());
        let id = store.add(fox, Position::new(1, 1));
        store.add(rabbit, Position::new(1, 2));
        let mut counts = store.counts_by_position_and_type();
        store.remove(id);
        let before = counts.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        move_agent(id, &graph, &mut store, &mut counts, &never_random(), &mut rng);
        assert_eq!(counts, before);
        assert_eq!(store.agent(id).unwrap().position(), Position::new(1, 1));
    }
}
