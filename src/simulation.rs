use std::collections::BTreeMap;

use ::rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{Scenario, SimConfig};
use crate::error::SimError;
use crate::movement;
use crate::mortality;
use crate::predation;
use crate::reproduction;
use crate::species::SpeciesGraph;
use crate::stats::PopulationHistory;
use crate::store::PopulationStore;
use crate::topology::GridTopology;

/// What happened during one tick, for HUDs and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub kills: usize,
    pub births: usize,
    pub deaths_by_age: usize,
    pub deaths_by_cull: usize,
}

/// The engine: owns the population, the type graph, the parameters, the
/// random source and the population history.
pub struct Simulation<R = ChaCha8Rng> {
    graph: SpeciesGraph,
    store: PopulationStore,
    config: SimConfig,
    history: PopulationHistory,
    rng: R,
    tick_count: u64,
    last_tick: TickSummary,
}

impl Simulation<ChaCha8Rng> {
    /// Build a scenario with a seeded ChaCha8 generator.
    pub fn new(scenario: &Scenario, config: SimConfig, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(scenario, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Build a scenario, placing every type's initial population uniformly
    /// at random with `rng`.
    pub fn with_rng(scenario: &Scenario, config: SimConfig, mut rng: R) -> Result<Self, SimError> {
        let graph = scenario.build_graph()?;
        let topology = GridTopology::from_shape(&scenario.shape);
        if topology.is_empty() {
            return Err(SimError::EmptyTopology);
        }
        let mut store = PopulationStore::new(topology, graph.len());
        for (id, spec) in graph.ids().zip(&scenario.species) {
            store.add_random(id, spec.initial, &mut rng);
        }
        Self::from_parts(graph, store, config, rng)
    }

    /// Wrap an already populated store. Type names must be unique.
    pub fn from_parts(
        graph: SpeciesGraph,
        store: PopulationStore,
        config: SimConfig,
        rng: R,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if let Some(name) = graph.duplicate_name() {
            return Err(SimError::DuplicateSpecies(name.to_string()));
        }
        if store.topology().is_empty() {
            return Err(SimError::EmptyTopology);
        }
        if store.species_count() != graph.len() {
            return Err(SimError::InvalidConfig(format!(
                "store tracks {} types but the graph declares {}",
                store.species_count(),
                graph.len()
            )));
        }
        log::info!(
            "simulation ready: {} valid cells, {} types, {} agents, {:?} mode",
            store.topology().len(),
            graph.len(),
            store.live_count(),
            config.mode
        );
        Ok(Self {
            history: PopulationHistory::new(graph.len()),
            graph,
            store,
            config,
            rng,
            tick_count: 0,
            last_tick: TickSummary::default(),
        })
    }

    /// Advance by exactly one tick.
    ///
    /// Each phase runs for every agent of the tick's shuffled snapshot before
    /// the next phase starts. Offspring born this tick join from the next one.
    pub fn advance_one_tick(&mut self) {
        let counts = self.store.aggregate_counts_by_type();
        self.history.record(&counts);

        let agents = self.store.live_agents_shuffled(&mut self.rng);
        let mut summary = TickSummary::default();

        // Move
        let mut grid = self.store.counts_by_position_and_type();
        for &id in &agents {
            movement::move_agent(
                id,
                &self.graph,
                &mut self.store,
                &mut grid,
                &self.config,
                &mut self.rng,
            );
        }

        // Eat
        for &id in &agents {
            if predation::eat(id, &self.graph, &mut self.store, &self.config, &mut self.rng)
                .is_some()
            {
                summary.kills += 1;
            }
        }

        // Reproduce
        let thresholds =
            reproduction::reproduction_thresholds(&self.graph, &self.store, &self.config);
        for &id in &agents {
            let threshold = match self.store.agent(id) {
                Some(agent) if !agent.is_dead() && agent.birth_intent() => {
                    thresholds[agent.species().index()]
                }
                _ => continue,
            };
            let allowed =
                reproduction::passes_density_gate(threshold, &self.config, &mut self.rng);
            summary.births +=
                reproduction::reproduce(id, allowed, &mut self.store, &self.config, &mut self.rng);
        }

        // Age
        for &id in &agents {
            if mortality::age(id, &self.graph, &mut self.store, &self.config) {
                summary.deaths_by_age += 1;
            }
        }

        if self.config.density_cull {
            for species in self.graph.ids() {
                summary.deaths_by_cull += mortality::cull_crowded(
                    species,
                    &self.graph,
                    &mut self.store,
                    &self.config,
                    &mut self.rng,
                );
            }
        }

        self.store.sweep_dead();
        self.last_tick = summary;
        self.tick_count += 1;

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{}", self.population_line(&counts));
        }
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.advance_one_tick();
        }
    }

    /// `Total: N, <type>: <count>, ...`
    pub fn population_line(&self, counts: &[u32]) -> String {
        let total: u32 = counts.iter().sum();
        let per_type: Vec<String> = self
            .graph
            .ids()
            .map(|id| format!("{}: {}", self.graph.name(id), counts[id.index()]))
            .collect();
        format!("Total: {total}, {}", per_type.join(", "))
    }

    /// Population history keyed by type name.
    pub fn history_snapshot(&self) -> BTreeMap<String, Vec<u32>> {
        self.history.by_name(&self.graph)
    }

    pub fn history(&self) -> &PopulationHistory {
        &self.history
    }

    pub fn store(&self) -> &PopulationStore {
        &self.store
    }

    pub fn graph(&self) -> &SpeciesGraph {
        &self.graph
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_tick(&self) -> TickSummary {
        self.last_tick
    }

    /// True once every type has died out.
    pub fn is_extinct(&self) -> bool {
        self.store.live_count() == 0
    }
}
