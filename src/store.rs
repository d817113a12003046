// Where every live agent is, bucketed by cell and type.

use ::rand::seq::SliceRandom;
use ::rand::Rng;

use crate::entity::{Agent, AgentArena, AgentId};
use crate::species::SpeciesId;
use crate::topology::{GridTopology, Position};

/// Dense per-cell, per-type counts. Reading an empty pair yields 0 and never
/// allocates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountGrid {
    species_count: usize,
    counts: Vec<u32>,
}

impl CountGrid {
    pub fn new(cell_count: usize, species_count: usize) -> Self {
        Self {
            species_count,
            counts: vec![0; cell_count * species_count],
        }
    }

    #[inline]
    fn slot(&self, cell: usize, species: SpeciesId) -> usize {
        cell * self.species_count + species.index()
    }

    /// Count at a dense cell index.
    #[inline]
    pub fn get_index(&self, cell: usize, species: SpeciesId) -> u32 {
        self.counts
            .get(self.slot(cell, species))
            .copied()
            .unwrap_or(0)
    }

    /// Count at a position; 0 for cells outside the topology.
    pub fn get(&self, topology: &GridTopology, pos: Position, species: SpeciesId) -> u32 {
        topology
            .cell_index(pos)
            .map_or(0, |cell| self.get_index(cell, species))
    }

    pub fn increment(&mut self, cell: usize, species: SpeciesId) {
        let slot = self.slot(cell, species);
        self.counts[slot] += 1;
    }

    pub fn decrement(&mut self, cell: usize, species: SpeciesId) {
        let slot = self.slot(cell, species);
        self.counts[slot] = self.counts[slot].saturating_sub(1);
    }

    /// All type counts of one cell, indexed by `SpeciesId`.
    pub fn cell_counts(&self, cell: usize) -> &[u32] {
        let start = cell * self.species_count;
        &self.counts[start..start + self.species_count]
    }

    pub fn cell_total(&self, cell: usize) -> u32 {
        self.cell_counts(cell).iter().sum()
    }

    pub fn cell_count(&self) -> usize {
        if self.species_count == 0 {
            0
        } else {
            self.counts.len() / self.species_count
        }
    }
}

/// The sole owner of "where is what".
///
/// Every position change goes through [`PopulationStore::move_agent`] so the
/// bucket an agent sits in always matches its own type and position.
#[derive(Clone, Debug)]
pub struct PopulationStore {
    topology: GridTopology,
    species_count: usize,
    arena: AgentArena,
    /// `buckets[cell * species_count + species]`
    buckets: Vec<Vec<AgentId>>,
}

impl PopulationStore {
    pub fn new(topology: GridTopology, species_count: usize) -> Self {
        let buckets = vec![Vec::new(); topology.len() * species_count];
        Self {
            topology,
            species_count,
            arena: AgentArena::new(),
            buckets,
        }
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn species_count(&self) -> usize {
        self.species_count
    }

    #[inline]
    fn bucket_slot(&self, cell: usize, species: SpeciesId) -> usize {
        cell * self.species_count + species.index()
    }

    fn cell_of(&self, pos: Position) -> usize {
        match self.topology.cell_index(pos) {
            Some(cell) => cell,
            None => panic!("position {pos:?} is not a valid cell"),
        }
    }

    /// Create an agent and insert it. `position` must be a valid cell.
    pub fn add(&mut self, species: SpeciesId, position: Position) -> AgentId {
        debug_assert!(species.index() < self.species_count, "unknown species {species:?}");
        let cell = self.cell_of(position);
        let id = self.arena.spawn(Agent::new(species, position));
        let slot = self.bucket_slot(cell, species);
        self.buckets[slot].push(id);
        id
    }

    /// Place `count` agents at uniformly random valid cells.
    pub fn add_random(&mut self, species: SpeciesId, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let pos = self.random_valid_position(rng);
            self.add(species, pos);
        }
    }

    fn detach(&mut self, id: AgentId, species: SpeciesId, position: Position) {
        let cell = self.cell_of(position);
        let slot = self.bucket_slot(cell, species);
        let bucket = &mut self.buckets[slot];
        match bucket.iter().position(|&other| other == id) {
            Some(idx) => {
                bucket.remove(idx);
            }
            None => panic!("agent {id:?} missing from its bucket at {position:?}"),
        }
    }

    /// Detach and mark dead. Returns false if the agent was already dead or unknown.
    pub fn remove(&mut self, id: AgentId) -> bool {
        let (species, position) = match self.arena.get(id) {
            Some(agent) if !agent.dead => (agent.species(), agent.position()),
            _ => return false,
        };
        self.detach(id, species, position);
        if let Some(agent) = self.arena.get_mut(id) {
            agent.dead = true;
        }
        true
    }

    /// Relocate a live agent. Dead agents are left untouched.
    pub fn move_agent(&mut self, id: AgentId, new_position: Position) {
        let (species, old_position) = match self.arena.get(id) {
            Some(agent) if !agent.dead => (agent.species(), agent.position()),
            _ => return,
        };
        if old_position == new_position {
            return;
        }
        let new_cell = self.cell_of(new_position);
        self.detach(id, species, old_position);
        let slot = self.bucket_slot(new_cell, species);
        self.buckets[slot].push(id);
        if let Some(agent) = self.arena.get_mut(id) {
            agent.set_position(new_position);
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.arena.get(id)
    }

    /// Flag access for the behaviour phases. Position and type are not reachable here.
    pub(crate) fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.arena.get_mut(id)
    }

    /// Live agents of `species` at `pos`; empty for invalid cells.
    pub fn occupants(&self, pos: Position, species: SpeciesId) -> &[AgentId] {
        match self.topology.cell_index(pos) {
            Some(cell) => self.buckets[self.bucket_slot(cell, species)].as_slice(),
            None => &[],
        }
    }

    pub fn count_at(&self, pos: Position, species: SpeciesId) -> usize {
        self.occupants(pos, species).len()
    }

    /// Full (cell, type) snapshot. Computed once per tick.
    pub fn counts_by_position_and_type(&self) -> CountGrid {
        let mut grid = CountGrid::new(self.topology.len(), self.species_count);
        for (slot, bucket) in self.buckets.iter().enumerate() {
            grid.counts[slot] = bucket.len() as u32;
        }
        grid
    }

    /// Whole-grid total per type, indexed by `SpeciesId`.
    pub fn aggregate_counts_by_type(&self) -> Vec<u32> {
        let mut totals = vec![0u32; self.species_count];
        for (slot, bucket) in self.buckets.iter().enumerate() {
            totals[slot % self.species_count.max(1)] += bucket.len() as u32;
        }
        totals
    }

    pub fn live_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Live agents in a fresh random order. Agents added afterwards are not included.
    pub fn live_agents_shuffled(&self, rng: &mut impl Rng) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.buckets.iter().flatten().copied().collect();
        ids.shuffle(rng);
        ids
    }

    /// Uniform choice among valid cells.
    ///
    /// Panics on an empty topology; the engine refuses to build on one.
    pub fn random_valid_position(&self, rng: &mut impl Rng) -> Position {
        match self.topology.valid_cells().choose(rng) {
            Some(&pos) => pos,
            None => panic!("no valid cells to choose from"),
        }
    }

    /// Reclaim arena slots of agents removed since the last sweep.
    pub fn sweep_dead(&mut self) -> usize {
        self.arena.sweep_dead()
    }

    /// Check every store invariant, panicking on the first violation.
    pub fn assert_consistent(&self) {
        let mut seen = 0usize;
        for (cell, &pos) in self.topology.valid_cells().iter().enumerate() {
            for s in 0..self.species_count {
                let species = SpeciesId(s as u16);
                for &id in &self.buckets[self.bucket_slot(cell, species)] {
                    let agent = self
                        .arena
                        .get(id)
                        .unwrap_or_else(|| panic!("bucket holds stale handle {id:?}"));
                    assert!(!agent.dead, "dead agent {id:?} still bucketed");
                    assert_eq!(agent.position(), pos, "agent {id:?} bucketed at wrong cell");
                    assert_eq!(agent.species(), species, "agent {id:?} bucketed under wrong type");
                    seen += 1;
                }
            }
        }
        let alive = self.arena.iter_alive().count();
        assert_eq!(seen, alive, "live agents missing from buckets");
    }
}
