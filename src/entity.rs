use crate::species::SpeciesId;
use crate::topology::Position;

/// Stable handle to an agent. The generation field invalidates stale references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct AgentId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Debug)]
pub struct Agent {
    species: SpeciesId,
    position: Position,
    /// Terminal. Set once by the store when the agent is removed.
    pub(crate) dead: bool,
    /// Set while eating, consumed when reproducing.
    pub(crate) birth_intent: bool,
    pub(crate) age: u32,
}

impl Agent {
    pub(crate) fn new(species: SpeciesId, position: Position) -> Self {
        Self {
            species,
            position,
            dead: false,
            birth_intent: false,
            age: 0,
        }
    }

    pub fn species(&self) -> SpeciesId {
        self.species
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn birth_intent(&self) -> bool {
        self.birth_intent
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Only the store may relocate an agent, so buckets stay in sync.
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Arena-based agent storage with generational indices and free list.
///
/// Removed agents stay in their slot (marked dead) until [`AgentArena::sweep_dead`],
/// so their terminal state can still be read during the tick that killed them.
#[derive(Clone, Debug, Default)]
pub struct AgentArena {
    slots: Vec<Option<Agent>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    count: usize,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, agent: Agent) -> AgentId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.slots[idx] = Some(agent);
            AgentId {
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(agent));
            self.generations.push(0);
            AgentId {
                index,
                generation: 0,
            }
        }
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        let idx = id.index as usize;
        if idx < self.slots.len() && self.generations[idx] == id.generation {
            self.slots[idx].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let idx = id.index as usize;
        if idx < self.slots.len() && self.generations[idx] == id.generation {
            self.slots[idx].as_mut()
        } else {
            None
        }
    }

    /// Reclaim slots of dead agents. Returns how many were freed.
    pub fn sweep_dead(&mut self) -> usize {
        let mut freed = 0;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(|a| a.dead) {
                *slot = None;
                self.generations[idx] += 1;
                self.free_list.push(idx as u32);
                freed += 1;
            }
        }
        self.count -= freed;
        freed
    }

    /// Iterate over (id, &Agent) for all live agents, in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref().filter(|a| !a.dead).map(|a| {
                (
                    AgentId {
                        index: i as u32,
                        generation: self.generations[i],
                    },
                    a,
                )
            })
        })
    }

    /// Occupied slots, dead-but-unswept agents included.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent_at(row: i32, col: i32) -> Agent {
        Agent::new(SpeciesId(0), Position::new(row, col))
    }

    #[test]
    fn generational_handles_invalidate_after_sweep() {
        let mut arena = AgentArena::new();
        let id_a = arena.spawn(agent_at(0, 0));
        assert!(arena.get(id_a).is_some());

        arena.get_mut(id_a).unwrap().dead = true;
        // Still readable until swept.
        assert!(arena.get(id_a).unwrap().is_dead());

        assert_eq!(arena.sweep_dead(), 1);
        assert!(arena.get(id_a).is_none());

        let id_b = arena.spawn(agent_at(1, 0));
        assert_eq!(id_a.index, id_b.index);
        assert_ne!(id_a.generation, id_b.generation);
    }

    #[test]
    fn iter_alive_skips_marked_dead_agents() {
        let mut arena = AgentArena::new();
        let id_alive = arena.spawn(agent_at(0, 0));
        let id_dead = arena.spawn(agent_at(1, 0));

        arena.get_mut(id_dead).unwrap().dead = true;

        let alive: Vec<AgentId> = arena.iter_alive().map(|(id, _)| id).collect();
        assert_eq!(alive, vec![id_alive]);
        assert_eq!(arena.len(), 2);
        arena.sweep_dead();
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn new_agents_start_clean() {
        let agent = agent_at(3, 4);
        assert!(!agent.is_dead());
        assert!(!agent.birth_intent());
        assert_eq!(agent.age(), 0);
        assert_eq!(agent.position(), Position::new(3, 4));
    }
}
