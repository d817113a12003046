// Per-type population history for graph display and reports.

use std::collections::BTreeMap;

use crate::species::{SpeciesGraph, SpeciesId};

/// Append-only population log. Entry `k` of every series is the count at
/// the start of tick `k`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulationHistory {
    series: Vec<Vec<u32>>,
}

impl PopulationHistory {
    pub fn new(species_count: usize) -> Self {
        Self {
            series: vec![Vec::new(); species_count],
        }
    }

    /// Append one sample per type. `counts` is indexed by `SpeciesId`.
    pub fn record(&mut self, counts: &[u32]) {
        debug_assert_eq!(counts.len(), self.series.len());
        for (series, &count) in self.series.iter_mut().zip(counts) {
            series.push(count);
        }
    }

    pub fn series(&self, species: SpeciesId) -> &[u32] {
        &self.series[species.index()]
    }

    /// The last `window` samples of a type (fewer if the run is shorter).
    pub fn recent(&self, species: SpeciesId, window: usize) -> &[u32] {
        let series = self.series(species);
        &series[series.len().saturating_sub(window)..]
    }

    /// Number of ticks recorded.
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy keyed by type name.
    pub fn by_name(&self, graph: &SpeciesGraph) -> BTreeMap<String, Vec<u32>> {
        graph
            .ids()
            .map(|id| (graph.name(id).to_string(), self.series(id).to_vec()))
            .collect()
    }
}
