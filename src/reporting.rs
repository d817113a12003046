use std::path::Path;

use ::rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::simulation::Simulation;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub samples: usize,
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub p50: u32,
    pub p90: u32,
}

impl PopulationSummary {
    pub fn from_series(series: &[u32]) -> Self {
        if series.is_empty() {
            return Self::default();
        }
        let mut sorted = series.to_vec();
        sorted.sort_unstable();
        let sum: u64 = series.iter().map(|&v| v as u64).sum();
        Self {
            samples: series.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sum as f64 / series.len() as f64,
            p50: percentile_nearest_rank(&sorted, 0.50),
            p90: percentile_nearest_rank(&sorted, 0.90),
        }
    }
}

fn percentile_nearest_rank(sorted: &[u32], p: f64) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = ((p * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesReport {
    pub name: String,
    pub final_count: u32,
    /// First tick whose opening count was zero.
    pub extinct_at: Option<u64>,
    pub summary: PopulationSummary,
    pub history: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub ticks: u64,
    pub valid_cells: usize,
    pub species: Vec<SpeciesReport>,
}

impl RunReport {
    pub fn from_sim<R: Rng>(sim: &Simulation<R>, seed: u64) -> Self {
        let graph = sim.graph();
        let finals = sim.store().aggregate_counts_by_type();
        let species = graph
            .ids()
            .map(|id| {
                let series = sim.history().series(id);
                SpeciesReport {
                    name: graph.name(id).to_string(),
                    final_count: finals[id.index()],
                    extinct_at: series.iter().position(|&c| c == 0).map(|t| t as u64),
                    summary: PopulationSummary::from_series(series),
                    history: series.to_vec(),
                }
            })
            .collect();
        Self {
            seed,
            ticks: sim.tick_count(),
            valid_cells: sim.store().topology().len(),
            species,
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
