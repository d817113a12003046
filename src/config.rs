// Tunable simulation parameters and scenario wiring.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::species::{SpeciesGraph, SpeciesId};

// Viewer
pub const PLOT_WINDOW: usize = 100;
pub const CELL_PIXELS: f32 = 24.0;
pub const TICKS_PER_SECOND: f64 = 4.0;

/// Whether types are split into predator/prey roles or all share one
/// general parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemMode {
    PredatorPrey,
    MultiSpecies,
}

/// Where offspring appear relative to the parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthLocation {
    /// Uniformly random cell among the parent's valid neighbours (own cell included).
    Adjacent,
    SameCell,
}

/// Parameter role of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Predator,
    Prey,
    General,
}

/// One value per role.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleValues<T> {
    pub predator: T,
    pub prey: T,
    pub general: T,
}

impl<T: Copy> RoleValues<T> {
    pub fn get(&self, role: Role) -> T {
        match role {
            Role::Predator => self.predator,
            Role::Prey => self.prey,
            Role::General => self.general,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: EcosystemMode,
    /// Gate reproduction by how close each type is to its capacity.
    pub density_reproduction: bool,
    pub reproduction_multiplier: RoleValues<f64>,
    /// Cull the neighbours of each type's most crowded cell every tick.
    pub density_cull: bool,
    pub death_chance_multiplier: RoleValues<f64>,
    pub max_age: RoleValues<u32>,
    /// Per-tick chance that a base-of-chain agent wants to give birth.
    pub prey_birth_chance: f64,
    /// Multi-species mode only: chance of a second offspring.
    pub second_birth_chance: f64,
    /// Chance a predator catches the last prey of a type in its cell.
    pub last_prey_catch_chance: f64,
    pub random_move_chance: f64,
    pub birth_location: BirthLocation,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: EcosystemMode::PredatorPrey,
            density_reproduction: true,
            reproduction_multiplier: RoleValues {
                predator: 10.0,
                prey: 3.0,
                general: 3.5,
            },
            density_cull: true,
            death_chance_multiplier: RoleValues {
                predator: 2.0,
                prey: 2.0,
                general: 0.33,
            },
            max_age: RoleValues {
                predator: 6,
                prey: 10,
                general: 20,
            },
            prey_birth_chance: 0.50,
            second_birth_chance: 0.18,
            last_prey_catch_chance: 0.10,
            random_move_chance: 0.10,
            birth_location: BirthLocation::Adjacent,
        }
    }
}

impl SimConfig {
    pub fn multi_species() -> Self {
        Self {
            mode: EcosystemMode::MultiSpecies,
            ..Self::default()
        }
    }

    pub fn is_predator_prey(&self) -> bool {
        self.mode == EcosystemMode::PredatorPrey
    }

    /// Role used for reproduction and cull multipliers.
    pub fn role_of(&self, graph: &SpeciesGraph, id: SpeciesId) -> Role {
        match self.mode {
            EcosystemMode::MultiSpecies => Role::General,
            EcosystemMode::PredatorPrey if graph.is_base_of_chain(id) => Role::Prey,
            EcosystemMode::PredatorPrey => Role::Predator,
        }
    }

    /// Base-of-chain types always age out at the prey limit, whatever the mode.
    pub fn max_age_of(&self, graph: &SpeciesGraph, id: SpeciesId) -> u32 {
        if graph.is_base_of_chain(id) {
            self.max_age.prey
        } else if self.is_predator_prey() {
            self.max_age.predator
        } else {
            self.max_age.general
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let chances = [
            ("prey_birth_chance", self.prey_birth_chance),
            ("second_birth_chance", self.second_birth_chance),
            ("last_prey_catch_chance", self.last_prey_catch_chance),
            ("random_move_chance", self.random_move_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        let multipliers = [
            ("reproduction_multiplier", self.reproduction_multiplier),
            ("death_chance_multiplier", self.death_chance_multiplier),
        ];
        for (name, values) in multipliers {
            for (role, value) in [
                ("predator", values.predator),
                ("prey", values.prey),
                ("general", values.general),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(SimError::InvalidConfig(format!(
                        "{name}.{role} must be a non-negative number, got {value}"
                    )));
                }
            }
        }
        // Capacity divides by this one.
        let rm = self.reproduction_multiplier;
        if rm.predator == 0.0 || rm.prey == 0.0 || rm.general == 0.0 {
            return Err(SimError::InvalidConfig(
                "reproduction_multiplier values must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Extent of the grid and whether it is masked to an ellipse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub height: usize,
    pub width: usize,
    #[serde(default)]
    pub circular: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSpec {
    pub name: String,
    pub color: [u8; 3],
    #[serde(default)]
    pub initial: usize,
    /// Names of the types this one eats.
    #[serde(default)]
    pub preys_on: Vec<String>,
}

/// Which types exist, who eats whom, and how the grid starts out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub shape: GridShape,
    pub species: Vec<SpeciesSpec>,
}

impl Scenario {
    /// One predator and one prey on a 20x20 circle, 600 of each.
    pub fn predator_prey() -> Self {
        Self {
            shape: GridShape {
                height: 20,
                width: 20,
                circular: true,
            },
            species: vec![
                SpeciesSpec {
                    name: "Predator".to_string(),
                    color: [224, 0, 56],
                    initial: 600,
                    preys_on: vec!["Prey".to_string()],
                },
                SpeciesSpec {
                    name: "Prey".to_string(),
                    color: [12, 10, 242],
                    initial: 600,
                    preys_on: Vec::new(),
                },
            ],
        }
    }

    /// Rock-paper-scissors cycle: 0 eats 1, 1 eats 2, 2 eats 0.
    /// Pair with [`SimConfig::multi_species`].
    pub fn three_way() -> Self {
        let spec = |name: &str, color: [u8; 3], eats: &str| SpeciesSpec {
            name: name.to_string(),
            color,
            initial: 600,
            preys_on: vec![eats.to_string()],
        };
        Self {
            shape: GridShape {
                height: 25,
                width: 25,
                circular: false,
            },
            species: vec![
                spec("Being 0", [224, 0, 56], "Being 1"),
                spec("Being 1", [12, 10, 242], "Being 2"),
                spec("Being 2", [255, 209, 3], "Being 0"),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Declare every type, then every predation edge, resolving names.
    pub fn build_graph(&self) -> Result<SpeciesGraph, SimError> {
        let mut graph = SpeciesGraph::new();
        for spec in &self.species {
            if graph.find(&spec.name).is_some() {
                return Err(SimError::DuplicateSpecies(spec.name.clone()));
            }
            graph.add_species(spec.name.clone(), spec.color);
        }
        for spec in &self.species {
            let predator = graph
                .find(&spec.name)
                .ok_or_else(|| SimError::UnknownSpecies(spec.name.clone()))?;
            for prey_name in &spec.preys_on {
                let prey = graph
                    .find(prey_name)
                    .ok_or_else(|| SimError::UnknownSpecies(prey_name.clone()))?;
                graph.declare_predation(predator, prey);
            }
        }
        Ok(graph)
    }
}

/// Scenario plus parameters, as read from a `--config` file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimSettings {
    pub scenario: Scenario,
    #[serde(default)]
    pub config: SimConfig,
}

impl SimSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.config.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
