//! # preygrid
//!
//! Grid ecosystem simulator: typed agents move, hunt, breed, age and die
//! under crowding pressure, one discrete tick at a time.
//!
//! ```rust,no_run
//! use preygrid::{Scenario, SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(&Scenario::predator_prey(), SimConfig::default(), 42)?;
//! sim.run(50);
//! for (name, counts) in sim.history_snapshot() {
//!     println!("{name}: {:?}", counts.last());
//! }
//! # Ok::<(), preygrid::SimError>(())
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod mortality;
pub mod movement;
pub mod predation;
pub mod reporting;
pub mod reproduction;
pub mod simulation;
pub mod species;
pub mod stats;
pub mod store;
pub mod topology;
pub mod visual;

pub use config::{Scenario, SimConfig, SimSettings};
pub use error::SimError;
pub use simulation::Simulation;
pub use species::{SpeciesGraph, SpeciesId};
pub use store::PopulationStore;
pub use topology::{GridTopology, Position};
