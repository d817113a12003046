use thiserror::Error;

/// Failures that can occur while building a simulation.
///
/// Once a [`crate::simulation::Simulation`] exists, ticking it cannot fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("topology has no valid cells")]
    EmptyTopology,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unknown species `{0}`")]
    UnknownSpecies(String),
    #[error("species `{0}` declared twice")]
    DuplicateSpecies(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
