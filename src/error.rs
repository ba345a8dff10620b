use crate::simulation::CarId;
use thiserror::Error;

/// Failures reported by the rendering collaborator.
#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("failed to load asset '{asset}': {reason}")]
    AssetLoad { asset: String, reason: String },

    #[error("presentation backend unavailable")]
    Unavailable,
}

/// A single car lifecycle that could not run to completion.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("car {car} could not be created: {source}")]
    Creation {
        car: CarId,
        #[source]
        source: PresentationError,
    },
}

impl LifecycleError {
    pub fn car(&self) -> CarId {
        match self {
            LifecycleError::Creation { car, .. } => *car,
        }
    }
}

/// Failures that stop the whole simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("scene setup failed")]
    Scene(#[from] PresentationError),

    #[error("could not start lifecycle thread for car {car}")]
    Spawn {
        car: CarId,
        #[source]
        source: std::io::Error,
    },

    /// Only seen when panics unwind; the release profile aborts instead.
    #[error("lifecycle of car {0} panicked")]
    LifecyclePanicked(CarId),
}
