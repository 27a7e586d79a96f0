//! Flow configuration and runtime errors.
//!
//! Everything except `Engine` is raised by [`Flow::new`][crate::Flow::new]
//! and aborts scenario setup.

use thiserror::Error;

use scn_core::{EdgeId, VClass, VTypeId};
use scn_engine::EngineError;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid emission model: {0}")]
    EmissionModel(String),

    #[error("invalid vehicle mix: {0}")]
    InvalidMix(String),

    #[error("flow mixes pedestrian type {pedestrian} with vehicle type {vehicle}")]
    MixedTypeClasses { pedestrian: VTypeId, vehicle: VTypeId },

    #[error("flow {0}: proximity removal is not supported for pedestrian flows")]
    ProximityRemovalForPedestrians(String),

    #[error("no lane of edge {edge} admits class {class}")]
    NoAllowedLane { edge: EdgeId, class: VClass },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type FlowResult<T> = Result<T, FlowError>;
