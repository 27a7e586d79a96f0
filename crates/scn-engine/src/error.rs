//! Engine-level error type.
//!
//! Everything here is a failure reported by (or on behalf of) the external
//! simulator.  The core never retries; these propagate unchanged to the
//! caller of the per-tick driver.

use thiserror::Error;

use scn_core::{EdgeId, EntityId, LaneId, RouteId, VTypeId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("entity {0} is not present in the simulation")]
    UnknownEntity(EntityId),

    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    #[error("route {0} not found")]
    UnknownRoute(RouteId),

    #[error("edge {0} not found")]
    UnknownEdge(EdgeId),

    #[error("lane {0} not found")]
    UnknownLane(LaneId),

    #[error("vehicle type {0} not found")]
    UnknownType(VTypeId),

    #[error("route {route} rejected: {reason}")]
    RouteRejected { route: RouteId, reason: String },

    #[error("no route from {from} to {to}")]
    NoRoute { from: EdgeId, to: EdgeId },

    #[error("simulator failure: {0}")]
    Backend(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
