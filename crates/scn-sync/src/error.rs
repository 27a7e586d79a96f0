use thiserror::Error;

use scn_core::{EdgeId, RouteId, VTypeId};
use scn_engine::EngineError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("route {0} has no edges")]
    EmptyRoute(RouteId),

    #[error("no lane of edge {edge} admits type {type_id}")]
    NoAllowedLane { edge: EdgeId, type_id: VTypeId },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type SyncResult<T> = Result<T, SyncError>;
