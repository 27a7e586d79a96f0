use thiserror::Error;

use scn_core::{CoreError, ZoneId};

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("zone {id} needs at least 3 points, got {count}")]
    TooFewPoints { id: ZoneId, count: usize },

    #[error("zone {0} is defined twice")]
    DuplicateId(ZoneId),

    #[error("zone {0} not found")]
    UnknownZone(ZoneId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ZoneResult<T> = Result<T, ZoneError>;
