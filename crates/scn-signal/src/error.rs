use thiserror::Error;

use scn_engine::EngineError;
use scn_zone::ZoneError;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal bit {0} does not fit in a 32-bit mask")]
    BitOutOfRange(u8),

    #[error("invalid blink pattern: {0}")]
    InvalidPattern(String),

    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type SignalResult<T> = Result<T, SignalError>;
