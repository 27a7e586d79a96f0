//! Scenario-level error type.
//!
//! Wraps every component error with `#[from]` so the driver can use `?`
//! throughout.

use thiserror::Error;

use scn_core::ZoneId;
use scn_engine::EngineError;
use scn_flow::FlowError;
use scn_signal::SignalError;
use scn_sync::SyncError;
use scn_zone::ZoneError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("{user} refers to unknown zone {zone}")]
    UnknownZone { zone: ZoneId, user: String },

    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
