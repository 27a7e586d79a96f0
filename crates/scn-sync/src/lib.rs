//! `scn-sync` — time-coincident arrival control.
//!
//! An [`ArrivalSynchronizer`] steers a *partner* vehicle so that it reaches a
//! point on its route at the same moment the *ego* vehicle reaches a point on
//! its own.  Targets queue up in FIFO order; only the head target is
//! controlled.  A [`ConflictVehicle`] is the single-target variant that also
//! decides when to insert the partner into the network.
//!
//! # Crate layout
//!
//! | Module           | Contents                                         |
//! |------------------|--------------------------------------------------|
//! | [`target`]       | `TargetKind`, `ArrivalTarget`                    |
//! | [`path`]         | `PathGeometry` (route polyline, stations)        |
//! | [`synchronizer`] | `ArrivalSynchronizer`, `SyncConfig`, `SyncStep`  |
//! | [`conflict`]     | `ConflictVehicle`, `ConflictStep`                |
//! | [`error`]        | `SyncError`, `SyncResult<T>`                     |

pub mod conflict;
pub mod error;
pub mod path;
pub mod synchronizer;
pub mod target;

#[cfg(test)]
mod tests;

pub use conflict::{ConflictStep, ConflictVehicle, DEFAULT_CONFLICT_RELEASE, ETA_TOLERANCE};
pub use error::{SyncError, SyncResult};
pub use path::PathGeometry;
pub use synchronizer::{
    ArrivalSynchronizer, DEFAULT_BRAKING_DISTANCE, DEFAULT_RELEASE_DISTANCE, SyncConfig, SyncStep,
};
pub use target::{ArrivalTarget, TargetKind};
