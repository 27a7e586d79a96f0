//! `scn-engine` — the simulator boundary.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`engine`]   | `TrafficEngine` trait — the capability the toolkit consumes   |
//! | [`command`]  | `SpeedCommand`, `VehicleSpec`, `PersonSpec`, departure options |
//! | [`lanes`]    | rightmost-allowed-lane lookup, route shapes, depart sampling  |
//! | [`scripted`] | `ScriptedEngine` — in-memory engine for tests and demos       |
//! | [`error`]    | `EngineError`, `EngineResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on departure options. |

pub mod command;
pub mod engine;
pub mod error;
pub mod lanes;
pub mod scripted;

#[cfg(test)]
mod tests;

pub use command::{
    ArrivalSpeed, DepartPos, DepartSpeed, PersonSpec, SpeedCommand, VehicleSpec, WalkStage,
};
pub use engine::TrafficEngine;
pub use error::{EngineError, EngineResult};
pub use lanes::{random_depart_pos, rightmost_allowed_lane, route_shape};
pub use scripted::{Command, ScriptedEngine};
