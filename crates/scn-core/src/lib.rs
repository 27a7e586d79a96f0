//! `scn-core` — foundational types for the `rust_scenario` toolkit.
//!
//! This crate is a dependency of every other `scn-*` crate.  It has no
//! `scn-*` dependencies and only a handful of external ones (`geo`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `EntityId`, `RouteId`, `EdgeId`, `LaneId`, `VTypeId`, …   |
//! | [`geom`]        | `Point2`, `Polyline` (arc-length stations), shape parsing |
//! | [`time`]        | `Tick`                                                    |
//! | [`rng`]         | `SimRng`                                                  |
//! | [`numeric`]     | `SPEED_EPSILON`, `safe_div`                               |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geom;
pub mod ids;
pub mod numeric;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geom::{Point2, Polyline, parse_shape};
pub use ids::{EdgeId, EntityId, LaneId, RouteId, VClass, VTypeId, ZoneId};
pub use numeric::{SPEED_EPSILON, safe_div};
pub use rng::SimRng;
pub use time::Tick;
