//! `scn-flow` — dynamic traffic flows.
//!
//! A [`Flow`] emits vehicles or pedestrians along one origin → destination
//! path, either at random (a per-second probability) or on a fixed headway.
//! Flows can be switched on and off at runtime, typically from zone events
//! routed by `scn-scenario`, and can remove what they created when they are
//! switched off.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`config`]   | `FlowConfig` builder, `PedestrianDepart`                   |
//! | [`emission`] | `Emission` model, `per_tick_probability`                   |
//! | [`mix`]      | `VehicleMix` weights and the `MixSampler`                  |
//! | [`removal`]  | `RemovalPolicy`                                            |
//! | [`hook`]     | `SpawnObserver` trait, `NoopSpawnObserver`                 |
//! | [`flow`]     | `Flow`                                                     |
//! | [`error`]    | `FlowError`, `FlowResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `FlowConfig` and parts.  |

pub mod config;
pub mod emission;
pub mod error;
pub mod flow;
pub mod hook;
pub mod mix;
pub mod removal;


pub use config::{FlowConfig, PedestrianDepart};
pub use emission::{Emission, per_tick_probability};
pub use error::{FlowError, FlowResult};
pub use flow::Flow;
pub use hook::{NoopSpawnObserver, SpawnObserver};
pub use mix::{MixSampler, VehicleMix};
pub use removal::RemovalPolicy;
