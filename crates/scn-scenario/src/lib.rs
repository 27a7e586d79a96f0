//! `scn-scenario` — wiring zones, flows, synchronizers and signals into one
//! per-tick loop.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`router`]   | `EventRouter`, `FlowGates`, `FlowKey`, `RouterReport`      |
//! | [`config`]   | `ScenarioConfig`                                           |
//! | [`builder`]  | `ScenarioBuilder`                                          |
//! | [`scenario`] | `Scenario`, `TickReport`                                   |
//! | [`observer`] | `ScenarioObserver` trait, `NoopScenarioObserver`           |
//! | [`error`]    | `ScenarioError`, `ScenarioResult<T>`                       |
//!
//! # Tick order
//!
//! ```text
//! engine.step()
//!   → zones evaluated against the ego position
//!   → flows enabled / disabled from zone events
//!   → every flow runs
//!   → arrival synchronizers
//!   → conflict vehicles
//!   → signal controllers
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod router;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use builder::ScenarioBuilder;
pub use config::ScenarioConfig;
pub use error::{ScenarioError, ScenarioResult};
pub use observer::{NoopScenarioObserver, ScenarioObserver};
pub use router::{EventRouter, FlowGates, FlowKey, RouterReport};
pub use scenario::{Scenario, TickReport};
