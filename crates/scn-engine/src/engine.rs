//! The `TrafficEngine` trait — everything the toolkit needs from a simulator.
//!
//! # Pluggability
//!
//! Controllers in `scn-zone`, `scn-sync`, `scn-flow` and `scn-signal` talk to
//! the simulator only through this trait, so a scenario runs unchanged
//! against a live simulator connection or the in-memory
//! [`ScriptedEngine`][crate::ScriptedEngine].
//!
//! The simulator owns all entity state.  Implementations answer queries
//! about the *current* step; nothing returned here is cached by callers
//! across ticks.

use scn_core::{EdgeId, EntityId, LaneId, Point2, RouteId, Tick, VClass, VTypeId};

use crate::{EngineResult, PersonSpec, SpeedCommand, VehicleSpec, WalkStage};

pub trait TrafficEngine {
    // ── Clock ─────────────────────────────────────────────────────────────

    /// Advance the simulation by one step.  The only blocking call in a tick.
    fn step(&mut self) -> EngineResult<()>;

    /// Number of completed steps.
    fn tick(&self) -> Tick;

    /// Current simulated time in seconds.
    fn time_secs(&self) -> f64;

    /// Length of one step in seconds.
    fn delta_t(&self) -> f64;

    // ── Entity lifecycle ──────────────────────────────────────────────────

    /// Ids of all vehicles currently in the network.
    fn vehicle_ids(&self) -> EngineResult<Vec<EntityId>>;

    /// Ids of all persons currently in the network.
    fn person_ids(&self) -> EngineResult<Vec<EntityId>>;

    /// Whether `id` is a vehicle currently in the network.
    fn has_vehicle(&self, id: &EntityId) -> EngineResult<bool> {
        Ok(self.vehicle_ids()?.contains(id))
    }

    fn add_vehicle(&mut self, spec: &VehicleSpec) -> EngineResult<()>;

    fn add_person(&mut self, spec: &PersonSpec) -> EngineResult<()>;

    fn append_walking_stage(&mut self, person: &EntityId, stage: &WalkStage) -> EngineResult<()>;

    /// Remove a vehicle immediately ("vaporize").
    fn remove_vehicle(&mut self, id: &EntityId) -> EngineResult<()>;

    fn remove_person(&mut self, id: &EntityId) -> EngineResult<()>;

    // ── Entity state ──────────────────────────────────────────────────────

    fn position(&self, id: &EntityId) -> EngineResult<Point2>;

    /// Current speed in m/s.
    fn speed(&self, id: &EntityId) -> EngineResult<f64>;

    /// Offset of a vehicle along its current lane, in metres.
    fn lane_position(&self, id: &EntityId) -> EngineResult<f64>;

    /// The route a vehicle is currently following.
    fn vehicle_route(&self, id: &EntityId) -> EngineResult<RouteId>;

    fn command_speed(&mut self, id: &EntityId, command: SpeedCommand) -> EngineResult<()>;

    /// Vehicles within `radius` metres of `center` (excluding `center`).
    fn vehicles_near(&self, center: &EntityId, radius: f64) -> EngineResult<Vec<EntityId>>;

    /// Signal bitmask of a vehicle (blinkers, brake light, …).
    fn signals(&self, id: &EntityId) -> EngineResult<u32>;

    fn set_signals(&mut self, id: &EntityId, mask: u32) -> EngineResult<()>;

    /// Hand the signal mask back to the simulator so the next read reflects
    /// what it computes itself, not the last [`set_signals`][Self::set_signals].
    fn restore_signals(&mut self, id: &EntityId) -> EngineResult<()>;

    // ── Routes ────────────────────────────────────────────────────────────

    fn route_ids(&self) -> EngineResult<Vec<RouteId>>;

    /// Register `edges` as route `id`; `via` edges must be visited in order.
    fn add_route(&mut self, id: &RouteId, edges: &[EdgeId], via: &[EdgeId]) -> EngineResult<()>;

    fn route_edges(&self, id: &RouteId) -> EngineResult<Vec<EdgeId>>;

    /// The edge sequence a vehicle of `type_id` would drive from `from` to
    /// `to` through `via`.
    fn find_route(
        &self,
        from:    &EdgeId,
        to:      &EdgeId,
        type_id: &VTypeId,
        via:     &[EdgeId],
    ) -> EngineResult<Vec<EdgeId>>;

    // ── Network ───────────────────────────────────────────────────────────

    /// Lanes of `edge`, rightmost first.
    fn edge_lanes(&self, edge: &EdgeId) -> EngineResult<Vec<LaneId>>;

    fn lane_length(&self, lane: &LaneId) -> EngineResult<f64>;

    /// Speed limit in m/s.
    fn lane_max_speed(&self, lane: &LaneId) -> EngineResult<f64>;

    fn lane_shape(&self, lane: &LaneId) -> EngineResult<Vec<Point2>>;

    /// Classes allowed on `lane`.  Empty means every class is allowed.
    fn lane_allowed(&self, lane: &LaneId) -> EngineResult<Vec<VClass>>;

    /// The abstract class of a vehicle or pedestrian type.
    fn type_class(&self, type_id: &VTypeId) -> EngineResult<VClass>;
}
