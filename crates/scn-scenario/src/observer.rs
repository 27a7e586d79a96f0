//! Scenario observer trait for logging and data collection.

use scn_core::{EntityId, Tick, ZoneId};
use scn_sync::SyncStep;
use scn_zone::ZoneEvent;

use crate::TickReport;

/// Callbacks invoked by [`Scenario::step`][crate::Scenario::step].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait ScenarioObserver {
    /// Called right after the engine has advanced.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every zone entry or exit of the ego.
    fn on_zone_event(&mut self, _tick: Tick, _zone: &ZoneId, _event: ZoneEvent) {}

    /// Called when a zone event switches a flow on or off.
    fn on_flow_toggle(&mut self, _tick: Tick, _flow: &str, _enabled: bool) {}

    fn on_spawn(&mut self, _tick: Tick, _flow: &str, _id: &EntityId) {}

    /// Called with the outcome of every synchronizer check.
    fn on_sync_step(&mut self, _tick: Tick, _partner: &EntityId, _step: SyncStep) {}

    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}
}

/// A [`ScenarioObserver`] that does nothing.
pub struct NoopScenarioObserver;

impl ScenarioObserver for NoopScenarioObserver {}
