//! Routing zone events to flow enable/disable actions.

use scn_core::{EntityId, Point2, ZoneId};
use scn_engine::TrafficEngine;
use scn_flow::Flow;
use scn_zone::{ZoneEvent, ZoneEvents, ZoneSet};

use crate::ScenarioResult;

/// Handle to a flow registered with an [`EventRouter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey(pub usize);

/// Zones that switch a flow on or off.  Both events default to
/// [`ZoneEvent::Entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGates {
    pub enable_zone:   Option<ZoneId>,
    pub disable_zone:  Option<ZoneId>,
    pub enable_event:  ZoneEvent,
    pub disable_event: ZoneEvent,
}

impl Default for FlowGates {
    fn default() -> Self {
        Self {
            enable_zone:   None,
            disable_zone:  None,
            enable_event:  ZoneEvent::Entry,
            disable_event: ZoneEvent::Entry,
        }
    }
}

impl FlowGates {
    /// Ungated.
    pub fn none() -> Self {
        Self::default()
    }

    /// Enable on entering `enable_zone`, disable on entering `disable_zone`.
    pub fn entry(enable_zone: impl Into<ZoneId>, disable_zone: impl Into<ZoneId>) -> Self {
        Self::none()
            .enable_on(enable_zone, ZoneEvent::Entry)
            .disable_on(disable_zone, ZoneEvent::Entry)
    }

    pub fn enable_on(mut self, zone: impl Into<ZoneId>, event: ZoneEvent) -> Self {
        self.enable_zone = Some(zone.into());
        self.enable_event = event;
        self
    }

    pub fn disable_on(mut self, zone: impl Into<ZoneId>, event: ZoneEvent) -> Self {
        self.disable_zone = Some(zone.into());
        self.disable_event = event;
        self
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneId> {
        self.enable_zone.iter().chain(self.disable_zone.iter())
    }

    fn fired(zone: &Option<ZoneId>, event: ZoneEvent, events: &ZoneEvents) -> bool {
        zone.as_ref().is_some_and(|z| events.get(z) == Some(&event))
    }
}

/// Result of one [`EventRouter::run`].
#[derive(Debug, Clone, Default)]
pub struct RouterReport {
    /// Events of every zone, empty when no point was supplied.
    pub zone_events: ZoneEvents,
    /// Flows whose enabled flag changed, with the new value.
    pub toggles:     Vec<(FlowKey, bool)>,
    pub spawned:     Vec<(FlowKey, EntityId)>,
    /// Entities removed by disabled flows.
    pub vaporized:   usize,
}

/// Owns the scenario's flows and switches them from zone events.
#[derive(Default)]
pub struct EventRouter {
    flows: Vec<(Flow, FlowGates)>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `flow` with explicit gate zones and events.
    pub fn bind(
        &mut self,
        flow:          Flow,
        enable_zone:   impl Into<ZoneId>,
        disable_zone:  impl Into<ZoneId>,
        enable_event:  ZoneEvent,
        disable_event: ZoneEvent,
    ) -> FlowKey {
        self.bind_gates(
            flow,
            FlowGates::none()
                .enable_on(enable_zone, enable_event)
                .disable_on(disable_zone, disable_event),
        )
    }

    pub fn bind_gates(&mut self, flow: Flow, gates: FlowGates) -> FlowKey {
        self.flows.push((flow, gates));
        FlowKey(self.flows.len() - 1)
    }

    /// Register an ungated flow.  It still runs every tick.
    pub fn add(&mut self, flow: Flow) -> FlowKey {
        self.bind_gates(flow, FlowGates::none())
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn flow(&self, key: FlowKey) -> Option<&Flow> {
        self.flows.get(key.0).map(|(f, _)| f)
    }

    pub fn flow_mut(&mut self, key: FlowKey) -> Option<&mut Flow> {
        self.flows.get_mut(key.0).map(|(f, _)| f)
    }

    pub fn flows(&self) -> impl Iterator<Item = (FlowKey, &Flow)> {
        self.flows.iter().enumerate().map(|(i, (f, _))| (FlowKey(i), f))
    }

    pub fn gates(&self) -> impl Iterator<Item = (FlowKey, &FlowGates)> {
        self.flows.iter().enumerate().map(|(i, (_, g))| (FlowKey(i), g))
    }

    /// Evaluate the zones at `point` (if any), apply gate actions, then run
    /// every flow.
    ///
    /// Flows run even without a point so their clocks keep advancing.
    pub fn run<E>(
        &mut self,
        engine: &mut E,
        zones:  &mut ZoneSet,
        point:  Option<Point2>,
    ) -> ScenarioResult<RouterReport>
    where
        E: TrafficEngine + ?Sized,
    {
        let mut report = RouterReport::default();
        if let Some(p) = point {
            report.zone_events = zones.check_all(p, engine.tick());
        }

        for (i, (flow, gates)) in self.flows.iter_mut().enumerate() {
            let was_enabled = flow.is_enabled();
            if FlowGates::fired(&gates.enable_zone, gates.enable_event, &report.zone_events) {
                flow.enable();
            }
            if FlowGates::fired(&gates.disable_zone, gates.disable_event, &report.zone_events) {
                report.vaporized += flow.disable(engine)?;
            }
            if flow.is_enabled() != was_enabled {
                report.toggles.push((FlowKey(i), flow.is_enabled()));
            }
        }

        for (i, (flow, _)) in self.flows.iter_mut().enumerate() {
            if let Some(id) = flow.run(engine)? {
                report.spawned.push((FlowKey(i), id));
            }
        }
        Ok(report)
    }
}
