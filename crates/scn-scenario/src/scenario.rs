//! The per-tick scenario driver.

use log::debug;

use scn_core::{EntityId, Point2, Tick};
use scn_engine::TrafficEngine;
use scn_flow::Flow;
use scn_signal::SignalController;
use scn_sync::{ArrivalSynchronizer, ConflictStep, ConflictVehicle, SyncStep};
use scn_zone::{ZoneEvents, ZoneSet};

use crate::{EventRouter, FlowKey, ScenarioConfig, ScenarioObserver, ScenarioResult};

/// Everything that happened in one [`Scenario::step`].
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick:        Tick,
    /// Ego position used for zone checks, if the ego was present.
    pub ego:         Option<Point2>,
    pub zone_events: ZoneEvents,
    pub toggles:     Vec<(FlowKey, bool)>,
    pub spawned:     Vec<(FlowKey, EntityId)>,
    pub vaporized:   usize,
    pub sync_steps:  Vec<SyncStep>,
    /// `None` for conflict vehicles skipped because the ego was absent.
    pub conflicts:   Vec<Option<ConflictStep>>,
    /// `None` for controllers whose vehicle was absent.
    pub signals:     Vec<Option<u32>>,
}

/// A running scenario: the engine plus every scripted component.
///
/// Build one with [`ScenarioBuilder`][crate::ScenarioBuilder].
pub struct Scenario<E: TrafficEngine> {
    engine:        E,
    config:        ScenarioConfig,
    zones:         ZoneSet,
    router:        EventRouter,
    synchronizers: Vec<ArrivalSynchronizer>,
    conflicts:     Vec<ConflictVehicle>,
    signals:       Vec<SignalController>,
}

impl<E: TrafficEngine> Scenario<E> {
    pub(crate) fn from_parts(
        engine:        E,
        config:        ScenarioConfig,
        zones:         ZoneSet,
        router:        EventRouter,
        synchronizers: Vec<ArrivalSynchronizer>,
        conflicts:     Vec<ConflictVehicle>,
        signals:       Vec<SignalController>,
    ) -> Self {
        Self { engine, config, zones, router, synchronizers, conflicts, signals }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn flow(&self, key: FlowKey) -> Option<&Flow> {
        self.router.flow(key)
    }

    pub fn flow_mut(&mut self, key: FlowKey) -> Option<&mut Flow> {
        self.router.flow_mut(key)
    }

    pub fn synchronizer_mut(&mut self, index: usize) -> Option<&mut ArrivalSynchronizer> {
        self.synchronizers.get_mut(index)
    }

    pub fn conflict_vehicle_mut(&mut self, index: usize) -> Option<&mut ConflictVehicle> {
        self.conflicts.get_mut(index)
    }

    pub fn signal_controller_mut(&mut self, index: usize) -> Option<&mut SignalController> {
        self.signals.get_mut(index)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the engine one step and run every component once, in order.
    pub fn step<O: ScenarioObserver>(&mut self, observer: &mut O) -> ScenarioResult<TickReport> {
        self.engine.step()?;
        let tick = self.engine.tick();
        observer.on_tick_start(tick);

        let ego = self.ego_state()?;
        let point = ego.map(|(p, _)| p);

        let routed = self.router.run(&mut self.engine, &mut self.zones, point)?;
        for (zone, event) in &routed.zone_events {
            if event.is_transition() {
                observer.on_zone_event(tick, zone, *event);
            }
        }
        for (key, enabled) in &routed.toggles {
            if let Some(flow) = self.router.flow(*key) {
                observer.on_flow_toggle(tick, flow.name(), *enabled);
            }
        }
        for (key, id) in &routed.spawned {
            if let Some(flow) = self.router.flow(*key) {
                observer.on_spawn(tick, flow.name(), id);
            }
        }

        let mut sync_steps = Vec::with_capacity(self.synchronizers.len());
        for sync in &mut self.synchronizers {
            let step = sync.check(&mut self.engine)?;
            observer.on_sync_step(tick, sync.partner(), step);
            sync_steps.push(step);
        }

        let mut conflicts = Vec::with_capacity(self.conflicts.len());
        for conflict in &mut self.conflicts {
            conflicts.push(match ego {
                Some((pos, speed)) => Some(conflict.check(&mut self.engine, pos, speed)?),
                None => None,
            });
        }

        let mut signals = Vec::with_capacity(self.signals.len());
        for controller in &mut self.signals {
            signals.push(controller.update(&mut self.engine, &mut self.zones)?);
        }

        let report = TickReport {
            tick,
            ego: point,
            zone_events: routed.zone_events,
            toggles: routed.toggles,
            spawned: routed.spawned,
            vaporized: routed.vaporized,
            sync_steps,
            conflicts,
            signals,
        };
        if !report.spawned.is_empty() || report.vaporized > 0 {
            debug!(
                "{tick}: spawned {}, vaporized {}",
                report.spawned.len(),
                report.vaporized
            );
        }
        observer.on_tick_end(tick, &report);
        Ok(report)
    }

    /// Run `ticks` steps.
    pub fn run_ticks<O: ScenarioObserver>(&mut self, ticks: u64, observer: &mut O) -> ScenarioResult<()> {
        for _ in 0..ticks {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Position and speed of the ego, if one is configured and present.
    fn ego_state(&self) -> ScenarioResult<Option<(Point2, f64)>> {
        let Some(ego) = &self.config.ego else {
            return Ok(None);
        };
        if !self.engine.has_vehicle(ego)? {
            return Ok(None);
        }
        Ok(Some((self.engine.position(ego)?, self.engine.speed(ego)?)))
    }
}
