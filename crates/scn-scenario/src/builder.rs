//! Fluent builder for constructing a [`Scenario`].

use scn_core::SimRng;
use scn_engine::TrafficEngine;
use scn_flow::{Flow, FlowConfig, SpawnObserver};
use scn_signal::SignalController;
use scn_sync::{ArrivalSynchronizer, ConflictVehicle};
use scn_zone::{Zone, ZoneSet};

use crate::{EventRouter, FlowGates, FlowKey, Scenario, ScenarioConfig, ScenarioError, ScenarioResult};

/// Collects the components of a [`Scenario`] around an engine.
///
/// Components that need the engine at construction (flows register routes,
/// synchronizers read route geometry) are built against
/// [`engine`](Self::engine) / [`engine_mut`](Self::engine_mut) as they are
/// added, so configuration errors surface at the call that caused them.
/// Zone references are checked once, in [`build`](Self::build).
///
/// # Example
///
/// ```rust,ignore
/// let mut builder = ScenarioBuilder::new(engine, ScenarioConfig::new(7).ego("ego"));
/// builder.add_zone(Zone::from_shape("entry", "40,-5 60,-5 60,5 40,5")?)?;
/// builder.add_zone(Zone::from_shape("exit", "140,-5 160,-5 160,5 140,5")?)?;
/// builder.bind_flow(
///     FlowConfig::new("a", "b").probability(0.2).enabled(false),
///     FlowGates::entry("entry", "exit"),
/// )?;
/// let mut scenario = builder.build()?;
/// scenario.run_ticks(600, &mut NoopScenarioObserver)?;
/// ```
pub struct ScenarioBuilder<E: TrafficEngine> {
    engine:        E,
    config:        ScenarioConfig,
    rng:           SimRng,
    zones:         ZoneSet,
    router:        EventRouter,
    synchronizers: Vec<ArrivalSynchronizer>,
    conflicts:     Vec<ConflictVehicle>,
    signals:       Vec<SignalController>,
}

impl<E: TrafficEngine> ScenarioBuilder<E> {
    pub fn new(engine: E, config: ScenarioConfig) -> Self {
        Self {
            rng: SimRng::new(config.seed),
            engine,
            config,
            zones: ZoneSet::new(),
            router: EventRouter::new(),
            synchronizers: Vec::new(),
            conflicts: Vec::new(),
            signals: Vec::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn add_zone(&mut self, zone: Zone) -> ScenarioResult<&mut Self> {
        self.zones.insert(zone)?;
        Ok(self)
    }

    /// Add a flow that runs every tick without zone gating.
    pub fn add_flow(&mut self, config: FlowConfig) -> ScenarioResult<FlowKey> {
        self.bind_flow(config, FlowGates::none())
    }

    /// Add a flow switched on and off by zone events.
    pub fn bind_flow(&mut self, config: FlowConfig, gates: FlowGates) -> ScenarioResult<FlowKey> {
        let rng = self.next_flow_rng();
        let flow = Flow::new(config, &mut self.engine, rng)?;
        Ok(self.router.bind_gates(flow, gates))
    }

    /// As [`bind_flow`](Self::bind_flow), with a hook called after each
    /// emission.
    pub fn bind_flow_with_observer(
        &mut self,
        config:   FlowConfig,
        gates:    FlowGates,
        observer: Box<dyn SpawnObserver>,
    ) -> ScenarioResult<FlowKey> {
        let rng = self.next_flow_rng();
        let flow = Flow::with_observer(config, &mut self.engine, rng, observer)?;
        Ok(self.router.bind_gates(flow, gates))
    }

    /// Add a synchronizer; returns its index.
    pub fn add_synchronizer(&mut self, synchronizer: ArrivalSynchronizer) -> usize {
        self.synchronizers.push(synchronizer);
        self.synchronizers.len() - 1
    }

    pub fn add_conflict_vehicle(&mut self, conflict: ConflictVehicle) -> usize {
        self.conflicts.push(conflict);
        self.conflicts.len() - 1
    }

    pub fn add_signal_controller(&mut self, controller: SignalController) -> usize {
        self.signals.push(controller);
        self.signals.len() - 1
    }

    /// Check every zone reference and assemble the scenario.
    pub fn build(self) -> ScenarioResult<Scenario<E>> {
        for (key, gates) in self.router.gates() {
            for zone in gates.zones() {
                if !self.zones.contains(zone) {
                    let name = self.router.flow(key).map_or("?", Flow::name);
                    return Err(ScenarioError::UnknownZone {
                        zone: zone.clone(),
                        user: format!("flow {name}"),
                    });
                }
            }
        }
        for controller in &self.signals {
            for zone in controller.referenced_zones() {
                if !self.zones.contains(zone) {
                    return Err(ScenarioError::UnknownZone {
                        zone: zone.clone(),
                        user: format!("signals of {}", controller.entity()),
                    });
                }
            }
        }

        Ok(Scenario::from_parts(
            self.engine,
            self.config,
            self.zones,
            self.router,
            self.synchronizers,
            self.conflicts,
            self.signals,
        ))
    }

    fn next_flow_rng(&mut self) -> SimRng {
        let offset = self.router.len() as u64;
        self.rng.child(offset)
    }
}
