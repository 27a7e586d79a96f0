//! Unit and end-to-end tests for scn-scenario.

use scn_core::{EntityId, Point2, SimRng, Tick, ZoneId};
use scn_engine::{ScriptedEngine, TrafficEngine};
use scn_flow::{Flow, FlowConfig, RemovalPolicy};
use scn_zone::{Zone, ZoneEvent, ZoneSet};

use crate::{
    EventRouter, FlowGates, ScenarioBuilder, ScenarioConfig, ScenarioError, ScenarioObserver,
    TickReport,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Edges `a` then `b` along the x axis, 100 m each.  Lane 0 of each edge
/// is a sidewalk, lane 1 admits everything.  The ego sits at the origin.
fn network() -> ScriptedEngine {
    let mut engine = ScriptedEngine::new(1.0);
    engine
        .add_straight_edge("a", Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 2, 13.9)
        .add_straight_edge("b", Point2::new(100.0, 0.0), Point2::new(200.0, 0.0), 2, 13.9)
        .allow_only("a_0", &["pedestrian"])
        .allow_only("b_0", &["pedestrian"])
        .place_vehicle("ego", "passenger", None, Point2::new(0.0, 0.0), 2.0);
    engine
}

/// 10 × 10 box centred on (`x`, 0).
fn gate(id: &str, x: f64) -> Zone {
    Zone::new(
        id,
        [
            Point2::new(x - 5.0, -5.0),
            Point2::new(x + 5.0, -5.0),
            Point2::new(x + 5.0, 5.0),
            Point2::new(x - 5.0, 5.0),
        ],
    )
    .unwrap()
}

#[derive(Default)]
struct Recorder {
    toggles:     Vec<(Tick, String, bool)>,
    zone_events: Vec<(Tick, ZoneId, ZoneEvent)>,
    spawns:      usize,
    ticks:       usize,
}

impl ScenarioObserver for Recorder {
    fn on_zone_event(&mut self, tick: Tick, zone: &ZoneId, event: ZoneEvent) {
        self.zone_events.push((tick, zone.clone(), event));
    }

    fn on_flow_toggle(&mut self, tick: Tick, flow: &str, enabled: bool) {
        self.toggles.push((tick, flow.to_owned(), enabled));
    }

    fn on_spawn(&mut self, _tick: Tick, _flow: &str, _id: &EntityId) {
        self.spawns += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {
        self.ticks += 1;
    }
}

// ── EventRouter ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use super::*;

    #[test]
    fn flows_run_without_point() {
        let mut engine = network();
        let mut zones = ZoneSet::from_zones([gate("on", 50.0), gate("off", 150.0)]).unwrap();
        let flow = Flow::new(FlowConfig::new("a", "b").headway(1.0), &mut engine, SimRng::new(1)).unwrap();
        let mut router = EventRouter::new();
        let key = router.add(flow);

        engine.step().unwrap();
        let report = router.run(&mut engine, &mut zones, None).unwrap();
        assert!(report.zone_events.is_empty());
        assert_eq!(report.spawned.len(), 1);
        assert_eq!(report.spawned[0].0, key);
    }

    #[test]
    fn bind_uses_configured_events() {
        let mut engine = network();
        let mut zones = ZoneSet::from_zones([gate("z", 50.0)]).unwrap();
        let flow = Flow::new(
            FlowConfig::new("a", "b").probability(0.0).enabled(false),
            &mut engine,
            SimRng::new(1),
        )
        .unwrap();
        let mut router = EventRouter::new();
        // Enabled on leaving the zone, disabled on entering it.
        let key = router.bind(flow, "z", "z", ZoneEvent::Exit, ZoneEvent::Entry);

        let mut states = Vec::new();
        for x in [0.0, 50.0, 100.0] {
            engine.step().unwrap();
            router.run(&mut engine, &mut zones, Some(Point2::new(x, 0.0))).unwrap();
            states.push(router.flow(key).unwrap().is_enabled());
        }
        assert_eq!(states, [false, false, true]);
    }

    #[test]
    fn toggles_only_report_changes() {
        let mut engine = network();
        let mut zones = ZoneSet::from_zones([gate("on", 50.0), gate("off", 150.0)]).unwrap();
        let flow = Flow::new(FlowConfig::new("a", "b").probability(0.0), &mut engine, SimRng::new(1)).unwrap();
        let mut router = EventRouter::new();
        router.bind_gates(flow, FlowGates::entry("on", "off"));

        // Already enabled: entering "on" is not a change.
        engine.step().unwrap();
        let report = router.run(&mut engine, &mut zones, Some(Point2::new(50.0, 0.0))).unwrap();
        assert!(report.toggles.is_empty());
        assert_eq!(report.zone_events[&ZoneId::from("on")], ZoneEvent::Entry);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use scn_signal::{ChannelGates, SignalChannel, SignalController};

    #[test]
    fn unknown_flow_zone_fails_build() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(1).ego("ego"));
        builder.add_zone(gate("entry", 50.0)).unwrap();
        builder
            .bind_flow(FlowConfig::new("a", "b").probability(0.1), FlowGates::entry("entry", "missing"))
            .unwrap();
        match builder.build() {
            Err(ScenarioError::UnknownZone { zone, .. }) => assert_eq!(zone.as_str(), "missing"),
            other => panic!("expected UnknownZone, got {:?}", other.err()),
        }
    }

    #[test]
    fn unknown_signal_zone_fails_build() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(1).ego("ego"));
        let mut controller = SignalController::new("ego");
        controller.add_channel(
            SignalChannel::steady(0).unwrap(),
            ChannelGates::none().enable_on("nowhere", ZoneEvent::Entry),
        );
        builder.add_signal_controller(controller);
        assert!(matches!(builder.build(), Err(ScenarioError::UnknownZone { .. })));
    }

    #[test]
    fn duplicate_zone_rejected() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(1));
        builder.add_zone(gate("z", 0.0)).unwrap();
        assert!(matches!(builder.add_zone(gate("z", 10.0)), Err(ScenarioError::Zone(_))));
    }

    #[test]
    fn flow_errors_surface_immediately() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(1));
        assert!(matches!(
            builder.add_flow(FlowConfig::new("a", "b")),
            Err(ScenarioError::Flow(_))
        ));
    }
}

// ── End to end ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use super::*;
    use scn_signal::{ChannelGates, SignalChannel, SignalController};
    use scn_core::{EdgeId, RouteId};
    use scn_sync::{ArrivalSynchronizer, SyncConfig, SyncStep};

    #[test]
    fn entry_enables_exit_disables_and_vaporizes() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(2024).ego("ego"));
        builder.add_zone(gate("entry", 50.0)).unwrap();
        builder.add_zone(gate("exit", 150.0)).unwrap();
        let key = builder
            .bind_flow(
                FlowConfig::new("a", "b")
                    .probability(0.2)
                    .enabled(false)
                    .removal(RemovalPolicy::OnDisable),
                FlowGates::entry("entry", "exit"),
            )
            .unwrap();
        let mut scenario = builder.build().unwrap();
        let mut recorder = Recorder::default();

        let mut enabled = vec![scenario.flow(key).unwrap().is_enabled()];
        // The ego moves 2 m per tick from x = 2 to x = 200.
        for t in 1..=100 {
            scenario.engine_mut().move_to("ego", Point2::new(2.0 * t as f64, 0.0));
            scenario.step(&mut recorder).unwrap();
            let now = scenario.flow(key).unwrap().is_enabled();
            if enabled.last() != Some(&now) {
                enabled.push(now);
            }
        }

        assert_eq!(enabled, [false, true, false]);
        let toggles: Vec<bool> = recorder.toggles.iter().map(|(_, _, on)| *on).collect();
        assert_eq!(toggles, [true, false]);
        // Entry at x = 46 (tick 23), exit at x = 146 (tick 73).
        assert_eq!(recorder.toggles[0].0, Tick(23));
        assert_eq!(recorder.toggles[1].0, Tick(73));

        let flow = scenario.flow(key).unwrap();
        assert!(flow.count() > 0);
        assert_eq!(recorder.spawns as u64, flow.count());
        assert!(flow.created().is_empty());
        let vehicles = scenario.engine().vehicle_ids().unwrap();
        assert_eq!(vehicles, [EntityId::from("ego")]);
        assert_eq!(recorder.ticks, 100);
    }

    #[test]
    fn zone_events_reach_observer_once() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(1).ego("ego"));
        builder.add_zone(gate("z", 10.0)).unwrap();
        let mut controller = SignalController::new("ego");
        // The signal controller checks the same zone later in the tick.
        controller.add_channel(
            SignalChannel::steady(2).unwrap(),
            ChannelGates::none().enable_on("z", ZoneEvent::Entry),
        );
        builder.add_signal_controller(controller);
        let mut scenario = builder.build().unwrap();
        let mut recorder = Recorder::default();

        let mut masks = Vec::new();
        for x in [0.0, 10.0, 10.0, 30.0] {
            scenario.engine_mut().move_to("ego", Point2::new(x, 0.0));
            masks.push(scenario.step(&mut recorder).unwrap().signals[0]);
        }
        let events: Vec<(u64, ZoneEvent)> =
            recorder.zone_events.iter().map(|(t, _, e)| (t.0, *e)).collect();
        assert_eq!(events, [(2, ZoneEvent::Entry), (4, ZoneEvent::Exit)]);
        assert_eq!(masks, [Some(0), Some(1 << 2), Some(1 << 2), Some(1 << 2)]);
    }

    #[test]
    fn absent_ego_leaves_zones_idle() {
        let mut builder = ScenarioBuilder::new(network(), ScenarioConfig::new(1).ego("ghost"));
        builder.add_zone(gate("z", 0.0)).unwrap();
        let mut scenario = builder.build().unwrap();
        let report = scenario.step(&mut Recorder::default()).unwrap();
        assert!(report.ego.is_none());
        assert!(report.zone_events.is_empty());
    }

    #[test]
    fn synchronizers_run_every_tick() {
        let mut engine = network();
        engine.add_straight_edge("n", Point2::new(128.0, -128.0), Point2::new(128.0, 128.0), 1, 13.9);
        engine
            .add_route(&RouteId::from("ego_r"), &[EdgeId::from("a"), EdgeId::from("b")], &[])
            .unwrap();
        engine.add_route(&RouteId::from("cv_r"), &[EdgeId::from("n")], &[]).unwrap();
        engine.place_vehicle("cv", "passenger", Some("cv_r"), Point2::new(128.0, -64.0), 8.0);

        let config = SyncConfig::new("ego", "cv").ego_route("ego_r");
        let mut sync = ArrivalSynchronizer::new(config, &engine).unwrap();
        sync.add_target(Point2::new(128.0, 0.0), Point2::new(128.0, 0.0), None);

        let mut builder = ScenarioBuilder::new(engine, ScenarioConfig::new(1).ego("ego"));
        builder.add_synchronizer(sync);
        let mut scenario = builder.build().unwrap();

        // Ego 128 m at 2 m/s → 64 s; partner 64 m → 1 m/s.
        let report = scenario.step(&mut Recorder::default()).unwrap();
        let [SyncStep::SetSpeed(v)] = report.sync_steps[..] else {
            panic!("unexpected steps {:?}", report.sync_steps);
        };
        assert!((v - 1.0).abs() < 1e-9, "v = {v}");
    }
}
