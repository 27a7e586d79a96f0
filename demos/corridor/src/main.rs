//! corridor — smallest end-to-end scenario for the rust_scenario toolkit.
//!
//! An ego vehicle drives a straight two-edge corridor at 8 m/s.  Passing
//! the `entry` zone switches on a background flow and the ego's indicator;
//! passing `exit` switches both off and vaporizes the flow's vehicles.  A
//! bus on a crossing street is paced so it reaches the junction together
//! with the ego.

use anyhow::Result;
use log::info;

use scn_core::{EdgeId, EntityId, Point2, RouteId, Tick, ZoneId};
use scn_engine::{ScriptedEngine, SpeedCommand, TrafficEngine};
use scn_flow::FlowConfig;
use scn_scenario::{FlowGates, ScenarioBuilder, ScenarioConfig, ScenarioObserver, TickReport};
use scn_signal::{ChannelGates, SignalChannel, SignalController};
use scn_sync::{ArrivalSynchronizer, SyncConfig, SyncStep};
use scn_zone::{Zone, ZoneEvent};

// ── Constants ─────────────────────────────────────────────────────────────────

const DELTA_T:   f64 = 1.0;
const EGO_SPEED: f64 = 8.0;
const TICKS:     u64 = 64;
const JUNCTION:  Point2 = Point2::new(384.0, 0.0);

// ── Scenario file ─────────────────────────────────────────────────────────────

const SCENARIO_JSON: &str = r#"{
    "scenario": { "seed": 7, "ego": "ego" },
    "flow": {
        "origin":      "in",
        "destination": "out",
        "name":        "background",
        "probability": 0.25,
        "max_count":   12,
        "enabled":     false,
        "removal":     "on_disable",
        "mix":         { "passenger": 3.0, "truck": 1.0 }
    }
}"#;

// ── Network ───────────────────────────────────────────────────────────────────

fn build_engine() -> Result<ScriptedEngine> {
    let mut engine = ScriptedEngine::new(DELTA_T);
    engine
        .add_straight_edge("in", Point2::new(0.0, 0.0), Point2::new(256.0, 0.0), 2, 13.9)
        .add_straight_edge("out", Point2::new(256.0, 0.0), Point2::new(512.0, 0.0), 2, 13.9)
        .add_straight_edge("cross", Point2::new(384.0, -256.0), Point2::new(384.0, 128.0), 1, 13.9)
        .allow_only("in_0", &["pedestrian"])
        .allow_only("out_0", &["pedestrian"])
        .add_vtype("truck", "truck");
    engine.add_route(&RouteId::from("ego_r"), &[EdgeId::from("in"), EdgeId::from("out")], &[])?;
    engine.add_route(&RouteId::from("bus_r"), &[EdgeId::from("cross")], &[])?;
    engine
        .place_vehicle("ego", "passenger", Some("ego_r"), Point2::new(0.0, 0.0), EGO_SPEED)
        .place_vehicle("bus", "passenger", Some("bus_r"), Point2::new(384.0, -192.0), 10.0);
    Ok(engine)
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct CorridorLog {
    zone_events: usize,
    spawned:     usize,
    vaporized:   usize,
    last_mask:   Option<u32>,
}

impl ScenarioObserver for CorridorLog {
    fn on_zone_event(&mut self, tick: Tick, zone: &ZoneId, event: ZoneEvent) {
        info!("{tick}: {event:?} {zone}");
        self.zone_events += 1;
    }

    fn on_flow_toggle(&mut self, tick: Tick, flow: &str, enabled: bool) {
        info!("{tick}: flow {flow} {}", if enabled { "on" } else { "off" });
    }

    fn on_spawn(&mut self, _tick: Tick, _flow: &str, _id: &EntityId) {
        self.spawned += 1;
    }

    fn on_sync_step(&mut self, tick: Tick, partner: &EntityId, step: SyncStep) {
        if !matches!(step, SyncStep::Idle | SyncStep::SetSpeed(_)) {
            info!("{tick}: {partner} {step:?}");
        }
    }

    fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
        self.vaporized += report.vaporized;
        if let Some(mask) = report.signals.first().copied().flatten() {
            self.last_mask = Some(mask);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    println!("=== corridor — rust_scenario ===");

    // 1. Scenario settings and the background flow, from JSON.
    let doc: serde_json::Value = serde_json::from_str(SCENARIO_JSON)?;
    let config: ScenarioConfig = serde_json::from_value(doc["scenario"].clone())?;
    let flow: FlowConfig = serde_json::from_value(doc["flow"].clone())?;
    println!("Seed: {}  |  Ticks: {TICKS}  |  Δt: {DELTA_T} s", config.seed);

    // 2. Engine and components that read it at construction.
    let engine = build_engine()?;
    let mut sync = ArrivalSynchronizer::new(SyncConfig::new("ego", "bus"), &engine)?;
    sync.add_target(JUNCTION, JUNCTION, None);

    let mut indicator = SignalController::new("ego");
    indicator.add_channel(
        SignalChannel::blinking(0)?,
        ChannelGates::none()
            .enable_on("entry", ZoneEvent::Entry)
            .disable_on("exit", ZoneEvent::Entry),
    );

    // 3. Assemble.
    let mut builder = ScenarioBuilder::new(engine, config);
    builder.add_zone(Zone::from_shape("entry", "56,-8 72,-8 72,8 56,8")?)?;
    builder.add_zone(Zone::from_shape("exit", "440,-8 456,-8 456,8 440,8")?)?;
    let key = builder.bind_flow(flow, FlowGates::entry("entry", "exit"))?;
    let sync_index = builder.add_synchronizer(sync);
    builder.add_signal_controller(indicator);
    let mut scenario = builder.build()?;

    // 4. Run.  The scripted engine does not move anything itself, so the
    //    ego follows its corridor and the bus obeys its speed commands.
    let mut obs = CorridorLog::default();
    let mut bus = Point2::new(384.0, -192.0);
    let mut bus_speed = 10.0;
    for t in 1..=TICKS {
        let engine = scenario.engine_mut();
        engine.move_to("ego", Point2::new(EGO_SPEED * t as f64, 0.0));
        if let Some(SpeedCommand::Hold(v)) = engine.speed_control("bus") {
            bus_speed = v;
        }
        bus = Point2::new(bus.x, bus.y + bus_speed * DELTA_T);
        engine.move_to("bus", bus).set_current_speed("bus", bus_speed);

        scenario.step(&mut obs)?;
    }

    // 5. Summary.
    let pending = scenario
        .synchronizer_mut(sync_index)
        .map_or(0, |s| s.pending());
    let flow = scenario
        .flow(key)
        .ok_or_else(|| anyhow::anyhow!("flow {key:?} missing"))?;
    println!();
    println!("Zone transitions : {}", obs.zone_events);
    println!(
        "Flow {:<12}: {} emitted, {} spawned, {} vaporized",
        flow.name(),
        flow.count(),
        obs.spawned,
        obs.vaporized
    );
    println!("Flow enabled     : {}", flow.is_enabled());
    println!("Sync targets left: {pending}");
    println!("Final signals    : {:#034b}", obs.last_mask.unwrap_or(0));
    println!("Bus at           : ({:.1}, {:.1})", bus.x, bus.y);

    Ok(())
}
