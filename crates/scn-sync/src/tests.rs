//! Unit tests for scn-sync.

use scn_core::{EdgeId, Point2, RouteId};
use scn_engine::{ScriptedEngine, SpeedCommand, TrafficEngine};

use crate::{ArrivalSynchronizer, SyncConfig, SyncStep};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// The ego drives east along `e` (y = 0, x 0..256); the partner drives north
/// along `n` (x = 128, y -128..128).  Both routes cross at (128, 0), which
/// is station 128 on each.
fn crossing() -> ScriptedEngine {
    let mut engine = ScriptedEngine::new(1.0);
    engine
        .add_straight_edge("e", Point2::new(0.0, 0.0), Point2::new(256.0, 0.0), 1, 16.0)
        .add_straight_edge("n", Point2::new(128.0, -128.0), Point2::new(128.0, 128.0), 1, 16.0);
    engine.add_route(&RouteId::from("ego_r"), &[EdgeId::from("e")], &[]).unwrap();
    engine.add_route(&RouteId::from("cv_r"), &[EdgeId::from("n")], &[]).unwrap();
    engine
        .place_vehicle("ego", "passenger", Some("ego_r"), Point2::new(64.0, 0.0), 8.0)
        .place_vehicle("cv", "passenger", Some("cv_r"), Point2::new(128.0, -64.0), 8.0);
    engine.take_commands();
    engine
}

const CROSS: Point2 = Point2::new(128.0, 0.0);

fn synchronizer(engine: &ScriptedEngine) -> ArrivalSynchronizer {
    ArrivalSynchronizer::new(SyncConfig::new("ego", "cv"), engine).unwrap()
}

// ── Match targets ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod matching {
    use super::*;

    #[test]
    fn routes_default_to_current_routes() {
        let engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_target(CROSS, CROSS, None);
        let head = sync.head().unwrap();
        assert_eq!(head.ego_station, 128.0);
        assert_eq!(head.partner_station, 128.0);
        assert_eq!(head.release_distance, 10.0);
    }

    #[test]
    fn partner_speed_matches_ego_eta() {
        let mut engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_target(CROSS, CROSS, None);

        // Ego: 64 m at 8 m/s → 8 s.  Partner: 64 m in 8 s → 8 m/s.
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::SetSpeed(8.0));
        assert_eq!(engine.speed_control("cv"), Some(SpeedCommand::Hold(8.0)));

        // Ego slows to 4 m/s → 16 s, partner must halve its speed.
        engine.set_current_speed("ego", 4.0);
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::SetSpeed(4.0));
    }

    #[test]
    fn released_exactly_at_release_distance() {
        let mut engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_target(CROSS, CROSS, None);
        assert!(matches!(sync.check(&mut engine).unwrap(), SyncStep::SetSpeed(_)));

        engine.move_to("ego", Point2::new(117.0, 0.0));
        assert!(matches!(sync.check(&mut engine).unwrap(), SyncStep::SetSpeed(_)));

        // 10 m left: the target pops and control is released in the same tick.
        engine.move_to("ego", Point2::new(118.0, 0.0));
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Released);
        assert_eq!(sync.pending(), 0);
        assert_eq!(engine.speed_control("cv"), Some(SpeedCommand::Release));

        // Only one release is ever issued.
        engine.take_commands();
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Idle);
        assert!(engine.commands().is_empty());
    }

    #[test]
    fn stopped_ego_gives_near_zero_speed() {
        let mut engine = crossing();
        engine.set_current_speed("ego", 0.0);
        let mut sync = synchronizer(&engine);
        sync.add_target(CROSS, CROSS, None);
        let SyncStep::SetSpeed(v) = sync.check(&mut engine).unwrap() else {
            panic!("expected a speed command");
        };
        assert!(v.is_finite() && v > 0.0 && v < 1e-3, "v = {v}");
    }

    #[test]
    fn negative_speed_clamped_to_zero() {
        let mut engine = crossing();
        engine.move_to("cv", Point2::new(128.0, 64.0));
        let mut sync = synchronizer(&engine);
        sync.add_target(CROSS, CROSS, None);
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::SetSpeed(0.0));
    }

    #[test]
    fn targets_are_served_in_order() {
        let mut engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_target(Point2::new(96.0, 0.0), Point2::new(128.0, -32.0), Some(4.0));
        sync.add_target(CROSS, CROSS, None);

        // Head: ego 32 m at 8 m/s → 4 s, partner 32 m → 8 m/s.
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::SetSpeed(8.0));

        engine.move_to("ego", Point2::new(94.0, 0.0));
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::TargetReached);
        assert_eq!(sync.pending(), 1);
        assert!(sync.is_active());

        // Second target: ego 34 m at 8 m/s, partner 64 m.
        let SyncStep::SetSpeed(v) = sync.check(&mut engine).unwrap() else {
            panic!("expected a speed command");
        };
        assert!((v - 64.0 / (34.0 / 8.0)).abs() < 1e-9);
    }

    #[test]
    fn absent_partner_skips_tick() {
        let mut engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_target(CROSS, CROSS, None);
        engine.depart("cv");
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Skipped);
        assert_eq!(sync.pending(), 1);
    }

    #[test]
    fn explicit_routes_override() {
        let mut engine = crossing();
        engine.add_route(&RouteId::from("alt"), &[EdgeId::from("n")], &[]).unwrap();
        let config = SyncConfig::new("ego", "cv").ego_route("alt").release_distance(2.0);
        let mut sync = ArrivalSynchronizer::new(config, &engine).unwrap();
        // On `n`, the ego point (64, 0) projects onto (128, 0): station 128.
        sync.add_target(Point2::new(64.0, 0.0), CROSS, None);
        assert_eq!(sync.head().unwrap().ego_station, 128.0);
        assert_eq!(sync.head().unwrap().release_distance, 2.0);
    }
}

// ── Wait targets ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod waiting {
    use super::*;

    #[test]
    fn wait_brakes_then_pops_when_ego_passes() {
        let mut engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_wait_target(CROSS, CROSS, None);

        // Partner 64 m away, outside the 30 m braking distance.
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Waiting);
        assert_eq!(engine.speed_control("cv"), Some(SpeedCommand::Release));

        // 20 m away at 5 m/s → brake over half of 4 s.
        engine.move_to("cv", Point2::new(128.0, -20.0));
        engine.set_current_speed("cv", 5.0);
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Braking { duration: 2.0 });
        assert_eq!(
            engine.speed_control("cv"),
            Some(SpeedCommand::SlowDown { target: 0.0, duration: 2.0 })
        );

        // Ego still short of the crossing.
        engine.move_to("ego", Point2::new(127.0, 0.0));
        assert!(matches!(sync.check(&mut engine).unwrap(), SyncStep::Braking { .. }));

        // Ego passes.
        engine.move_to("ego", Point2::new(130.0, 0.0));
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Released);
        assert_eq!(sync.pending(), 0);
        assert!(!sync.is_active());
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Idle);
    }

    #[test]
    fn overshooting_partner_brakes_immediately() {
        let mut engine = crossing();
        let mut sync = synchronizer(&engine);
        sync.add_wait_target(CROSS, CROSS, None);

        // Partner 4 m past its station while the ego is still short of its own.
        engine.move_to("cv", Point2::new(128.0, 4.0));
        engine.set_current_speed("cv", 4.0);
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Braking { duration: 0.0 });
        assert_eq!(
            engine.speed_control("cv"),
            Some(SpeedCommand::SlowDown { target: 0.0, duration: 0.0 })
        );
    }

    #[test]
    fn wait_pops_when_ego_exactly_at_station() {
        let mut engine = crossing();
        engine.move_to("ego", CROSS);
        let mut sync = synchronizer(&engine);
        sync.add_wait_target(CROSS, CROSS, Some(100.0));
        assert_eq!(sync.check(&mut engine).unwrap(), SyncStep::Released);
        assert_eq!(sync.pending(), 0);
    }
}

// ── ConflictVehicle ───────────────────────────────────────────────────────────

#[cfg(test)]
mod conflict {
    use super::*;
    use crate::{ConflictStep, ConflictVehicle, SyncError};

    /// Target at the end of `n`'s first lane: 256 m at 16 m/s → 16 s.
    fn conflict(engine: &ScriptedEngine) -> ConflictVehicle {
        ConflictVehicle::new(engine, "conflict", "passenger", "cv_r", CROSS, 0.0, None).unwrap()
    }

    #[test]
    fn deploys_when_ego_eta_within_free_flow_eta() {
        let mut engine = crossing();
        let mut cv = conflict(&engine);

        // 128 m at 4 m/s → 32 s.
        assert_eq!(cv.check(&mut engine, Point2::new(0.0, 0.0), 4.0).unwrap(), ConflictStep::Pending);
        assert!(!engine.is_present("conflict"));

        // 128 m at 8 m/s → 16 s.  Inserted at 16 m/s: on pace.
        assert_eq!(cv.check(&mut engine, Point2::new(0.0, 0.0), 8.0).unwrap(), ConflictStep::Deployed);
        assert!(engine.is_present("conflict"));
        assert!(cv.is_deployed());
    }

    #[test]
    fn corrects_speed_then_releases() {
        let mut engine = crossing();
        let mut cv = conflict(&engine);
        cv.check(&mut engine, Point2::new(0.0, 0.0), 8.0).unwrap();

        // Ego 64 m at 8 m/s → 8 s; conflict 192 m at 16 m/s → 12 s.
        engine.set_lane_position("conflict", 64.0);
        assert_eq!(
            cv.check(&mut engine, Point2::new(64.0, 0.0), 8.0).unwrap(),
            ConflictStep::SlowDown(24.0)
        );
        assert_eq!(
            engine.speed_control("conflict"),
            Some(SpeedCommand::SlowDown { target: 24.0, duration: 0.0 })
        );

        assert_eq!(cv.check(&mut engine, Point2::new(110.0, 0.0), 8.0).unwrap(), ConflictStep::Done);
        assert!(cv.is_done());
    }

    #[test]
    fn reset_removes_and_allows_redeploy() {
        let mut engine = crossing();
        let mut cv = conflict(&engine);
        cv.check(&mut engine, Point2::new(0.0, 0.0), 8.0).unwrap();
        cv.reset(&mut engine).unwrap();
        assert!(!engine.is_present("conflict"));
        assert!(!cv.is_deployed());
        assert_eq!(cv.check(&mut engine, Point2::new(0.0, 0.0), 8.0).unwrap(), ConflictStep::Deployed);
    }

    #[test]
    fn no_allowed_lane_is_an_error() {
        let mut engine = crossing();
        engine.allow_only("n_0", &["bus"]);
        let err = ConflictVehicle::new(&engine, "c", "passenger", "cv_r", CROSS, 0.0, None);
        assert!(matches!(err, Err(SyncError::NoAllowedLane { .. })));
    }
}
