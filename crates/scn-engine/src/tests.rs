//! Unit tests for scn-engine.

use scn_core::{EdgeId, EntityId, Point2, RouteId, VClass, VTypeId};

use crate::{ScriptedEngine, TrafficEngine};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Two consecutive 100 m edges along the x axis, each with a sidewalk (lane
/// 0, pedestrians only) and a driving lane (lane 1).
fn two_edge_network() -> ScriptedEngine {
    let mut engine = ScriptedEngine::new(0.5);
    engine
        .add_straight_edge("a", Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 2, 13.9)
        .add_straight_edge("b", Point2::new(100.0, 0.0), Point2::new(200.0, 0.0), 2, 13.9)
        .allow_only("a_0", &["pedestrian"])
        .allow_only("b_0", &["pedestrian"]);
    engine
}

// ── Lane helpers ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod lanes {
    use super::*;
    use crate::{random_depart_pos, rightmost_allowed_lane, route_shape};
    use scn_core::SimRng;

    #[test]
    fn rightmost_lane_respects_permissions() {
        let engine = two_edge_network();
        let car = rightmost_allowed_lane(&engine, &EdgeId::from("a"), &VClass::from("passenger"))
            .unwrap();
        let ped = rightmost_allowed_lane(&engine, &EdgeId::from("a"), &VClass::from("pedestrian"))
            .unwrap();
        assert_eq!(car.unwrap().as_str(), "a_1");
        assert_eq!(ped.unwrap().as_str(), "a_0");
    }

    #[test]
    fn no_lane_for_class() {
        let mut engine = two_edge_network();
        engine.allow_only("a_1", &["bus"]);
        let lane = rightmost_allowed_lane(&engine, &EdgeId::from("a"), &VClass::from("passenger"))
            .unwrap();
        assert!(lane.is_none());
    }

    #[test]
    fn route_shape_concatenates_edges() {
        let engine = two_edge_network();
        let shape = route_shape(&engine, &[EdgeId::from("a"), EdgeId::from("b")]).unwrap();
        assert_eq!(shape.length(), 200.0);
    }

    #[test]
    fn depart_pos_single_lane_within_length() {
        let mut rng = SimRng::new(7);
        for _ in 0..500 {
            let (i, pos) = random_depart_pos(&[40.0], &mut rng).unwrap();
            assert_eq!(i, 0);
            assert!((0.0..40.0).contains(&pos));
        }
    }

    #[test]
    fn depart_pos_chain_covers_every_lane() {
        let mut rng = SimRng::new(11);
        let lengths = [10.0, 80.0, 10.0];
        let mut hits = [0usize; 3];
        for _ in 0..2_000 {
            let (i, pos) = random_depart_pos(&lengths, &mut rng).unwrap();
            assert!(pos >= 0.0 && pos <= lengths[i]);
            hits[i] += 1;
        }
        assert!(hits.iter().all(|&h| h > 0), "hits {hits:?}");
        // The long middle lane should get the bulk of the draws.
        assert!(hits[1] > hits[0] + hits[2]);
    }

    #[test]
    fn depart_pos_empty_chain() {
        let mut rng = SimRng::new(0);
        assert!(random_depart_pos(&[], &mut rng).is_none());
        assert!(random_depart_pos(&[0.0], &mut rng).is_none());
    }
}

// ── ScriptedEngine ────────────────────────────────────────────────────────────

#[cfg(test)]
mod scripted {
    use super::*;
    use crate::{Command, EngineError, SpeedCommand, VehicleSpec};

    #[test]
    fn step_advances_clock() {
        let mut engine = two_edge_network();
        engine.step().unwrap();
        engine.step().unwrap();
        assert_eq!(engine.tick().0, 2);
        assert_eq!(engine.time_secs(), 1.0);
    }

    #[test]
    fn add_route_and_vehicle() {
        let mut engine = two_edge_network();
        let route = RouteId::from("r");
        engine
            .add_route(&route, &[EdgeId::from("a"), EdgeId::from("b")], &[])
            .unwrap();
        let spec = VehicleSpec::new(EntityId::from("v"), route, VTypeId::from("passenger"));
        engine.add_vehicle(&spec).unwrap();
        assert!(engine.has_vehicle(&EntityId::from("v")).unwrap());
        assert_eq!(engine.speed(&EntityId::from("v")).unwrap(), 13.9);
        assert!(matches!(engine.add_vehicle(&spec), Err(EngineError::DuplicateEntity(_))));
    }

    #[test]
    fn rejected_route() {
        let mut engine = two_edge_network();
        engine.reject_route("bad");
        let err = engine.add_route(&RouteId::from("bad"), &[EdgeId::from("a")], &[]);
        assert!(matches!(err, Err(EngineError::RouteRejected { .. })));
    }

    #[test]
    fn find_route_through_via() {
        let mut engine = two_edge_network();
        engine.add_straight_edge("c", Point2::new(200.0, 0.0), Point2::new(300.0, 0.0), 1, 13.9);
        let edges = engine
            .find_route(
                &EdgeId::from("a"),
                &EdgeId::from("c"),
                &VTypeId::from("passenger"),
                &[EdgeId::from("b")],
            )
            .unwrap();
        let names: Vec<&str> = edges.iter().map(|e| e.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn proximity_excludes_center() {
        let mut engine = two_edge_network();
        engine
            .place_vehicle("ego", "passenger", None, Point2::new(0.0, 0.0), 5.0)
            .place_vehicle("near", "passenger", None, Point2::new(3.0, 4.0), 5.0)
            .place_vehicle("far", "passenger", None, Point2::new(30.0, 0.0), 5.0);
        let near = engine.vehicles_near(&EntityId::from("ego"), 5.0).unwrap();
        assert_eq!(near, vec![EntityId::from("near")]);
    }

    #[test]
    fn speed_commands_are_logged() {
        let mut engine = two_edge_network();
        engine.place_vehicle("v", "passenger", None, Point2::new(0.0, 0.0), 5.0);
        let id = EntityId::from("v");
        engine.command_speed(&id, SpeedCommand::Hold(3.0)).unwrap();
        assert_eq!(engine.speed(&id).unwrap(), 3.0);
        assert_eq!(engine.speed_control("v"), Some(SpeedCommand::Hold(3.0)));
        assert_eq!(
            engine.take_commands(),
            vec![Command::Speed { id, command: SpeedCommand::Hold(3.0) }]
        );
        assert!(engine.commands().is_empty());
    }

    #[test]
    fn restore_hands_signals_back_to_simulator() {
        let mut engine = two_edge_network();
        engine.place_vehicle("v", "passenger", None, Point2::new(0.0, 0.0), 5.0);
        let id = EntityId::from("v");
        engine.set_own_signals("v", 0b100);
        engine.set_signals(&id, 0b001).unwrap();
        assert_eq!(engine.signals(&id).unwrap(), 0b001);

        engine.restore_signals(&id).unwrap();
        assert_eq!(engine.signals(&id).unwrap(), 0b100);
        assert_eq!(engine.commands().last(), Some(&Command::RestoreSignals(id)));
    }

    #[test]
    fn unknown_entity_errors() {
        let engine = two_edge_network();
        assert!(matches!(
            engine.position(&EntityId::from("ghost")),
            Err(EngineError::UnknownEntity(_))
        ));
    }
}
