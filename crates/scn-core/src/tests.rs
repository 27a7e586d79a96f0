//! Unit tests for scn-core primitives.

#[cfg(test)]
mod ids {
    use std::collections::HashMap;

    use crate::{EntityId, VClass};

    #[test]
    fn display_is_raw_string() {
        assert_eq!(EntityId::from("ego").to_string(), "ego");
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(EntityId::from("a.1") < EntityId::from("a.2"));
    }

    #[test]
    fn lookup_by_str() {
        let mut m = HashMap::new();
        m.insert(EntityId::from("ego"), 1);
        assert_eq!(m.get("ego"), Some(&1));
    }

    #[test]
    fn pedestrian_class() {
        assert!(VClass::from("pedestrian").is_pedestrian());
        assert!(!VClass::from("passenger").is_pedestrian());
    }
}

#[cfg(test)]
mod geom {
    use crate::{Point2, Polyline, parse_shape};

    #[test]
    fn distance_345() {
        let d = Point2::new(0.0, 0.0).distance(Point2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn parses_shape_string() {
        let pts = parse_shape("0,0 10,0  10,5.5").unwrap();
        assert_eq!(
            pts,
            vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), Point2::new(10.0, 5.5)]
        );
    }

    #[test]
    fn rejects_malformed_shape() {
        assert!(parse_shape("0,0 10").is_err());
        assert!(parse_shape("0,0 a,1").is_err());
    }

    #[test]
    fn station_on_straight_line() {
        let line = Polyline::new([Point2::new(0.0, 0.0), Point2::new(256.0, 0.0)]);
        assert_eq!(line.length(), 256.0);
        assert_eq!(line.station(Point2::new(64.0, 3.0)), 64.0);
    }

    #[test]
    fn station_clamps_past_ends() {
        let line = Polyline::new([Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
        assert_eq!(line.station(Point2::new(-20.0, 0.0)), 0.0);
        assert!((line.station(Point2::new(140.0, 0.0)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn station_accumulates_across_segments() {
        // L-shaped path: 100 m east, then 100 m north.
        let line = Polyline::new([
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
        ]);
        let s = line.station(Point2::new(101.0, 50.0));
        assert!((s - 150.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn degenerate_line_station_is_zero() {
        let line = Polyline::new([Point2::new(5.0, 5.0)]);
        assert_eq!(line.station(Point2::new(9.0, 9.0)), 0.0);
    }
}

#[cfg(test)]
mod numeric {
    use crate::{SPEED_EPSILON, safe_div};

    #[test]
    fn zero_divisor_uses_epsilon() {
        assert_eq!(safe_div(1.0, 0.0), 1.0 / SPEED_EPSILON);
    }

    #[test]
    fn nonzero_divisor_untouched() {
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.next(), Tick(11));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).to_string(), "T3");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.unit(), r2.unit());
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(1);
        let mut a = root.child(0);
        let mut b = root.child(1);
        assert_ne!(a.unit(), b.unit());
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
