//! Lane-level helpers built on top of [`TrafficEngine`] queries.

use scn_core::{EdgeId, LaneId, Polyline, SimRng, VClass};

use crate::{EngineResult, TrafficEngine};

/// The rightmost lane of `edge` that admits `class`.
///
/// Lanes with an empty permission list admit every class.  Returns
/// `Ok(None)` when no lane of the edge admits the class; callers decide
/// whether that is a configuration error.
pub fn rightmost_allowed_lane<E>(
    engine: &E,
    edge:   &EdgeId,
    class:  &VClass,
) -> EngineResult<Option<LaneId>>
where
    E: TrafficEngine + ?Sized,
{
    for lane in engine.edge_lanes(edge)? {
        let allowed = engine.lane_allowed(&lane)?;
        if allowed.is_empty() || allowed.contains(class) {
            return Ok(Some(lane));
        }
    }
    Ok(None)
}

/// Geometry of a route: the rightmost-lane shapes of `edges`, concatenated.
pub fn route_shape<E>(engine: &E, edges: &[EdgeId]) -> EngineResult<Polyline>
where
    E: TrafficEngine + ?Sized,
{
    let mut points = Vec::new();
    for edge in edges {
        if let Some(lane) = engine.edge_lanes(edge)?.into_iter().next() {
            points.extend(engine.lane_shape(&lane)?);
        }
    }
    // Consecutive lanes share their junction point.
    points.dedup();
    Ok(Polyline::new(points))
}

/// Draw a departure position uniformly along a chain of lanes.
///
/// `lengths` are the lane lengths in path order.  The draw is uniform over
/// their cumulative length; the result is the index of the lane whose range
/// contains it and the offset within that lane.  A single-element slice is
/// simply a uniform position along that one lane.
///
/// Returns `None` when the chain has no positive length.
pub fn random_depart_pos(lengths: &[f64], rng: &mut SimRng) -> Option<(usize, f64)> {
    let total: f64 = lengths.iter().sum();
    if lengths.is_empty() || total <= 0.0 {
        return None;
    }

    let pos = rng.unit() * total;
    let mut start = 0.0;
    for (i, &len) in lengths.iter().enumerate() {
        if pos < start + len {
            return Some((i, pos - start));
        }
        start += len;
    }
    // Rounding pushed the draw onto the far end of the chain.
    let last = lengths.len() - 1;
    Some((last, lengths[last]))
}
