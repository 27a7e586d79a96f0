//! A single polygonal trigger zone.

use geo::{Contains, LineString, Point, Polygon};
use log::debug;

use scn_core::{Point2, Tick, ZoneId, parse_shape};

use crate::{ZoneError, ZoneEvent, ZoneResult};

/// A labeled polygon with entry/exit state.
///
/// The polygon is immutable after construction.  The containment state and
/// the per-tick memo are only advanced through [`check`](Self::check).
#[derive(Debug, Clone)]
pub struct Zone {
    id:     ZoneId,
    shape:  Polygon<f64>,
    inside: bool,
    /// Tick of the last state update and the event it produced.
    memo:   Option<(Tick, ZoneEvent)>,
}

impl Zone {
    /// Build a zone from its outline.  The ring is closed automatically.
    pub fn new(
        id:     impl Into<ZoneId>,
        points: impl IntoIterator<Item = Point2>,
    ) -> ZoneResult<Self> {
        let id = id.into();
        let ring: LineString<f64> = points.into_iter().map(geo::Coord::from).collect();
        if ring.0.len() < 3 {
            return Err(ZoneError::TooFewPoints { count: ring.0.len(), id });
        }
        Ok(Self {
            id,
            shape: Polygon::new(ring, vec![]),
            inside: false,
            memo: None,
        })
    }

    /// Build a zone from a simulator shape string `"x1,y1 x2,y2 ..."`.
    pub fn from_shape(id: impl Into<ZoneId>, shape: &str) -> ZoneResult<Self> {
        Self::new(id, parse_shape(shape)?)
    }

    /// Override the initial containment state (default: outside).
    pub fn with_state(mut self, inside: bool) -> Self {
        self.inside = inside;
        self
    }

    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    /// Containment state as of the last [`check`](Self::check).
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// The tick and event of the most recent state update.
    pub fn last_event(&self) -> Option<(Tick, ZoneEvent)> {
        self.memo
    }

    /// Raw containment test.  Points on the boundary are outside.
    ///
    /// Does not touch the trigger state.
    pub fn includes(&self, p: Point2) -> bool {
        self.shape.contains(&Point::from(p))
    }

    /// Update the containment state for `tick` and report the transition.
    ///
    /// Only the first call for a given tick evaluates `p`; later calls in the
    /// same tick return the memoized event whatever point they pass.
    pub fn check(&mut self, p: Point2, tick: Tick) -> ZoneEvent {
        if let Some((seen, event)) = self.memo {
            if seen == tick {
                return event;
            }
        }

        let now_inside = self.includes(p);
        let event = match (self.inside, now_inside) {
            (false, true) => ZoneEvent::Entry,
            (true, false) => ZoneEvent::Exit,
            _ => ZoneEvent::NoChange,
        };
        self.inside = now_inside;
        self.memo = Some((tick, event));

        if event.is_transition() {
            debug!("zone {}: {} at {} {}", self.id, event, tick, p);
        }
        event
    }

    /// `true` if [`check`](Self::check) reports an entry.
    pub fn check_entry(&mut self, p: Point2, tick: Tick) -> bool {
        self.check(p, tick) == ZoneEvent::Entry
    }

    /// `true` if [`check`](Self::check) reports an exit.
    pub fn check_exit(&mut self, p: Point2, tick: Tick) -> bool {
        self.check(p, tick) == ZoneEvent::Exit
    }
}
