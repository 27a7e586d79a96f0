//! Planar geometry in simulator network coordinates (metres).
//!
//! `Point2` is the value type every component passes around.  `Polyline`
//! wraps a `geo::LineString` and answers the one question the synchronizers
//! need: how far along the line is the point closest to `p` (its *station*).

use std::fmt;

use geo::{Coord, EuclideanLength, LineLocatePoint, LineString, Point};

use crate::{CoreError, CoreResult};

// ── Point2 ────────────────────────────────────────────────────────────────────

/// A 2-D network coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point2 {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for Coord<f64> {
    #[inline]
    fn from(p: Point2) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<Point2> for Point<f64> {
    #[inline]
    fn from(p: Point2) -> Self {
        Point::new(p.x, p.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Parse a simulator shape string of the form `"x1,y1 x2,y2 ..."`.
///
/// Extra whitespace between pairs is tolerated; anything else malformed is a
/// [`CoreError::Shape`].
pub fn parse_shape(shape: &str) -> CoreResult<Vec<Point2>> {
    let malformed = |reason: String| CoreError::Shape {
        shape: shape.to_owned(),
        reason,
    };

    shape
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| malformed(format!("pair {pair:?} has no comma")))?;
            let x = x
                .parse::<f64>()
                .map_err(|e| malformed(format!("bad x in {pair:?}: {e}")))?;
            let y = y
                .parse::<f64>()
                .map_err(|e| malformed(format!("bad y in {pair:?}: {e}")))?;
            Ok(Point2::new(x, y))
        })
        .collect()
}

// ── Polyline ──────────────────────────────────────────────────────────────────

/// An open path through the network, e.g. the concatenated lane shapes of a
/// route.
#[derive(Clone, Debug)]
pub struct Polyline {
    line:   LineString<f64>,
    length: f64,
}

impl Polyline {
    pub fn new(points: impl IntoIterator<Item = Point2>) -> Self {
        let line: LineString<f64> = points.into_iter().map(Coord::from).collect();
        let length = line.euclidean_length();
        Self { line, length }
    }

    /// Total arc length in metres.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.line.0.is_empty()
    }

    /// Arc-length coordinate of the point on the line closest to `p`.
    ///
    /// Points beyond either end clamp to `0.0` or `length()`.  An empty or
    /// zero-length line has every station at `0.0`.
    pub fn station(&self, p: Point2) -> f64 {
        if self.length == 0.0 {
            return 0.0;
        }
        let fraction = self
            .line
            .line_locate_point(&Point::from(p))
            .unwrap_or(0.0);
        fraction * self.length
    }

    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.line.coords().map(|c| Point2::new(c.x, c.y))
    }
}
