//! Route geometry used to project positions onto arc-length stations.

use scn_core::{Point2, Polyline, RouteId};
use scn_engine::{TrafficEngine, route_shape};

use crate::{SyncError, SyncResult};

/// The polyline of a route, built once from the shapes of the rightmost
/// lane of each edge.
#[derive(Debug, Clone)]
pub struct PathGeometry {
    route: RouteId,
    line:  Polyline,
}

impl PathGeometry {
    pub fn for_route<E>(engine: &E, route: &RouteId) -> SyncResult<Self>
    where
        E: TrafficEngine + ?Sized,
    {
        let edges = engine.route_edges(route)?;
        if edges.is_empty() {
            return Err(SyncError::EmptyRoute(route.clone()));
        }
        Ok(Self { route: route.clone(), line: route_shape(engine, &edges)? })
    }

    pub fn route(&self) -> &RouteId {
        &self.route
    }

    pub fn length(&self) -> f64 {
        self.line.length()
    }

    /// Distance along the route of the point closest to `p`.
    pub fn station(&self, p: Point2) -> f64 {
        self.line.station(p)
    }
}
