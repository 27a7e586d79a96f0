//! Single conflict vehicle, inserted and paced to meet the ego at one point.
//!
//! The conflict vehicle's target is the end of the first lane on its route
//! (plus an offset).  It is inserted at maximum speed as soon as the ego is
//! no further from its own target, in time, than a free-flowing vehicle
//! would need to cover that lane.  Once inserted its speed is corrected
//! whenever the two ETAs drift apart, until the ego comes within the
//! release distance.

use log::{debug, warn};

use scn_core::{EntityId, Point2, RouteId, VTypeId, safe_div};
use scn_engine::{DepartSpeed, SpeedCommand, TrafficEngine, VehicleSpec, rightmost_allowed_lane};

use crate::{SyncError, SyncResult};

/// Default ego distance to the target below which pacing stops, in metres.
pub const DEFAULT_CONFLICT_RELEASE: f64 = 20.0;

/// ETA difference, in seconds, tolerated before the speed is corrected.
pub const ETA_TOLERANCE: f64 = 0.25;

/// What one call to [`ConflictVehicle::check`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConflictStep {
    /// Not inserted yet; the ego is still too far away.
    Pending,
    /// Inserted this tick, already on pace.
    Deployed,
    /// Told to reach this speed (m/s) immediately.
    SlowDown(f64),
    /// Inserted and within tolerance of the ego's ETA.
    OnPace,
    /// Inserted but no longer in the network.
    Skipped,
    /// The ego is inside the release distance; no further control.
    Done,
}

#[derive(Debug, Clone)]
pub struct ConflictVehicle {
    id:               EntityId,
    type_id:          VTypeId,
    route:            RouteId,
    ego_target:       Point2,
    release_distance: f64,
    /// Length to the target along the first lane (lane length + offset).
    target_distance:  f64,
    lane_speed:       f64,
    deployed:         bool,
    done:             bool,
}

impl ConflictVehicle {
    /// Resolve the first lane of `route` admitting `type_id` and record its
    /// length and speed limit.
    pub fn new<E>(
        engine:           &E,
        id:               impl Into<EntityId>,
        type_id:          impl Into<VTypeId>,
        route:            impl Into<RouteId>,
        ego_target:       Point2,
        target_offset:    f64,
        release_distance: Option<f64>,
    ) -> SyncResult<Self>
    where
        E: TrafficEngine + ?Sized,
    {
        let type_id = type_id.into();
        let route = route.into();

        let edge = engine
            .route_edges(&route)?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::EmptyRoute(route.clone()))?;
        let class = engine.type_class(&type_id)?;
        let lane = rightmost_allowed_lane(engine, &edge, &class)?.ok_or_else(|| {
            SyncError::NoAllowedLane { edge: edge.clone(), type_id: type_id.clone() }
        })?;

        Ok(Self {
            id: id.into(),
            type_id,
            route,
            ego_target,
            release_distance: release_distance.unwrap_or(DEFAULT_CONFLICT_RELEASE),
            target_distance: engine.lane_length(&lane)? + target_offset,
            lane_speed: engine.lane_max_speed(&lane)?,
            deployed: false,
            done: false,
        })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance by one tick given the ego's current position and speed.
    pub fn check<E>(&mut self, engine: &mut E, ego_pos: Point2, ego_speed: f64) -> SyncResult<ConflictStep>
    where
        E: TrafficEngine + ?Sized,
    {
        let ego_distance = self.ego_target.distance(ego_pos);
        let ego_eta = safe_div(ego_distance, ego_speed);
        let free_flow_eta = safe_div(self.target_distance, self.lane_speed);

        let mut deployed_now = false;
        if !self.deployed && ego_eta <= free_flow_eta {
            let mut spec =
                VehicleSpec::new(self.id.clone(), self.route.clone(), self.type_id.clone());
            spec.depart_speed = DepartSpeed::Max;
            engine.add_vehicle(&spec)?;
            debug!("{}: deployed, ego eta {ego_eta:.2} s", self.id);
            self.deployed = true;
            deployed_now = true;
        }
        if !self.deployed {
            return Ok(ConflictStep::Pending);
        }
        if ego_distance < self.release_distance {
            self.done = true;
        }
        if self.done {
            return Ok(ConflictStep::Done);
        }
        if !engine.has_vehicle(&self.id)? {
            return Ok(ConflictStep::Skipped);
        }

        let remaining = self.target_distance - engine.lane_position(&self.id)?;
        let eta = safe_div(remaining, engine.speed(&self.id)?);
        if (eta - ego_eta).abs() > ETA_TOLERANCE {
            let mut speed = remaining / ego_eta;
            if speed < 0.0 {
                warn!("{}: negative target speed {speed:.3} m/s, clamped to 0", self.id);
                speed = 0.0;
            }
            engine.command_speed(&self.id, SpeedCommand::SlowDown { target: speed, duration: 0.0 })?;
            debug!("{}: slow down to {speed:.2} m/s", self.id);
            return Ok(ConflictStep::SlowDown(speed));
        }
        Ok(if deployed_now { ConflictStep::Deployed } else { ConflictStep::OnPace })
    }

    /// Remove the vehicle (if still present) and allow redeployment.
    pub fn reset<E>(&mut self, engine: &mut E) -> SyncResult<()>
    where
        E: TrafficEngine + ?Sized,
    {
        if engine.has_vehicle(&self.id)? {
            engine.remove_vehicle(&self.id)?;
        }
        self.deployed = false;
        self.done = false;
        Ok(())
    }
}
