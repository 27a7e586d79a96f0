//! Multi-target arrival synchronizer.
//!
//! # Per-tick control
//!
//! With a `Match` target at the head of the queue:
//!
//! ```text
//! ego_remaining     = ego_station     - station(ego position)
//! eta               = ego_remaining / ego speed
//! partner_remaining = partner_station - station(partner position)
//! partner speed     = partner_remaining / eta          (clamped at 0)
//! ```
//!
//! The partner is held at that speed until the ego is within
//! `release_distance` of its station, at which point the target is popped.
//!
//! A `Wait` target keeps the partner under its own control until it comes
//! within the braking distance of its station, then brakes it to a stop over
//! half its time-to-station.  The target pops once the ego reaches its
//! station.
//!
//! When the queue runs empty the partner is released exactly once.

use std::collections::VecDeque;

use log::{debug, warn};

use scn_core::{EntityId, Point2, RouteId, safe_div};
use scn_engine::{SpeedCommand, TrafficEngine};

use crate::{ArrivalTarget, PathGeometry, SyncResult, TargetKind};

/// Default ego distance at which a `Match` target is released, in metres.
pub const DEFAULT_RELEASE_DISTANCE: f64 = 10.0;

/// Default partner distance inside which a `Wait` target brakes, in metres.
pub const DEFAULT_BRAKING_DISTANCE: f64 = 30.0;

// ── SyncConfig ────────────────────────────────────────────────────────────────

/// Construction parameters for an [`ArrivalSynchronizer`].
///
/// Routes default to the route each vehicle is driving when the
/// synchronizer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub ego:              EntityId,
    pub partner:          EntityId,
    pub ego_route:        Option<RouteId>,
    pub partner_route:    Option<RouteId>,
    pub release_distance: f64,
    pub braking_distance: f64,
}

impl SyncConfig {
    pub fn new(ego: impl Into<EntityId>, partner: impl Into<EntityId>) -> Self {
        Self {
            ego:              ego.into(),
            partner:          partner.into(),
            ego_route:        None,
            partner_route:    None,
            release_distance: DEFAULT_RELEASE_DISTANCE,
            braking_distance: DEFAULT_BRAKING_DISTANCE,
        }
    }

    pub fn ego_route(mut self, route: impl Into<RouteId>) -> Self {
        self.ego_route = Some(route.into());
        self
    }

    pub fn partner_route(mut self, route: impl Into<RouteId>) -> Self {
        self.partner_route = Some(route.into());
        self
    }

    pub fn release_distance(mut self, metres: f64) -> Self {
        self.release_distance = metres;
        self
    }

    pub fn braking_distance(mut self, metres: f64) -> Self {
        self.braking_distance = metres;
        self
    }
}

// ── SyncStep ──────────────────────────────────────────────────────────────────

/// What one call to [`ArrivalSynchronizer::check`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncStep {
    /// Nothing queued and nothing to release.
    Idle,
    /// Speed control was handed back to the simulator.
    Released,
    /// One of the two vehicles is absent this tick.
    Skipped,
    /// The partner was told to hold this speed (m/s).
    SetSpeed(f64),
    /// The head target completed; more targets remain queued.
    TargetReached,
    /// `Wait` target: partner still outside the braking distance.
    Waiting,
    /// `Wait` target: partner braking to a stop over `duration` seconds.
    Braking { duration: f64 },
}

// ── ArrivalSynchronizer ───────────────────────────────────────────────────────

pub struct ArrivalSynchronizer {
    ego:              EntityId,
    partner:          EntityId,
    ego_path:         PathGeometry,
    partner_path:     PathGeometry,
    targets:          VecDeque<ArrivalTarget>,
    release_distance: f64,
    braking_distance: f64,
    /// Whether the partner's speed is currently overridden.
    active:           bool,
}

impl ArrivalSynchronizer {
    /// Build the synchronizer and the geometry of both routes.
    pub fn new<E>(config: SyncConfig, engine: &E) -> SyncResult<Self>
    where
        E: TrafficEngine + ?Sized,
    {
        let ego_route = match config.ego_route {
            Some(route) => route,
            None => engine.vehicle_route(&config.ego)?,
        };
        let partner_route = match config.partner_route {
            Some(route) => route,
            None => engine.vehicle_route(&config.partner)?,
        };

        Ok(Self {
            ego_path: PathGeometry::for_route(engine, &ego_route)?,
            partner_path: PathGeometry::for_route(engine, &partner_route)?,
            ego: config.ego,
            partner: config.partner,
            targets: VecDeque::new(),
            release_distance: config.release_distance,
            braking_distance: config.braking_distance,
            active: false,
        })
    }

    pub fn ego(&self) -> &EntityId {
        &self.ego
    }

    pub fn partner(&self) -> &EntityId {
        &self.partner
    }

    pub fn pending(&self) -> usize {
        self.targets.len()
    }

    pub fn head(&self) -> Option<&ArrivalTarget> {
        self.targets.front()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Queue a `Match` target.  `release_distance` defaults to the
    /// synchronizer's configured value.
    pub fn add_target(&mut self, ego_point: Point2, partner_point: Point2, release_distance: Option<f64>) {
        let target = ArrivalTarget::matching(
            self.ego_path.station(ego_point),
            self.partner_path.station(partner_point),
            release_distance.unwrap_or(self.release_distance),
        );
        debug!("{}: queued {target:?}", self.partner);
        self.targets.push_back(target);
    }

    /// Queue a `Wait` target.  `braking_distance` defaults to the
    /// synchronizer's configured value.
    pub fn add_wait_target(&mut self, ego_point: Point2, partner_point: Point2, braking_distance: Option<f64>) {
        let target = ArrivalTarget::waiting(
            self.ego_path.station(ego_point),
            self.partner_path.station(partner_point),
            braking_distance.unwrap_or(self.braking_distance),
        );
        debug!("{}: queued {target:?}", self.partner);
        self.targets.push_back(target);
    }

    /// Advance control by one tick.
    pub fn check<E>(&mut self, engine: &mut E) -> SyncResult<SyncStep>
    where
        E: TrafficEngine + ?Sized,
    {
        let Some(target) = self.targets.front().copied() else {
            return self.release_if_active(engine);
        };

        if !engine.has_vehicle(&self.ego)? || !engine.has_vehicle(&self.partner)? {
            return Ok(SyncStep::Skipped);
        }

        let ego_remaining = target.ego_station - self.ego_path.station(engine.position(&self.ego)?);
        let partner_remaining =
            target.partner_station - self.partner_path.station(engine.position(&self.partner)?);

        match target.kind {
            TargetKind::Match => {
                if ego_remaining > target.release_distance {
                    let eta = safe_div(ego_remaining, engine.speed(&self.ego)?);
                    let mut speed = partner_remaining / eta;
                    if speed < 0.0 {
                        warn!("{}: negative target speed {speed:.3} m/s, clamped to 0", self.partner);
                        speed = 0.0;
                    }
                    self.command(engine, SpeedCommand::Hold(speed))?;
                    self.active = true;
                    return Ok(SyncStep::SetSpeed(speed));
                }
                self.targets.pop_front();
                debug!("{}: target reached, {} left", self.partner, self.targets.len());
                if self.targets.is_empty() {
                    return self.release_if_active(engine);
                }
                Ok(SyncStep::TargetReached)
            }
            TargetKind::Wait => {
                if ego_remaining <= 0.0 {
                    self.targets.pop_front();
                    self.command(engine, SpeedCommand::Release)?;
                    self.active = !self.targets.is_empty();
                    return Ok(SyncStep::Released);
                }
                if partner_remaining > target.release_distance {
                    self.command(engine, SpeedCommand::Release)?;
                    self.active = false;
                    return Ok(SyncStep::Waiting);
                }
                // A partner already past its station stops at once.
                let duration =
                    0.5 * safe_div(partner_remaining.max(0.0), engine.speed(&self.partner)?);
                self.command(engine, SpeedCommand::SlowDown { target: 0.0, duration })?;
                self.active = true;
                Ok(SyncStep::Braking { duration })
            }
        }
    }

    fn release_if_active<E>(&mut self, engine: &mut E) -> SyncResult<SyncStep>
    where
        E: TrafficEngine + ?Sized,
    {
        if !self.active {
            return Ok(SyncStep::Idle);
        }
        self.active = false;
        if !engine.has_vehicle(&self.partner)? {
            return Ok(SyncStep::Idle);
        }
        self.command(engine, SpeedCommand::Release)?;
        Ok(SyncStep::Released)
    }

    fn command<E>(&self, engine: &mut E, command: SpeedCommand) -> SyncResult<()>
    where
        E: TrafficEngine + ?Sized,
    {
        debug!("{}: {command:?}", self.partner);
        engine.command_speed(&self.partner, command)?;
        Ok(())
    }
}
