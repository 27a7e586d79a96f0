//! Command payloads sent to the simulator.

use scn_core::{EdgeId, EntityId, LaneId, RouteId, VTypeId};

// ── Speed control ─────────────────────────────────────────────────────────────

/// How the simulator should govern an entity's speed from now on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedCommand {
    /// Drive at exactly this speed (m/s) until told otherwise.
    Hold(f64),

    /// Return the entity to the simulator's own car-following control.
    Release,

    /// Reach `target` m/s linearly over `duration` seconds, then release.
    SlowDown { target: f64, duration: f64 },
}

// ── Departure / arrival options ───────────────────────────────────────────────

/// Speed at which an inserted vehicle enters the network.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DepartSpeed {
    /// The highest speed that is safe at insertion.
    #[default]
    Max,
    /// The type's desired speed on the departure lane.
    Desired,
    /// Uniformly random between zero and `Max`.
    Random,
    /// A fixed speed in m/s.
    Value(f64),
}

/// Speed at which a vehicle should arrive at the end of its route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArrivalSpeed {
    /// Whatever speed the vehicle happens to have.
    #[default]
    Current,
    Value(f64),
}

/// Longitudinal insertion position on the departure lane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DepartPos {
    /// Start of the lane, offset by the vehicle length.
    #[default]
    Base,
    Random,
    /// The first position along the lane with free space.
    Free,
    /// A fixed offset in metres.
    Value(f64),
}

// ── Insertion specs ───────────────────────────────────────────────────────────

/// Everything needed to insert one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub id:            EntityId,
    pub route:         RouteId,
    pub type_id:       VTypeId,
    /// Lane index on the first edge; `None` lets the simulator pick.
    pub depart_lane:   Option<u32>,
    pub depart_speed:  DepartSpeed,
    pub depart_pos:    DepartPos,
    pub arrival_speed: ArrivalSpeed,
}

impl VehicleSpec {
    /// A spec with all departure options at their defaults.
    pub fn new(id: EntityId, route: RouteId, type_id: VTypeId) -> Self {
        Self {
            id,
            route,
            type_id,
            depart_lane:   None,
            depart_speed:  DepartSpeed::default(),
            depart_pos:    DepartPos::default(),
            arrival_speed: ArrivalSpeed::default(),
        }
    }
}

/// Insertion of a person standing on `edge` at `pos`.
///
/// A person does nothing until at least one stage is appended; see
/// [`WalkStage`].
#[derive(Debug, Clone, PartialEq)]
pub struct PersonSpec {
    pub id:      EntityId,
    pub type_id: VTypeId,
    pub edge:    EdgeId,
    /// Offset along `edge` in metres.
    pub pos:     f64,
    /// Lane the offset was sampled on, when known.
    pub lane:    Option<LaneId>,
}

/// A walking stage appended to a person's plan.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkStage {
    pub edges:       Vec<EdgeId>,
    /// Arrival offset on the last edge; `None` walks to its end.
    pub arrival_pos: Option<f64>,
}
