//! Flow configuration.

use scn_core::EdgeId;
use scn_engine::{ArrivalSpeed, DepartPos, DepartSpeed};

use crate::{RemovalPolicy, VehicleMix};

/// Where a pedestrian starts on the flow's path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PedestrianDepart {
    /// A fixed offset in metres on the first edge.
    Fixed(f64),
    /// Uniformly along the first lane.
    RandomFirstLane,
    /// Uniformly along the whole lane sequence of the path.
    RandomAlongRoute,
}

impl Default for PedestrianDepart {
    fn default() -> Self {
        PedestrianDepart::Fixed(0.0)
    }
}

/// Everything needed to build a [`Flow`][crate::Flow].
///
/// Exactly one of `probability` or `headway` must be set; this is checked
/// by `Flow::new`, not here.
///
/// ```rust,ignore
/// let config = FlowConfig::new("north_in", "south_out")
///     .probability(0.2)
///     .mix(VehicleMix::single("passenger").with("truck", 0.25))
///     .max_count(20)
///     .removal(RemovalPolicy::OnDisable);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowConfig {
    pub origin:      EdgeId,
    pub destination: EdgeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub via:         Vec<EdgeId>,
    /// Route name; defaults to `origin-destination`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name:        Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mix:         VehicleMix,
    /// Per-second emission probability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub probability: Option<f64>,
    /// Seconds between emissions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub headway:     Option<f64>,
    /// Cap on total emissions; `None` is unbounded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_count:   Option<u64>,
    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled:     bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub removal:     RemovalPolicy,

    #[cfg_attr(feature = "serde", serde(default))]
    pub depart_speed:      DepartSpeed,
    #[cfg_attr(feature = "serde", serde(default))]
    pub depart_pos:        DepartPos,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arrival_speed:     ArrivalSpeed,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pedestrian_depart: PedestrianDepart,
}

#[cfg(feature = "serde")]
fn enabled_by_default() -> bool {
    true
}

impl FlowConfig {
    /// An enabled flow with the default mix and no emission model yet.
    pub fn new(origin: impl Into<EdgeId>, destination: impl Into<EdgeId>) -> Self {
        Self {
            origin:            origin.into(),
            destination:       destination.into(),
            via:               Vec::new(),
            name:              None,
            mix:               VehicleMix::default(),
            probability:       None,
            headway:           None,
            max_count:         None,
            enabled:           true,
            removal:           RemovalPolicy::default(),
            depart_speed:      DepartSpeed::default(),
            depart_pos:        DepartPos::default(),
            arrival_speed:     ArrivalSpeed::default(),
            pedestrian_depart: PedestrianDepart::default(),
        }
    }

    pub fn via<I, E>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeId>,
    {
        self.via = edges.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mix(mut self, mix: VehicleMix) -> Self {
        self.mix = mix;
        self
    }

    pub fn probability(mut self, p: f64) -> Self {
        self.probability = Some(p);
        self
    }

    pub fn headway(mut self, seconds: f64) -> Self {
        self.headway = Some(seconds);
        self
    }

    pub fn max_count(mut self, n: u64) -> Self {
        self.max_count = Some(n);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn removal(mut self, policy: RemovalPolicy) -> Self {
        self.removal = policy;
        self
    }

    pub fn depart_speed(mut self, speed: DepartSpeed) -> Self {
        self.depart_speed = speed;
        self
    }

    pub fn depart_pos(mut self, pos: DepartPos) -> Self {
        self.depart_pos = pos;
        self
    }

    pub fn arrival_speed(mut self, speed: ArrivalSpeed) -> Self {
        self.arrival_speed = speed;
        self
    }

    pub fn pedestrian_depart(mut self, depart: PedestrianDepart) -> Self {
        self.pedestrian_depart = depart;
        self
    }
}
