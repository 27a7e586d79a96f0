//! Queued arrival targets.

/// What the synchronizer does while a target is at the head of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Adjust the partner's speed so both vehicles arrive together.
    Match,
    /// Hold the partner short of its station until the ego passes.
    Wait,
}

/// One synchronization point, expressed as stations on the two routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalTarget {
    pub kind:             TargetKind,
    /// Station of the target on the ego route, in metres.
    pub ego_station:      f64,
    /// Station of the target on the partner route, in metres.
    pub partner_station:  f64,
    /// `Match`: ego distance at which control is handed back.
    /// `Wait`: partner distance inside which it is braked.
    pub release_distance: f64,
}

impl ArrivalTarget {
    pub fn matching(ego_station: f64, partner_station: f64, release_distance: f64) -> Self {
        Self { kind: TargetKind::Match, ego_station, partner_station, release_distance }
    }

    pub fn waiting(ego_station: f64, partner_station: f64, braking_distance: f64) -> Self {
        Self {
            kind: TargetKind::Wait,
            ego_station,
            partner_station,
            release_distance: braking_distance,
        }
    }
}
