use scn_core::EntityId;

/// Scenario-wide settings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    /// Root seed; every flow draws from its own child stream.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
    /// Vehicle whose position drives the zones.  `None` leaves zones idle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ego:  Option<EntityId>,
}

impl ScenarioConfig {
    pub fn new(seed: u64) -> Self {
        Self { seed, ego: None }
    }

    pub fn ego(mut self, id: impl Into<EntityId>) -> Self {
        self.ego = Some(id.into());
        self
    }
}
