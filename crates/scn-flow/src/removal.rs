use scn_core::EntityId;

/// What happens to a flow's entities when the flow is disabled.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RemovalPolicy {
    /// Entities stay and finish their trips.
    #[default]
    None,
    /// Remove every entity the flow created that is still present.
    OnDisable,
    /// Remove the flow's vehicles except those within `radius` metres of
    /// `reference` (and `reference` itself).  Vehicle flows only.
    ProximityOnDisable { radius: f64, reference: EntityId },
}

impl RemovalPolicy {
    pub fn removes_on_disable(&self) -> bool {
        !matches!(self, RemovalPolicy::None)
    }
}
