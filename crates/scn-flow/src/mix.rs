//! Vehicle-type mixtures.

use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};

use scn_core::{SimRng, VTypeId};

use crate::{FlowError, FlowResult};

/// Unnormalized weights per vehicle or pedestrian type.
///
/// The default is a fresh `{"passenger": 1}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VehicleMix(BTreeMap<VTypeId, f64>);

impl Default for VehicleMix {
    fn default() -> Self {
        Self::single("passenger")
    }
}

impl VehicleMix {
    /// An empty mix.  Not valid for a flow until a type is added.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A mix of one type.
    pub fn single(type_id: impl Into<VTypeId>) -> Self {
        Self::new().with(type_id, 1.0)
    }

    /// Add (or replace) a weighted type.
    pub fn with(mut self, type_id: impl Into<VTypeId>, weight: f64) -> Self {
        self.0.insert(type_id.into(), weight);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn weight(&self, type_id: &VTypeId) -> Option<f64> {
        self.0.get(type_id).copied()
    }

    pub fn types(&self) -> impl Iterator<Item = &VTypeId> {
        self.0.keys()
    }

    /// Normalize the weights into a sampler.
    ///
    /// Fails on an empty mix, negative or non-finite weights, or an
    /// all-zero total.
    pub fn sampler(&self) -> FlowResult<MixSampler> {
        if let Some((t, w)) = self.0.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(FlowError::InvalidMix(format!("type {t} has weight {w}")));
        }
        let index = WeightedIndex::new(self.0.values().copied())
            .map_err(|e| FlowError::InvalidMix(e.to_string()))?;
        Ok(MixSampler {
            types: self.0.keys().cloned().collect(),
            index,
        })
    }
}

/// Draws types in proportion to their weights.
#[derive(Debug, Clone)]
pub struct MixSampler {
    types: Vec<VTypeId>,
    index: WeightedIndex<f64>,
}

impl MixSampler {
    pub fn sample(&self, rng: &mut SimRng) -> &VTypeId {
        &self.types[self.index.sample(rng.inner())]
    }
}
