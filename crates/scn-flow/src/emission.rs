//! When a flow emits.

use crate::{FlowError, FlowResult};

/// Emission model of a flow.  Exactly one is configured per flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    /// Bernoulli trial with this per-second probability.
    Probability(f64),
    /// One emission every this many seconds.
    Headway(f64),
}

impl Emission {
    /// Pick the model from two optional settings, exactly one of which must
    /// be present.
    pub fn from_options(probability: Option<f64>, headway: Option<f64>) -> FlowResult<Self> {
        let emission = match (probability, headway) {
            (Some(p), None) => Emission::Probability(p),
            (None, Some(h)) => Emission::Headway(h),
            (Some(_), Some(_)) => {
                return Err(FlowError::EmissionModel(
                    "both probability and headway are set".to_owned(),
                ));
            }
            (None, None) => {
                return Err(FlowError::EmissionModel(
                    "one of probability or headway is required".to_owned(),
                ));
            }
        };
        emission.validate()
    }

    fn validate(self) -> FlowResult<Self> {
        match self {
            Emission::Probability(p) if !(0.0..=1.0).contains(&p) => Err(
                FlowError::EmissionModel(format!("probability {p} is outside [0, 1]")),
            ),
            Emission::Headway(h) if !(h > 0.0 && h.is_finite()) => Err(
                FlowError::EmissionModel(format!("headway {h} must be positive")),
            ),
            ok => Ok(ok),
        }
    }
}

/// Probability of at least one event in a tick of `dt` seconds, for a
/// process with per-second probability `p`.
///
/// `1 - (1 - p)^dt`; equal to `p` when `dt == 1`.
#[inline]
pub fn per_tick_probability(p: f64, dt: f64) -> f64 {
    1.0 - (1.0 - p).powf(dt)
}
