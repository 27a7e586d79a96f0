//! On/off timing of a signal channel.

use crate::{SignalError, SignalResult};

/// Default blink timing: 0.4 s on, 0.4 s off.
pub const DEFAULT_BLINK: [f64; 2] = [0.4, 0.4];

/// Alternating phase durations in seconds, starting with an "on" phase.
///
/// Even phase indices are on, odd ones off.  A steady light is a single
/// infinite "on" phase.
#[derive(Debug, Clone, PartialEq)]
pub struct BlinkPattern(Vec<f64>);

impl Default for BlinkPattern {
    fn default() -> Self {
        Self(DEFAULT_BLINK.to_vec())
    }
}

impl BlinkPattern {
    pub fn new(durations: impl IntoIterator<Item = f64>) -> SignalResult<Self> {
        let durations: Vec<f64> = durations.into_iter().collect();
        if durations.is_empty() {
            return Err(SignalError::InvalidPattern("no phases".to_owned()));
        }
        if let Some(d) = durations.iter().find(|d| d.is_nan() || **d <= 0.0) {
            return Err(SignalError::InvalidPattern(format!("phase duration {d}")));
        }
        Ok(Self(durations))
    }

    /// Always on.
    pub fn steady() -> Self {
        Self(vec![f64::INFINITY])
    }

    pub fn blink(on: f64, off: f64) -> SignalResult<Self> {
        Self::new([on, off])
    }

    pub fn is_steady(&self) -> bool {
        self.0.len() == 1
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn duration(&self, phase: usize) -> f64 {
        self.0[phase % self.0.len()]
    }
}
