//! One signal bit and its timing state.

use crate::{BlinkPattern, SignalError, SignalResult};

#[derive(Debug, Clone)]
pub struct SignalChannel {
    bit:         u8,
    pattern:     BlinkPattern,
    enabled:     bool,
    on:          bool,
    phase:       usize,
    /// Simulated time of the last phase change or (re-)enable.
    last_change: f64,
}

impl SignalChannel {
    /// A disabled channel driving `bit` with `pattern`.
    pub fn new(bit: u8, pattern: BlinkPattern) -> SignalResult<Self> {
        if bit >= 32 {
            return Err(SignalError::BitOutOfRange(bit));
        }
        Ok(Self { bit, pattern, enabled: false, on: false, phase: 0, last_change: 0.0 })
    }

    pub fn steady(bit: u8) -> SignalResult<Self> {
        Self::new(bit, BlinkPattern::steady())
    }

    /// Blinking with [`DEFAULT_BLINK`](crate::DEFAULT_BLINK) timing.
    pub fn blinking(bit: u8) -> SignalResult<Self> {
        Self::new(bit, BlinkPattern::default())
    }

    pub fn bit(&self) -> u8 {
        self.bit
    }

    pub fn mask(&self) -> u32 {
        1 << self.bit
    }

    pub fn pattern(&self) -> &BlinkPattern {
        &self.pattern
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Output computed by the last [`update`](Self::update).
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Enable at time `now`, restarting the pattern.  No-op if already
    /// enabled.
    pub fn enable(&mut self, now: f64) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.phase = 0;
        self.last_change = now;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Advance the pattern to time `now` and return whether the bit is on.
    pub fn update(&mut self, now: f64) -> bool {
        if !self.enabled {
            self.on = false;
            return false;
        }
        if now - self.last_change >= self.pattern.duration(self.phase) {
            self.phase = (self.phase + 1) % self.pattern.len();
            self.last_change = now;
        }
        self.on = self.phase % 2 == 0;
        self.on
    }
}
