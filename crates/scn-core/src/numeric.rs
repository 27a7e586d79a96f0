//! Numeric guards shared by every controller that divides by a speed or rate.
//!
//! The simulator routinely reports an exact `0.0` speed (queued or stopped
//! vehicles).  Rather than special-casing that at each call site, every
//! division by a speed goes through [`safe_div`].

/// Substitute divisor used when a speed is exactly zero, in m/s.
///
/// Small enough that the resulting ETA is effectively "never", large enough
/// to keep the quotient finite.
pub const SPEED_EPSILON: f64 = 1e-4;

/// `numerator / denominator`, with an exactly-zero denominator replaced by
/// [`SPEED_EPSILON`].
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    let denominator = if denominator == 0.0 { SPEED_EPSILON } else { denominator };
    numerator / denominator
}
