//! Error types for limiter construction.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a limiter.
///
/// All of them are argument errors: construction either succeeds with a
/// usable limiter or fails here, never silently corrects its input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LimiterError {
    /// The frequency is not a positive, finite number of hertz, or its
    /// period does not fit in a non-zero `Duration`.
    #[error("invalid frequency {0} Hz: expected a finite value > 0")]
    InvalidFrequency(f64),

    /// The late tolerance is negative or not finite.
    #[error("invalid late tolerance {0}: expected a finite fraction >= 0")]
    InvalidTolerance(f64),

    /// The spin window would cover the whole period.
    #[error("spin window {spin_window:?} must be shorter than the period {period:?}")]
    SpinWindowTooLarge {
        spin_window: Duration,
        period: Duration,
    },
}

impl LimiterError {
    /// Returns `true` if the error comes from the frequency itself.
    #[inline]
    pub fn is_frequency(&self) -> bool {
        matches!(self, Self::InvalidFrequency(_))
    }
}
