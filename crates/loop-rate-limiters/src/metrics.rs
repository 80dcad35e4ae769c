use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optional metrics for monitoring loop timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metrics {
    /// Completed `sleep` calls.
    pub ticks: u64,
    /// Calls that found the loop behind schedule.
    pub overruns: u64,
    /// Overruns that were reported as warnings.
    pub warnings: u64,
    /// Total time waited by completed `sleep` calls. A wait that is
    /// interrupted (a dropped async `sleep`) is not counted.
    pub total_slept: Duration,
    /// Worst lateness seen on a single tick.
    pub max_lateness: Duration,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of ticks that overran, or 0 before the first tick.
    pub fn overrun_ratio(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.overruns as f64 / self.ticks as f64
        }
    }
}
