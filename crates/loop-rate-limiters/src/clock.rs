//! Monotonic time sources.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::wait::Wait;

/// Monotonic time source consumed by the limiters.
///
/// Implementations must never go backwards. The limiter does not guard
/// against jumps in either direction.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The process-wide monotonic clock (`Instant::now`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock for deterministic tests and simulations.
///
/// Clones share the same time, so one handle can be given to a limiter while
/// the test keeps another to simulate work. Waiting on a `ManualClock`
/// advances it by the requested duration instead of blocking.
///
/// ```
/// use loop_rate_limiters::{LimiterConfig, ManualClock, RateLimiter};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let mut rate = RateLimiter::with_parts(LimiterConfig::new(10.0), clock.clone(), clock.clone())
///     .unwrap();
///
/// clock.advance(Duration::from_millis(30));
/// rate.sleep(); // "sleeps" the remaining 70 ms
/// assert_eq!(clock.elapsed(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock frozen at `origin`.
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves time forward by `duration`, saturating at ~584 years.
    pub fn advance(&self, duration: Duration) {
        let step = duration_to_nanos(duration);
        // Closure always returns Some
        let _ = self
            .elapsed_nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |nanos| {
                Some(nanos.saturating_add(step))
            });
    }

    /// Moves time forward to `elapsed` past the origin. Earlier values are
    /// ignored, so the clock never goes backwards.
    pub fn set_elapsed(&self, elapsed: Duration) {
        self.elapsed_nanos
            .fetch_max(duration_to_nanos(elapsed), Ordering::AcqRel);
    }

    /// Time elapsed since the origin.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::Acquire))
    }

    #[inline]
    pub fn origin(&self) -> Instant {
        self.origin
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

impl Wait for ManualClock {
    fn wait(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Saturates at `u64::MAX` nanoseconds (~584 years).
fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
