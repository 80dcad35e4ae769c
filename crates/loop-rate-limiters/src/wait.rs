//! Blocking wait primitives.

use std::thread;
use std::time::{Duration, Instant};

use crate::backoff::Backoff;

/// Blocking suspend capability used by [`RateLimiter`](crate::RateLimiter).
///
/// `wait` must return no earlier than `duration` from the call. It may return
/// later; the limiter's absolute schedule absorbs the difference on the next
/// tick.
pub trait Wait {
    fn wait(&mut self, duration: Duration);
}

/// Blocks the calling thread with `std::thread::sleep`, optionally spinning
/// through the final `spin_window` of each wait.
#[derive(Debug, Default)]
pub struct ThreadWait {
    spin_window: Duration,
    backoff: Backoff,
}

impl ThreadWait {
    /// Plain thread sleep.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps until `spin_window` before the deadline, then spins.
    pub fn with_spin_window(spin_window: Duration) -> Self {
        Self {
            spin_window,
            backoff: Backoff::new(),
        }
    }

    #[inline]
    pub fn spin_window(&self) -> Duration {
        self.spin_window
    }
}

impl Wait for ThreadWait {
    fn wait(&mut self, duration: Duration) {
        if self.spin_window.is_zero() {
            thread::sleep(duration);
            return;
        }

        let deadline = Instant::now() + duration;
        if let Some(coarse) = duration.checked_sub(self.spin_window) {
            thread::sleep(coarse);
        }
        self.backoff.reset();
        self.backoff.spin_until(deadline);
    }
}
