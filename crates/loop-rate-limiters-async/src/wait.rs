//! Cooperative wait primitives.

use std::future::Future;
use std::time::Duration;

use loop_rate_limiters::ManualClock;
use tokio::time::Instant;

/// Cooperative suspend capability used by
/// [`AsyncRateLimiter`](crate::AsyncRateLimiter).
///
/// The returned future must not complete before `duration` has elapsed and
/// must yield to the scheduler while waiting. It may complete later.
///
/// The `+ Send` bound on the returned future lets limiters live inside
/// tasks spawned on a multi-threaded runtime.
pub trait AsyncWait: Send {
    fn wait(&mut self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Waits on a tokio timer, optionally finishing with a `yield_now` loop.
///
/// Tokio timers have millisecond granularity, so a plain timer can overshoot
/// the tick by up to a millisecond. With a non-zero spin window, the timer
/// only covers `duration - spin_window` and the rest is spent yielding to
/// the scheduler until the deadline. Other tasks still run during the spin.
///
/// Keep the spin window at zero under a paused test clock: paused time only
/// advances while the runtime is idle, and a yielding task keeps it busy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWait {
    spin_window: Duration,
}

impl TokioWait {
    /// Plain timer wait.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spin_window(spin_window: Duration) -> Self {
        Self { spin_window }
    }

    #[inline]
    pub fn spin_window(&self) -> Duration {
        self.spin_window
    }
}

impl AsyncWait for TokioWait {
    async fn wait(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        if self.spin_window.is_zero() {
            tokio::time::sleep_until(deadline).await;
            return;
        }

        if let Some(coarse) = duration.checked_sub(self.spin_window) {
            tokio::time::sleep(coarse).await;
        }
        while Instant::now() < deadline {
            tokio::task::yield_now().await;
        }
    }
}

/// Advances the manual clock, then yields once so the wait is still a
/// suspension point.
impl AsyncWait for ManualClock {
    async fn wait(&mut self, duration: Duration) {
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}
