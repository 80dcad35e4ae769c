use std::time::Instant;

use loop_rate_limiters::Clock;

/// Reads the tokio clock.
///
/// Tokio timers measure time with `tokio::time::Instant`, which can be paused
/// and advanced in tests. Reading the same source keeps the limiter's slack in
/// step with the timer that actually wakes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    #[inline]
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}
