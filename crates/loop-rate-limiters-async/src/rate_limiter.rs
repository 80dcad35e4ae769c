use std::time::{Duration, Instant};

use loop_rate_limiters::{Clock, LimiterConfig, LimiterError, Metrics, Regulator};

use crate::clock::TokioClock;
use crate::wait::{AsyncWait, TokioWait};

/// Regulates the frequency of an async loop without blocking the runtime.
///
/// Same contract as the blocking `RateLimiter`: the first `sleep` waits about
/// one period from construction, later ones wait until one period after the
/// previous tick, and overruns return immediately with an optional warning.
/// Tokio may resume the task later than the tick under load; the fixed
/// schedule absorbs that lateness on the next call.
///
/// # Cancellation
///
/// Dropping a pending [`sleep`](Self::sleep) future (for example from a
/// `select!` branch or a timeout) does not advance the schedule. The slack of
/// the interrupted call stays recorded and the next `sleep` targets the same
/// tick.
///
/// # Example
///
/// ```no_run
/// use loop_rate_limiters_async::{AsyncRateLimiter, LimiterConfig};
///
/// # async fn run() -> Result<(), loop_rate_limiters_async::LimiterError> {
/// let mut rate = AsyncRateLimiter::from_config(
///     LimiterConfig::new(400.0).with_name("telemetry").with_late_tolerance(0.1),
/// )?;
/// loop {
///     // ... poll sensors ...
///     rate.sleep().await;
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct AsyncRateLimiter<C = TokioClock, W = TokioWait> {
    regulator: Regulator,
    clock: C,
    wait: W,
}

impl AsyncRateLimiter {
    /// Creates a limiter for `frequency` hertz that warns on overruns.
    pub fn new(frequency: f64) -> Result<Self, LimiterError> {
        Self::from_config(LimiterConfig::new(frequency))
    }

    /// Creates a limiter for `frequency` hertz, warning on overruns only if
    /// `warn` is set.
    pub fn with_warn(frequency: f64, warn: bool) -> Result<Self, LimiterError> {
        Self::from_config(LimiterConfig::new(frequency).with_warn(warn))
    }

    /// Creates a limiter on the tokio clock from a full configuration.
    pub fn from_config(config: LimiterConfig) -> Result<Self, LimiterError> {
        let wait = TokioWait::with_spin_window(config.spin_window);
        Self::with_parts(config, TokioClock, wait)
    }
}

impl<C: Clock, W: AsyncWait> AsyncRateLimiter<C, W> {
    /// Creates a limiter on an injected clock and wait primitive.
    ///
    /// The clock must share its time domain with the wait primitive, or the
    /// computed slack will not match the time actually waited.
    pub fn with_parts(config: LimiterConfig, clock: C, wait: W) -> Result<Self, LimiterError> {
        let regulator = Regulator::new(&config, clock.now())?;
        Ok(Self {
            regulator,
            clock,
            wait,
        })
    }

    /// Suspends the task for whatever is left of the current period, then
    /// schedules the next tick one period later.
    pub async fn sleep(&mut self) {
        if let Some(duration) = self.regulator.begin(self.clock.now()) {
            self.wait.wait(duration).await;
        }
        self.regulator.finish(self.clock.now());
    }

    /// Signed seconds until the next tick; negative once it has passed.
    pub fn remaining(&self) -> f64 {
        self.regulator.remaining(self.clock.now())
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.regulator.schedule().period()
    }

    /// Nominal loop period in seconds.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.period().as_secs_f64()
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.regulator.frequency()
    }

    #[inline]
    pub fn next_tick(&self) -> Instant {
        self.regulator.schedule().next_tick()
    }

    /// Seconds remaining until the tick at the start of the last `sleep`.
    #[inline]
    pub fn slack(&self) -> f64 {
        self.regulator.schedule().slack()
    }

    /// Time between the last two completed `sleep` calls.
    #[inline]
    pub fn measured_period(&self) -> Duration {
        self.regulator.schedule().measured_period()
    }

    #[inline]
    pub fn warn(&self) -> bool {
        self.regulator.warn()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.regulator.name()
    }

    #[inline]
    pub fn metrics(&self) -> Option<Metrics> {
        self.regulator.metrics()
    }
}
