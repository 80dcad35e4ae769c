use std::time::{Duration, Instant};

use crate::clock::{Clock, MonotonicClock};
use crate::config::LimiterConfig;
use crate::error::LimiterError;
use crate::metrics::Metrics;
use crate::regulator::Regulator;
use crate::wait::{ThreadWait, Wait};

/// Regulates the frequency of a loop by blocking the calling thread.
///
/// Call [`sleep`](Self::sleep) once per iteration, after the loop body. The
/// first call waits roughly one full period from construction; each later
/// call waits until one period after the previous tick. Iterations that
/// overrun their period do not sleep at all and, unless disabled, log a
/// warning.
///
/// A limiter is owned by a single loop. It holds no resources and needs no
/// teardown.
///
/// # Example
///
/// ```no_run
/// use loop_rate_limiters::RateLimiter;
///
/// let mut rate = RateLimiter::new(50.0)?; // 20 ms period
/// loop {
///     // ... control step ...
///     rate.sleep();
/// }
/// # Ok::<(), loop_rate_limiters::LimiterError>(())
/// ```
#[derive(Debug)]
pub struct RateLimiter<C = MonotonicClock, W = ThreadWait> {
    regulator: Regulator,
    clock: C,
    wait: W,
}

impl RateLimiter {
    /// Creates a limiter for `frequency` hertz that warns on overruns.
    pub fn new(frequency: f64) -> Result<Self, LimiterError> {
        Self::from_config(LimiterConfig::new(frequency))
    }

    /// Creates a limiter for `frequency` hertz, warning on overruns only if
    /// `warn` is set.
    pub fn with_warn(frequency: f64, warn: bool) -> Result<Self, LimiterError> {
        Self::from_config(LimiterConfig::new(frequency).with_warn(warn))
    }

    /// Creates a limiter on the monotonic clock from a full configuration.
    pub fn from_config(config: LimiterConfig) -> Result<Self, LimiterError> {
        let wait = ThreadWait::with_spin_window(config.spin_window);
        Self::with_parts(config, MonotonicClock, wait)
    }
}

impl<C: Clock, W: Wait> RateLimiter<C, W> {
    /// Creates a limiter on an injected clock and wait primitive.
    ///
    /// `config.spin_window` is validated but only honoured by waits that
    /// support it, such as [`ThreadWait`].
    pub fn with_parts(config: LimiterConfig, clock: C, wait: W) -> Result<Self, LimiterError> {
        let regulator = Regulator::new(&config, clock.now())?;
        Ok(Self {
            regulator,
            clock,
            wait,
        })
    }

    /// Sleeps whatever is left of the current period, then schedules the
    /// next tick one period later.
    pub fn sleep(&mut self) {
        if let Some(duration) = self.regulator.begin(self.clock.now()) {
            self.wait.wait(duration);
        }
        self.regulator.finish(self.clock.now());
    }

    /// Signed seconds until the next tick; negative once it has passed.
    pub fn remaining(&self) -> f64 {
        self.regulator.remaining(self.clock.now())
    }

    /// Nominal loop period.
    #[inline]
    pub fn period(&self) -> Duration {
        self.regulator.schedule().period()
    }

    /// Nominal loop period in seconds, for integrating loop quantities.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.period().as_secs_f64()
    }

    /// Target frequency in hertz.
    #[inline]
    pub fn frequency(&self) -> f64 {
        self.regulator.frequency()
    }

    /// Instant at which the current iteration is scheduled to end.
    #[inline]
    pub fn next_tick(&self) -> Instant {
        self.regulator.schedule().next_tick()
    }

    /// Seconds remaining until the tick at the start of the last `sleep`.
    /// Positive means the loop was ahead of schedule.
    #[inline]
    pub fn slack(&self) -> f64 {
        self.regulator.schedule().slack()
    }

    /// Wall-clock time between the last two `sleep` returns.
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

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
