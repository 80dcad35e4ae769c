//! Clock-agnostic core shared by the sync and async limiters.

use std::time::{Duration, Instant};

use tracing::{trace, warn};

use crate::config::LimiterConfig;
use crate::error::LimiterError;
use crate::metrics::Metrics;
use crate::schedule::{Overrun, Schedule, Tick};

/// A [`Schedule`] plus the policy around it: overrun diagnostics and metrics.
///
/// Limiters own one regulator, read their clock, and hand the readings in:
///
/// ```text
/// if let Some(d) = regulator.begin(clock.now()) { wait(d) }
/// regulator.finish(clock.now());
/// ```
///
/// The wait itself is the only part that differs between a blocking and a
/// cooperative limiter.
#[derive(Debug, Clone)]
pub struct Regulator {
    schedule: Schedule,
    frequency: f64,
    name: String,
    warn: bool,
    late_tolerance: f64,
    pending_wait: Option<Duration>,
    metrics: Option<Metrics>,
}

impl Regulator {
    /// Validates `config` and starts the schedule at `now`.
    pub fn new(config: &LimiterConfig, now: Instant) -> Result<Self, LimiterError> {
        let period = config.validate()?;
        let schedule = Schedule::new(period, now)
            .ok_or(LimiterError::InvalidFrequency(config.frequency))?;
        Ok(Self {
            schedule,
            frequency: config.frequency,
            name: config.name.clone(),
            warn: config.warn,
            late_tolerance: config.late_tolerance,
            pending_wait: None,
            metrics: config.enable_metrics.then(Metrics::new),
        })
    }

    /// Computes the slack at `now`; returns how long to wait, if at all.
    ///
    /// Overruns are reported here (when enabled) and yield `None`. An
    /// overrun is reported when `-slack >= late_tolerance * period`, so a
    /// zero tolerance reports every overrun, including one exactly on the tick.
    pub fn begin(&mut self, now: Instant) -> Option<Duration> {
        self.pending_wait = None;
        match self.schedule.begin(now) {
            Tick::Wait(duration) => {
                self.pending_wait = Some(duration);
                Some(duration)
            }
            Tick::Overrun(overrun) => {
                let reported = self.warn && overrun.ratio >= self.late_tolerance;
                if reported {
                    self.report(overrun);
                }
                if let Some(m) = self.metrics.as_mut() {
                    m.overruns += 1;
                    m.warnings += u64::from(reported);
                    m.max_lateness = m.max_lateness.max(overrun.lateness);
                }
                None
            }
        }
    }

    /// Ends the iteration at `now` and advances the tick by one period.
    pub fn finish(&mut self, now: Instant) {
        self.schedule.finish(now);
        let waited = self.pending_wait.take();
        if let Some(m) = self.metrics.as_mut() {
            m.ticks += 1;
            m.total_slept += waited.unwrap_or_default();
        }
        trace!(
            limiter = %self.name,
            slack_ms = self.schedule.slack() * 1e3,
            measured_ms = self.schedule.measured_period().as_secs_f64() * 1e3,
            "tick"
        );
    }

    fn report(&self, overrun: Overrun) {
        warn!(
            limiter = %self.name,
            late_ms = (overrun.lateness.as_secs_f64() * 1e4).round() / 10.0,
            ratio = overrun.ratio,
            period_ms = self.schedule.period().as_secs_f64() * 1e3,
            "{} is late by {:.1} ms",
            self.name,
            overrun.lateness.as_secs_f64() * 1e3
        );
    }

    /// Signed seconds from `now` until the next tick.
    #[inline]
    pub fn remaining(&self, now: Instant) -> f64 {
        self.schedule.remaining(now)
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn warn(&self) -> bool {
        self.warn
    }

    /// Metrics snapshot, if enabled in the config.
    #[inline]
    pub fn metrics(&self) -> Option<Metrics> {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regulator(config: LimiterConfig, t0: Instant) -> Regulator {
        Regulator::new(&config.with_metrics(true), t0).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = Regulator::new(&LimiterConfig::new(0.0), Instant::now()).unwrap_err();
        assert!(err.is_frequency());
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        let r = Regulator::new(&LimiterConfig::new(10.0), Instant::now()).unwrap();
        assert!(r.metrics().is_none());
    }

    #[test]
    fn test_wait_is_accounted() {
        let t0 = Instant::now();
        let mut r = regulator(LimiterConfig::new(100.0), t0);

        assert_eq!(r.begin(t0), Some(Duration::from_millis(10)));
        r.finish(t0 + Duration::from_millis(10));

        let m = r.metrics().unwrap();
        assert_eq!(m.ticks, 1);
        assert_eq!(m.overruns, 0);
        assert_eq!(m.total_slept, Duration::from_millis(10));
    }

    #[test]
    fn test_overrun_warns_by_default() {
        let t0 = Instant::now();
        let mut r = regulator(LimiterConfig::new(10.0), t0);

        let late = t0 + Duration::from_millis(300);
        assert_eq!(r.begin(late), None);
        r.finish(late);

        let m = r.metrics().unwrap();
        assert_eq!(m.overruns, 1);
        assert_eq!(m.warnings, 1);
        assert_eq!(m.max_lateness, Duration::from_millis(200));
        assert_eq!(m.total_slept, Duration::ZERO);
    }

    #[test]
    fn test_overrun_silenced_when_warn_is_off() {
        let t0 = Instant::now();
        let mut r = regulator(LimiterConfig::new(10.0).with_warn(false), t0);

        r.begin(t0 + Duration::from_millis(300));
        let m = r.metrics().unwrap();
        assert_eq!(m.overruns, 1);
        assert_eq!(m.warnings, 0);
    }

    #[test]
    fn test_rejects_period_past_instant_range() {
        // 1e-19 Hz: a period of ~3e11 years fits a Duration but not an Instant
        let err = Regulator::new(&LimiterConfig::new(1e-19), Instant::now()).unwrap_err();
        assert_eq!(err, LimiterError::InvalidFrequency(1e-19));
    }

    #[test]
    fn test_interrupted_wait_is_not_counted() {
        let t0 = Instant::now();
        let mut r = regulator(LimiterConfig::new(100.0), t0);

        // First attempt is dropped after 4 ms, the retry waits the rest
        assert_eq!(r.begin(t0), Some(Duration::from_millis(10)));
        assert_eq!(
            r.begin(t0 + Duration::from_millis(4)),
            Some(Duration::from_millis(6))
        );
        r.finish(t0 + Duration::from_millis(10));

        let m = r.metrics().unwrap();
        assert_eq!(m.ticks, 1);
        assert_eq!(m.total_slept, Duration::from_millis(6));
    }

    #[test]
    fn test_late_tolerance_boundary_is_inclusive() {
        let t0 = Instant::now();
        let mut r = regulator(LimiterConfig::new(10.0).with_late_tolerance(0.5), t0);

        // 49 ms late on a 100 ms period: under half a period
        r.begin(t0 + Duration::from_millis(149));
        assert_eq!(r.metrics().unwrap().warnings, 0);

        // Exactly half a period late
        r.begin(t0 + Duration::from_millis(150));
        let m = r.metrics().unwrap();
        assert_eq!(m.overruns, 2);
        assert_eq!(m.warnings, 1);
    }

    #[test]
    fn test_late_tolerance_filters_small_overruns() {
        let t0 = Instant::now();
        let mut r = regulator(LimiterConfig::new(10.0).with_late_tolerance(0.1), t0);

        // 5 ms late on a 100 ms period: within tolerance
        r.begin(t0 + Duration::from_millis(105));
        r.finish(t0 + Duration::from_millis(105));
        assert_eq!(r.metrics().unwrap().warnings, 0);

        // 50 ms late on the second tick (due at 200 ms)
        r.begin(t0 + Duration::from_millis(250));
        let m = r.metrics().unwrap();
        assert_eq!(m.overruns, 2);
        assert_eq!(m.warnings, 1);
        assert_eq!(m.max_lateness, Duration::from_millis(50));
    }
}
