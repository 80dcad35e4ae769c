use std::time::{Duration, Instant};

use crate::invariants::{debug_assert_slack_consistent, debug_assert_tick_advanced};

/// Outcome of [`Schedule::begin`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Ahead of schedule: wait this long to reach the next tick.
    Wait(Duration),
    /// Behind schedule: nothing to wait for.
    Overrun(Overrun),
}

/// How late a loop iteration finished relative to its tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overrun {
    /// Time elapsed past the scheduled tick (`-slack`).
    pub lateness: Duration,
    /// Lateness as a fraction of the nominal period.
    pub ratio: f64,
}

/// Fixed-period tick schedule.
///
/// Pure arithmetic over instants: callers read their clock, hand the reading
/// to [`begin`](Self::begin), wait if told to, then read the clock again and
/// call [`finish`](Self::finish). The next tick always advances by exactly one
/// period, whether the iteration was early or late, so the schedule stays
/// anchored to its construction instant.
#[derive(Debug, Clone)]
pub struct Schedule {
    period: Duration,
    next_tick: Instant,
    last_tick: Instant,
    slack: f64,
    measured_period: Duration,
}

impl Schedule {
    /// Starts a schedule whose first tick is one period after `now`.
    ///
    /// Returns `None` if that tick is not representable as an `Instant`.
    pub fn new(period: Duration, now: Instant) -> Option<Self> {
        debug_assert!(!period.is_zero(), "schedule period must be positive");
        Some(Self {
            period,
            next_tick: now.checked_add(period)?,
            last_tick: now,
            slack: 0.0,
            measured_period: Duration::ZERO,
        })
    }

    /// Records the slack at `now` and tells the caller whether to wait.
    pub fn begin(&mut self, now: Instant) -> Tick {
        self.slack = signed_secs(self.next_tick, now);
        let tick = match self.next_tick.checked_duration_since(now) {
            Some(remaining) if !remaining.is_zero() => Tick::Wait(remaining),
            _ => {
                let lateness = now.saturating_duration_since(self.next_tick);
                Tick::Overrun(Overrun {
                    lateness,
                    ratio: lateness.as_secs_f64() / self.period.as_secs_f64(),
                })
            }
        };
        debug_assert_slack_consistent!(self.slack, matches!(tick, Tick::Wait(_)));
        tick
    }

    /// Closes the current iteration at `now` and advances to the next tick.
    ///
    /// A tick past the end of the `Instant` range saturates: the schedule
    /// stays on its last representable tick and every later call overruns.
    pub fn finish(&mut self, now: Instant) {
        self.measured_period = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        let previous = self.next_tick;
        if let Some(next) = previous.checked_add(self.period) {
            self.next_tick = next;
            debug_assert_tick_advanced!(previous, self.next_tick, self.period);
        }
    }

    /// Lateness of the last `begin` as a fraction of the period
    /// (`-slack / period`); negative when the loop was ahead of schedule.
    #[inline]
    pub fn lateness_ratio(&self) -> f64 {
        -self.slack / self.period.as_secs_f64()
    }

    /// Signed seconds from `now` until the next tick.
    #[inline]
    pub fn remaining(&self, now: Instant) -> f64 {
        signed_secs(self.next_tick, now)
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[inline]
    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Signed seconds until the next tick, as measured by the last `begin`.
    #[inline]
    pub fn slack(&self) -> f64 {
        self.slack
    }

    /// Time elapsed between the last two `finish` calls (or since
    /// construction, after the first one).
    #[inline]
    pub fn measured_period(&self) -> Duration {
        self.measured_period
    }
}

/// `to - from` in signed seconds.
fn signed_secs(to: Instant, from: Instant) -> f64 {
    match to.checked_duration_since(from) {
        Some(ahead) => ahead.as_secs_f64(),
        None => -from.duration_since(to).as_secs_f64(),
    }
}
