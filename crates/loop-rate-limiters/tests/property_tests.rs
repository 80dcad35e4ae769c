//! Property-based tests for the tick schedule.
//!
//! Every limiter here runs on a `ManualClock`, so timing is exact and the
//! properties hold to the nanosecond.

use loop_rate_limiters::{LimiterConfig, ManualClock, RateLimiter};
use proptest::prelude::*;
use std::time::Duration;

fn manual(frequency: f64) -> (RateLimiter<ManualClock, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let config = LimiterConfig::new(frequency).with_warn(false);
    let rate = RateLimiter::with_parts(config, clock.clone(), clock.clone()).unwrap();
    (rate, clock)
}

// =============================================================================
// Period / Frequency Consistency
// "period == 1/frequency, dt == period"
// =============================================================================

proptest! {
    #[test]
    fn prop_period_is_inverse_frequency(frequency in 0.01f64..100_000.0) {
        let (rate, _clock) = manual(frequency);
        let expected = 1.0 / frequency;

        // Duration keeps nanosecond resolution
        prop_assert!((rate.period().as_secs_f64() - expected).abs() <= 1e-9);
        prop_assert_eq!(rate.dt(), rate.period().as_secs_f64());
    }

    #[test]
    fn prop_non_positive_frequency_is_rejected(frequency in -1e6f64..=0.0) {
        prop_assert!(RateLimiter::new(frequency).is_err());
    }
}

// =============================================================================
// No Drift
// "after N idle ticks, next_tick == initial + N * period"
// =============================================================================

proptest! {
    #[test]
    fn prop_idle_schedule_does_not_drift(
        frequency in 1.0f64..10_000.0,
        ticks in 1u32..500,
    ) {
        let (mut rate, _clock) = manual(frequency);
        let initial = rate.next_tick();

        for _ in 0..ticks {
            rate.sleep();
        }

        prop_assert_eq!(rate.next_tick(), initial + rate.period() * ticks);
    }

    /// Arbitrary work per iteration never shifts the schedule's phase.
    #[test]
    fn prop_work_does_not_shift_phase(
        work_us in prop::collection::vec(0u64..30_000, 1..100),
    ) {
        let (mut rate, clock) = manual(100.0); // 10 ms
        let initial = rate.next_tick();

        for (i, work) in work_us.iter().enumerate() {
            clock.advance(Duration::from_micros(*work));
            rate.sleep();
            prop_assert_eq!(rate.next_tick(), initial + rate.period() * (i as u32 + 1));
        }
    }
}

// =============================================================================
// Overrun
// "a late call does not wait and advances the tick by one period"
// =============================================================================

proptest! {
    #[test]
    fn prop_overrun_advances_one_period(
        frequency in 1.0f64..1000.0,
        extra_us in 0u64..1_000_000,
    ) {
        let (mut rate, clock) = manual(frequency);
        let before = rate.next_tick();

        clock.advance(rate.period() + Duration::from_micros(extra_us));
        let elapsed_before = clock.elapsed();
        rate.sleep();

        prop_assert_eq!(clock.elapsed(), elapsed_before, "overrun must not wait");
        prop_assert!(rate.slack() <= 0.0);
        prop_assert_eq!(rate.next_tick(), before + rate.period());
    }

    /// Slack sign agrees with whether the call waited.
    #[test]
    fn prop_slack_sign_matches_wait(work_us in 0u64..20_000) {
        let (mut rate, clock) = manual(100.0);

        clock.advance(Duration::from_micros(work_us));
        let elapsed_before = clock.elapsed();
        rate.sleep();

        let waited = clock.elapsed() > elapsed_before;
        prop_assert_eq!(waited, rate.slack() > 0.0);
    }

    /// The measured period is the time between consecutive `sleep` returns.
    #[test]
    fn prop_measured_period_is_elapsed_time(
        work_us in prop::collection::vec(0u64..25_000, 1..50),
    ) {
        let (mut rate, clock) = manual(100.0);
        let mut last_return = clock.elapsed();

        for work in work_us {
            clock.advance(Duration::from_micros(work));
            rate.sleep();
            let now = clock.elapsed();
            prop_assert_eq!(rate.measured_period(), now - last_return);
            last_return = now;
        }
    }
}
