//! Wall-clock integration tests for the blocking limiter.
//!
//! Timing assertions only bound from below tightly; upper bounds are loose to
//! survive loaded CI machines.

use loop_rate_limiters::{LimiterConfig, RateLimiter};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_idle_loop_at_100_hz() {
    let mut rate = RateLimiter::new(100.0).unwrap();
    assert_eq!(rate.period(), Duration::from_millis(10));

    // Discard the construction-to-first-tick period
    rate.sleep();

    let start = Instant::now();
    for _ in 0..10 {
        rate.sleep();
        assert!(!rate.measured_period().is_zero());
    }
    let elapsed = start.elapsed();

    // A late first tick shortens the first measured iteration
    assert!(
        elapsed >= Duration::from_millis(80) && elapsed <= Duration::from_millis(250),
        "Expected ~100ms, got {:?}",
        elapsed
    );
}

#[test]
fn test_first_sleep_blocks_one_period() {
    let mut rate = RateLimiter::new(50.0).unwrap();

    let start = Instant::now();
    rate.sleep();
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_millis(15) && elapsed <= Duration::from_millis(100),
        "Expected ~20ms, got {:?}",
        elapsed
    );
    assert!(rate.slack() > 0.0);
}

#[test]
fn test_overrun_returns_immediately() {
    let mut rate = RateLimiter::from_config(LimiterConfig::new(10.0).with_metrics(true)).unwrap();
    let before = rate.next_tick();

    thread::sleep(Duration::from_millis(300));

    let start = Instant::now();
    rate.sleep();
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_millis(50), "overrun slept {:?}", elapsed);
    assert!(rate.slack() < -0.15, "slack {}", rate.slack());
    assert_eq!(rate.next_tick(), before + rate.period());
    assert!(rate.measured_period() >= Duration::from_millis(300));

    let metrics = rate.metrics().unwrap();
    assert_eq!(metrics.overruns, 1);
    assert_eq!(metrics.warnings, 1);
}

#[test]
fn test_slack_turns_negative_after_a_period() {
    let mut rate = RateLimiter::new(1000.0).unwrap();
    rate.sleep();
    thread::sleep(rate.period());
    assert!(rate.remaining() < 0.0);

    rate.sleep();
    assert!(rate.slack() < 0.0);
}

#[test]
fn test_measured_period_follows_work() {
    let mut rate = RateLimiter::with_warn(20.0, false).unwrap(); // 50 ms
    rate.sleep();

    thread::sleep(Duration::from_millis(20));
    rate.sleep();

    // Work is absorbed by a shorter sleep: the period stays ~50 ms
    let measured = rate.measured_period();
    assert!(
        measured >= Duration::from_millis(45) && measured <= Duration::from_millis(120),
        "Expected ~50ms, got {:?}",
        measured
    );
    assert!(rate.slack() > 0.0 && rate.slack() < 0.035, "slack {}", rate.slack());
}

#[test]
fn test_precise_preset_keeps_period() {
    let mut rate = RateLimiter::from_config(LimiterConfig::precise(200.0)).unwrap();
    rate.sleep();

    let start = Instant::now();
    for _ in 0..20 {
        rate.sleep();
    }
    let elapsed = start.elapsed();

    // 20 ticks at 5 ms each
    assert!(
        elapsed >= Duration::from_millis(95) && elapsed <= Duration::from_millis(250),
        "Expected ~100ms, got {:?}",
        elapsed
    );
}
