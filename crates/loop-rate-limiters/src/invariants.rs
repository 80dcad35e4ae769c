//! Debug assertion macros for tick schedule invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing for them.

// =============================================================================
// Fixed Absolute Schedule
// =============================================================================

/// Assert that the next tick moved forward by exactly one period.
///
/// **Invariant**: `next_tick_new == next_tick_old + period`
///
/// Used in: `Schedule::finish()` after advancing the tick
macro_rules! debug_assert_tick_advanced {
    ($old:expr, $new:expr, $period:expr) => {
        debug_assert!(
            $new == $old + $period,
            "tick advanced from {:?} to {:?}, expected a step of {:?}",
            $old,
            $new,
            $period
        )
    };
}

// =============================================================================
// Slack Sign
// =============================================================================

/// Assert that the slack sign agrees with the wait decision.
///
/// **Invariant**: `slack > 0 ⟺ wait`
///
/// Used in: `Schedule::begin()` after classifying the tick
macro_rules! debug_assert_slack_consistent {
    ($slack:expr, $waits:expr) => {
        debug_assert!(
            ($slack > 0.0) == $waits,
            "slack {} disagrees with wait decision (waits: {})",
            $slack,
            $waits
        )
    };
}

pub(crate) use debug_assert_slack_consistent;
pub(crate) use debug_assert_tick_advanced;
