//! Loop Rate Limiters
//!
//! Regulate the frequency of a control loop: call [`RateLimiter::sleep`] once
//! per iteration and the limiter sleeps whatever is left of the current period,
//! compensating for the time already spent in the loop body.
//!
//! # Key Features
//!
//! - Absolute schedule: every tick lands exactly one period after the previous
//!   one, so rounding never accumulates into drift
//! - Overruns never sleep; they are reported as a `tracing` warning instead
//! - Clock and wait primitives are injectable ([`Clock`], [`Wait`]), with a
//!   [`ManualClock`] for fully deterministic tests
//! - Optional spin tail to trim oversleep close to the tick
//!
//! The arithmetic lives in [`Schedule`], wrapped with overrun reporting and
//! metrics by [`Regulator`]; both are shared with the asynchronous limiter of
//! the `loop-rate-limiters-async` crate.
//!
//! # Example
//!
//! ```no_run
//! use loop_rate_limiters::RateLimiter;
//!
//! let mut rate = RateLimiter::new(100.0).unwrap(); // 100 Hz, 10 ms period
//! for _ in 0..100 {
//!     // ... loop body ...
//!     rate.sleep();
//! }
//! println!("last period: {:?}", rate.measured_period());
//! ```

mod backoff;
mod clock;
mod config;
mod error;
mod invariants;
mod metrics;
mod rate_limiter;
mod regulator;
mod schedule;
mod wait;

pub use backoff::Backoff;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{LimiterConfig, DEFAULT_NAME, PRECISE_SPIN_WINDOW};
pub use error::LimiterError;
pub use metrics::Metrics;
pub use rate_limiter::RateLimiter;
pub use regulator::Regulator;
pub use schedule::{Overrun, Schedule, Tick};
pub use wait::{ThreadWait, Wait};
