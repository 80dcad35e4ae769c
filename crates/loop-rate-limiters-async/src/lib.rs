//! Async Loop Rate Limiter for Tokio
//!
//! [`AsyncRateLimiter`] regulates the frequency of a loop running inside a
//! task. Its `sleep` is a suspension point: while one loop waits for its next
//! tick, the runtime keeps driving every other task.
//!
//! The scheduling arithmetic, overrun warnings and metrics come from
//! [`loop_rate_limiters::Regulator`], exactly as for the blocking
//! `RateLimiter`; only the wait primitive differs.
//!
//! # Features
//!
//! - **Same time domain as tokio timers**: [`TokioClock`] reads
//!   `tokio::time::Instant`, so limiters follow a paused or auto-advancing
//!   test clock
//! - **Cancel-safe**: dropping a pending `sleep()` leaves the schedule where
//!   it was
//! - **Cooperative spin tail**: an optional final stretch spent in
//!   `yield_now` instead of a timer, to trim timer overshoot
//!
//! # Example
//!
//! ```no_run
//! use loop_rate_limiters_async::AsyncRateLimiter;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut rate = AsyncRateLimiter::new(100.0).unwrap();
//!     for _ in 0..100 {
//!         // ... async loop body ...
//!         rate.sleep().await;
//!     }
//! }
//! ```

mod clock;
mod rate_limiter;
mod wait;

pub use clock::TokioClock;
pub use rate_limiter::AsyncRateLimiter;
pub use wait::{AsyncWait, TokioWait};

// Re-export the shared configuration surface
pub use loop_rate_limiters::{Clock, LimiterConfig, LimiterError, ManualClock, Metrics};
