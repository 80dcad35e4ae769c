use std::hint;
use std::thread;
use std::time::Instant;

/// Busy-wait helper for the last stretch before a tick.
///
/// Progressively increases the spin length: short PAUSE bursts, doubling up
/// to a cap, then a yield to the OS between bursts so a busy core can still
/// make progress elsewhere.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max per burst
    const YIELD_AFTER: u32 = 10; // Bursts before yielding between them

    /// Creates a new backoff instance.
    #[inline]
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub fn spin(&mut self) {
        let spins = 1 << self.step.min(Self::SPIN_LIMIT);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= Self::YIELD_AFTER {
            self.step += 1;
        }
    }

    /// Heavier backoff: spin, then also yield once past the spin budget.
    #[inline]
    pub fn snooze(&mut self) {
        self.spin();
        if self.step > Self::YIELD_AFTER {
            thread::yield_now();
        }
    }

    /// Snoozes until `deadline` has passed; returns the number of rounds.
    pub fn spin_until(&mut self, deadline: Instant) -> u32 {
        let mut rounds = 0;
        while Instant::now() < deadline {
            self.snooze();
            rounds += 1;
        }
        rounds
    }

    /// Reset for next wait cycle.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
