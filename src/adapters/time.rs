//! System time adapter.
//!
//! Provides monotonic time, blocking sleep and microsecond delays backed
//! by `std::time::Instant` and `std::thread::sleep`.

use core::time::Duration;
use std::time::Instant;

use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;

/// Monotonic clock anchored at construction.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    /// Microseconds since construction (wraps at `u64::MAX`).
    fn now_us(&mut self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl DelayNs for SystemClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}
