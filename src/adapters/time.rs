//! Host time adapter.
//!
//! Provides the monotonic clock and blocking delay the driver needs when
//! running on a hosted target.
//!
//! - [`StdClock`] wraps `std::time::Instant` (millisecond precision).
//! - [`StdDelay`] implements `embedded_hal::delay::DelayNs` with
//!   `std::thread::sleep`.
//!
//! On bare metal the HAL supplies both; only [`Clock`] needs a small
//! adapter over its timer.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::ports::Clock;

/// Monotonic clock counting from construction.
pub struct StdClock {
    start: Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    /// Milliseconds since construction (monotonic).
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Blocking delay that parks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
