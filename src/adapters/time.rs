//! Host time adapter.
//!
//! Provides the controller's [`Clock`] on a hosted target: milliseconds
//! since construction from `std::time::Instant`, truncated to the `u32`
//! tick the controller runs on, and blocking delays via
//! `std::thread::sleep`.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;
use crate::time::Millis;

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

impl DelayNs for StdClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> Millis {
        // Truncation is the wrap the controller expects.
        self.start.elapsed().as_millis() as Millis
    }
}
