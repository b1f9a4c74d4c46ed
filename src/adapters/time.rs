//! Host time adapter.
//!
//! Monotonic time for the session clock, backed by `std::time::Instant`.
//! The clock task reads [`MonotonicClock::uptime_ms`] once per wake and
//! feeds the difference into the service, so a late wake never loses time.

use std::time::Instant;

pub struct MonotonicClock {
    start: Instant,
    last_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_ms: 0,
        }
    }

    /// Milliseconds since construction (monotonic).
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Milliseconds elapsed since the previous call.
    pub fn lap_ms(&mut self) -> u64 {
        let now = self.uptime_ms();
        let elapsed = now.saturating_sub(self.last_ms);
        self.last_ms = now;
        elapsed
    }
}
