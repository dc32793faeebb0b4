//! Host time adapter.
//!
//! Implements the [`Clock`] port with `std::time::Instant`.  The board
//! port would read its millisecond systick instead; either way the value
//! wraps at `u32::MAX` and consumers compare with `wrapping_sub`.

use std::time::Instant;

use crate::app::ports::Clock;

/// Milliseconds since construction.
pub struct MonotonicClock {
    start: Instant,
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
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wrap.
        self.start.elapsed().as_millis() as u32
    }
}
