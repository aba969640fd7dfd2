//! Millisecond time source for the debounce gate and read timeouts
//!
//! Timestamps are `u32` milliseconds that wrap around; every elapsed-time
//! computation in the crate uses `wrapping_sub`.

use embassy_time::Instant;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `since`, tolerant of wraparound
    fn elapsed_since(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

/// Clock backed by the Embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Wraps every ~49.7 days
        Instant::now().as_millis() as u32
    }
}

impl<F: Fn() -> u32> Clock for F {
    fn now_ms(&self) -> u32 {
        self()
    }
}
