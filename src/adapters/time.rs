//! Monotonic uptime clock.
//!
//! Every controller timestamp is seconds since boot from this source.
//! Wall-clock time is deliberately unused: the relay policy only ever
//! compares durations, and uptime survives NTP jumps.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` (µs,
//!   monotonic from boot).
//! - **elsewhere** — `std::time::Instant` anchored at construction.

pub struct UptimeClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since boot.
    #[cfg(target_os = "espidf")]
    pub fn now_secs(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since boot.
    #[cfg(not(target_os = "espidf"))]
    pub fn now_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}
