//! Keepalive (anti-seize) schedule bookkeeping.
//!
//! A pump that sits idle for weeks can seize. Whenever the relay has
//! been off for a full idle interval, the controller runs it briefly.
//! This module owns only the timer arithmetic for that cycle:
//!
//! ```text
//! relay OFF at T ──▶ arm_next(T): due = T + interval
//!                          │
//!            due reached, relay still off
//!                          ▼
//!        controller starts keepalive run, mark_in_progress()
//!                          │
//!              run finished → relay OFF again
//!                          ▼
//!                 arm_next(now), flag cleared
//! ```
//!
//! The scheduler holds no temperature or relay knowledge; the
//! controller decides *whether* to act on `is_due`, the scheduler only
//! answers *when*. All timestamps are seconds of monotonic uptime.

use log::info;

/// Anti-seize cycle schedule.
#[derive(Debug, Clone, Copy)]
pub struct KeepAliveScheduler {
    /// Uptime second at which the next cycle is due.
    due_at: u64,
    /// Idle interval between cycles (seconds).
    interval_secs: u64,
    /// True while a keepalive run is holding the relay on.
    in_progress: bool,
}

impl KeepAliveScheduler {
    /// Create a schedule with the first cycle due one full interval
    /// after `now` (boot time).
    pub fn new(now: u64, interval_secs: u64) -> Self {
        Self {
            due_at: now + interval_secs,
            interval_secs,
            in_progress: false,
        }
    }

    /// Whether the next cycle is due at `now`.
    pub fn is_due(&self, now: u64) -> bool {
        now >= self.due_at
    }

    /// Re-arm for one interval from `now` and clear the in-progress
    /// flag. Called on every relay OFF transition — never while the
    /// relay is still on.
    pub fn arm_next(&mut self, now: u64) {
        self.due_at = now + self.interval_secs;
        self.in_progress = false;
        info!("Keepalive: next run armed for t+{}s", self.interval_secs);
    }

    /// Flag that a keepalive run has started.
    pub fn mark_in_progress(&mut self) {
        self.in_progress = true;
    }

    /// Clear the in-progress flag without re-arming.
    pub fn clear_in_progress(&mut self) {
        self.in_progress = false;
    }

    /// True while a keepalive run is holding the relay on.
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Uptime second of the next due cycle.
    pub fn due_at(&self) -> u64 {
        self.due_at
    }

    /// Whole minutes until the next cycle (floor division). Negative
    /// when overdue — display layers clamp to zero.
    pub fn minutes_until(&self, now: u64) -> i64 {
        (self.due_at as i64 - now as i64).div_euclid(60)
    }
}
