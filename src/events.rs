//! Tick/event plumbing between timers, the web layer, and the main loop.
//!
//! Two channels feed the single-threaded control loop:
//!
//! - a lock-free SPSC ring buffer of [`Event`] ticks, produced by timer
//!   callbacks (or the host-side sleep loop) and consumed by `main`;
//! - a one-shot manual-command mailbox, written by the HTTP handlers
//!   and drained exactly once per control tick.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer ISR    │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Host sleep   │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────┬───────┘
//! ┌──────────────┐     ┌──────────────┐            │
//! │ HTTP handler │────▶│Command mailbox│──── once per tick
//! └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::commands::ManualCommand;

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// Loop wake-up causes, ordered by rough priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Control state-machine tick (1 Hz).
    ControlTick = 0,
    /// Sensor poll timer fired (every 10 s).
    SensorPollTick = 1,
    /// Telemetry report timer fired.
    TelemetryTick = 2,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Timer callbacks write (produce), main loop reads (consume).
// Atomic head/tail indices; the buffer lives in a static so ISR
// callbacks can reach it without a handle.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: single producer (timer task), single consumer (main loop);
// the acquire/release pairs on head/tail serialise every slot access.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: only the single producer writes this slot, and the
    // consumer cannot read it until the Release store below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

// ── Manual-command mailbox ────────────────────────────────────
//
// The web layer runs on the HTTP server task; the control loop must
// see at most one command per tick, consumed entirely within that
// tick. A single atomic slot gives exactly that: handlers overwrite
// (latest wins), the tick takes-and-clears.

const CMD_NONE: u8 = 0;

static PENDING_COMMAND: AtomicU8 = AtomicU8::new(CMD_NONE);

/// Post a manual relay command for the next control tick.
/// A command already pending is replaced — the operator's latest
/// press wins.
pub fn post_manual_command(cmd: ManualCommand) {
    PENDING_COMMAND.store(cmd.tag(), Ordering::Release);
}

/// Take the pending manual command, clearing the mailbox.
/// Called once per control tick by the main loop.
pub fn take_manual_command() -> Option<ManualCommand> {
    let raw = PENDING_COMMAND.swap(CMD_NONE, Ordering::AcqRel);
    ManualCommand::from_tag(raw)
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::ControlTick),
        1 => Some(Event::SensorPollTick),
        2 => Some(Event::TelemetryTick),
        _ => None,
    }
}
