//! Mock hardware for integration tests.
//!
//! Records every relay call so tests can assert on the full command
//! history without touching real GPIO registers, and serves scripted
//! temperatures without a one-wire bus.

use pumpwerk::app::events::ControlEvent;
use pumpwerk::app::ports::{EventSink, RelayPort, SensorBusPort};
use pumpwerk::sensors::temperature::FAULT_SENTINEL_C;
use pumpwerk::sensors::SENSOR_CHANNELS;

// ── Relay call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCall {
    Energize,
    DeEnergize,
}

pub struct MockRelay {
    pub calls: Vec<RelayCall>,
    energized: bool,
}

#[allow(dead_code)]
impl MockRelay {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            energized: false,
        }
    }

    pub fn last_call(&self) -> Option<RelayCall> {
        self.calls.last().copied()
    }
}

impl Default for MockRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPort for MockRelay {
    fn energize(&mut self) {
        self.calls.push(RelayCall::Energize);
        self.energized = true;
    }

    fn de_energize(&mut self) {
        self.calls.push(RelayCall::DeEnergize);
        self.energized = false;
    }

    fn is_energized(&self) -> bool {
        self.energized
    }
}

// ── Scripted sensor bus ───────────────────────────────────────

/// Bus whose per-channel readings the test sets directly.
pub struct ScriptedBus {
    pub temps: [f32; SENSOR_CHANNELS],
}

#[allow(dead_code)]
impl ScriptedBus {
    /// All probes answering with benign room temperatures.
    pub fn idle() -> Self {
        Self {
            temps: [20.0, 10.0, 21.0],
        }
    }

    /// Every probe dead.
    pub fn all_faulted() -> Self {
        Self {
            temps: [FAULT_SENTINEL_C; SENSOR_CHANNELS],
        }
    }

    pub fn set_water(&mut self, celsius: f32) {
        self.temps[0] = celsius;
    }

    pub fn fault_water(&mut self) {
        self.temps[0] = FAULT_SENTINEL_C;
    }
}

impl SensorBusPort for ScriptedBus {
    fn read_channel(&mut self, channel: usize) -> f32 {
        self.temps[channel]
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(format!("{:?}", event));
    }
}
