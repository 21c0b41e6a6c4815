//! Port traits — the boundary between the control core and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (the one-wire bus, the relay output, event sinks)
//! implement these traits; the service consumes them via generics so
//! the core never touches a GPIO register and the whole decision logic
//! runs on the host under test.

use crate::app::events::ControlEvent;

// ───────────────────────────────────────────────────────────────
// Sensor bus port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw temperature bus access, one reading per probe channel.
///
/// Implementations return °C, or the DS18B20 fault sentinel
/// (`-127.0`) when the probe cannot be read. They never fail harder
/// than that: a dead bus is a sentinel on every channel, not a panic
/// or an `Err` — the sampler turns sentinels into invalid samples.
pub trait SensorBusPort {
    fn read_channel(&mut self, channel: usize) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the pump relay coil. Both calls idempotent.
pub trait RelayPort {
    fn energize(&mut self);
    fn de_energize(&mut self);
    fn is_energized(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`ControlEvent`]s through this port.
/// Adapters decide where they go (serial log today; anything else
/// implements the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &ControlEvent);
}
