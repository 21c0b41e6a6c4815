//! Hardware adapter — bridges the real peripherals to the port traits.
//!
//! Owns the one-wire bus and the relay driver, exposing them through
//! [`SensorBusPort`] and [`RelayPort`]. This is the only module that
//! combines actual hardware handles; generic over the relay pin so the
//! same adapter runs on the ESP-IDF pin and the simulated one.

use embedded_hal::digital::OutputPin;

use crate::adapters::onewire::OneWireBusAdapter;
use crate::app::ports::{RelayPort, SensorBusPort};
use crate::drivers::relay::RelayDriver;

/// Concrete adapter combining all hardware behind the port boundary.
pub struct HardwareAdapter<P: OutputPin> {
    bus: OneWireBusAdapter,
    relay: RelayDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(bus: OneWireBusAdapter, relay: RelayDriver<P>) -> Self {
        Self { bus, relay }
    }
}

// ── SensorBusPort implementation ──────────────────────────────

impl<P: OutputPin> SensorBusPort for HardwareAdapter<P> {
    fn read_channel(&mut self, channel: usize) -> f32 {
        self.bus.read_channel(channel)
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<P: OutputPin> RelayPort for HardwareAdapter<P> {
    fn energize(&mut self) {
        self.relay.energize();
    }

    fn de_energize(&mut self) {
        self.relay.de_energize();
    }

    fn is_energized(&self) -> bool {
        self.relay.is_energized()
    }
}
