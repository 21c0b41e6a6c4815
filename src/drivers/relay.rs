//! Pump relay coil driver.
//!
//! A dumb actuator over one GPIO line: energise, release, report the
//! line state. All timing (run limits, keepalive windows) lives in the
//! controller — this driver holds no clocks.
//!
//! The board wires the relay module active-low: line LOW energises the
//! coil. The driver hides that inversion behind [`RelayDriver::energize`]
//! / [`RelayDriver::de_energize`], both of which are idempotent —
//! re-asserting the current state is a no-op, never an error.
//!
//! Generic over [`embedded_hal::digital::OutputPin`] so the same code
//! drives the real ESP-IDF pin in production and [`SimPin`] in tests.

use embedded_hal::digital::OutputPin;
use log::info;

/// Logical coil state, independent of the active-low wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayLine {
    Energized,
    Released,
}

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    line: RelayLine,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Wrap a configured output pin. The coil is released immediately
    /// so the boot state of the line is always known-safe.
    pub fn new(mut pin: P) -> Self {
        // Active-low: HIGH = released.
        let _ = pin.set_high();
        Self {
            pin,
            line: RelayLine::Released,
        }
    }

    /// Close the relay (pump on). No-op when already energised.
    pub fn energize(&mut self) {
        if self.line == RelayLine::Energized {
            return;
        }
        if self.pin.set_low().is_err() {
            // GPIO writes on a configured pin cannot fail on this
            // platform; log and keep the last known line state.
            log::error!("Relay: energize write failed");
            return;
        }
        self.line = RelayLine::Energized;
        info!("Relay: coil energized (line LOW)");
    }

    /// Open the relay (pump off). No-op when already released.
    pub fn de_energize(&mut self) {
        if self.line == RelayLine::Released {
            return;
        }
        if self.pin.set_high().is_err() {
            log::error!("Relay: de-energize write failed");
            return;
        }
        self.line = RelayLine::Released;
        info!("Relay: coil released (line HIGH)");
    }

    pub fn line(&self) -> RelayLine {
        self.line
    }

    pub fn is_energized(&self) -> bool {
        self.line == RelayLine::Energized
    }
}

// ── Host-side simulated pin ───────────────────────────────────

/// In-memory pin for host builds and tests. Records the electrical
/// level so tests can assert on the actual line, inversion included.
#[derive(Debug, Default)]
pub struct SimPin {
    /// Electrical level: true = HIGH.
    pub level_high: bool,
}

impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level_high = true;
        Ok(())
    }
}
