//! DS18B20 temperature sampling and validation.
//!
//! The bus driver hands back one raw °C value per channel, using the
//! DS18B20 convention of `-127.0` for a probe that could not be read.
//! The sampler normalises that into [`TemperatureSample`]s: a fault
//! becomes an *invalid* sample pinned to 0.0 °C, a good reading is
//! rounded half-up to one decimal. Downstream logic must check
//! `valid`, never the magnitude — an unplugged probe is data here,
//! not an error, so a dead sensor can never stall the relay logic.

use log::warn;

use crate::app::ports::SensorBusPort;
use crate::sensors::SENSOR_CHANNELS;

/// Bus value reported when a probe cannot be read.
pub const FAULT_SENTINEL_C: f32 = -127.0;

/// One validated reading from one probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    /// Bus channel index (0 = governing/water sensor).
    pub channel: u8,
    /// Temperature in °C, rounded to one decimal. Fixed at 0.0 when
    /// the sample is invalid.
    pub celsius: f32,
    /// False when the bus returned the fault sentinel.
    pub valid: bool,
}

impl TemperatureSample {
    /// An invalid placeholder sample (used before the first poll).
    pub fn invalid(channel: u8) -> Self {
        Self {
            channel,
            celsius: 0.0,
            valid: false,
        }
    }
}

/// Round to the nearest 0.1 °C, half-up (23.45 → 23.5, -5.25 → -5.2).
pub fn round_to_tenth(celsius: f32) -> f32 {
    (celsius * 10.0 + 0.5).floor() / 10.0
}

/// Polls the three probes and normalises their readings.
pub struct TemperatureSampler {
    /// Edge-triggered fault logging: one line per fault onset, not one
    /// per poll.
    faulted: [bool; SENSOR_CHANNELS],
}

impl TemperatureSampler {
    pub fn new() -> Self {
        Self {
            faulted: [false; SENSOR_CHANNELS],
        }
    }

    /// Read every channel. Never fails: fault readings come back as
    /// invalid samples.
    pub fn poll(&mut self, bus: &mut impl SensorBusPort) -> [TemperatureSample; SENSOR_CHANNELS] {
        core::array::from_fn(|i| self.poll_channel(bus, i))
    }

    fn poll_channel(&mut self, bus: &mut impl SensorBusPort, channel: usize) -> TemperatureSample {
        let raw = bus.read_channel(channel);

        if raw == FAULT_SENTINEL_C {
            if !self.faulted[channel] {
                warn!("Temperature: probe {} not responding", channel);
                self.faulted[channel] = true;
            }
            return TemperatureSample::invalid(channel as u8);
        }

        if self.faulted[channel] {
            warn!("Temperature: probe {} recovered", channel);
            self.faulted[channel] = false;
        }

        TemperatureSample {
            channel: channel as u8,
            celsius: round_to_tenth(raw),
            valid: true,
        }
    }
}

impl Default for TemperatureSampler {
    fn default() -> Self {
        Self::new()
    }
}
