//! Sensor subsystem.
//!
//! One DS18B20 one-wire bus carries all three temperature probes;
//! [`temperature::TemperatureSampler`] turns raw bus readings into
//! validated, rounded samples for the controller.

pub mod temperature;

/// Number of temperature channels on the bus.
/// Channel 0 is the governing (water) sensor; 1 = outdoor, 2 = indoor.
pub const SENSOR_CHANNELS: usize = 3;
