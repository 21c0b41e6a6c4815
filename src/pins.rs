//! GPIO pin assignments for the pump controller board.

/// DS18B20 one-wire data line (three sensors share the bus).
pub const ONE_WIRE_GPIO: i32 = 15;

/// Pump relay coil output. Active-low: driving the line LOW energises
/// the relay and starts the pump.
pub const RELAY_GPIO: i32 = 23;
