//! System configuration parameters
//!
//! All policy constants for the pump controller. There is no runtime
//! configuration UI and no persistence — every boot starts from these
//! defaults (the whole system state is re-derived from sensors and the
//! clock, so the safe boot default is also the only default).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Thermal policy ---
    /// Water temperature (°C, governing sensor) above which the pump
    /// must run and keep running.
    pub thermal_threshold_c: f32,

    // --- Keepalive policy ---
    /// Idle time (seconds) after which the anti-seize cycle is due.
    pub keepalive_interval_secs: u32,
    /// How long (seconds) a keepalive activation keeps the relay on.
    pub keepalive_run_secs: u32,

    // --- Manual / thermal run limit ---
    /// Off-timeout (seconds) for manual and thermal activations once
    /// the water has cooled below the threshold.
    pub manual_run_secs: u32,

    // --- Timing ---
    /// Sensor poll interval (seconds)
    pub sensor_poll_interval_secs: u32,
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Connectivity ---
    /// Consecutive failed WiFi reconnect attempts before the device
    /// restarts itself.
    pub wifi_max_retries: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Thermal
            thermal_threshold_c: 55.0,

            // Keepalive: once per idle hour, 30 s run
            keepalive_interval_secs: 3600,
            keepalive_run_secs: 30,

            // Manual / thermal off-timeout: one hour
            manual_run_secs: 3600,

            // Timing
            sensor_poll_interval_secs: 10,
            control_loop_interval_ms: 1000, // 1 Hz
            telemetry_interval_secs: 60,    // 1/min

            // Connectivity
            wifi_max_retries: 5,
        }
    }
}
