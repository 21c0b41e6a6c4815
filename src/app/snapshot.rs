//! Read-only state projection for the web layer.
//!
//! The dashboard and the `/data` endpoint consume exactly this shape:
//!
//! ```json
//! {"temp0":"61.2","temp1":"18.4","temp2":"22.0","relstate":"AN","keepalive":57}
//! ```
//!
//! Temperatures are pre-formatted strings with one fractional digit;
//! a faulted probe shows the legacy placeholder `"00.00"`. The
//! snapshot is taken between control ticks, so it is always a
//! consistent view — never a half-applied transition.

use serde::Serialize;

use crate::sensors::temperature::TemperatureSample;

/// Legacy display placeholder for a probe that could not be read.
pub const FAULT_DISPLAY: &str = "00.00";

/// One consistent view of the controller for external consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub temp0: String,
    pub temp1: String,
    pub temp2: String,
    /// `"AN"` (on) or `"AUS"` (off).
    pub relstate: &'static str,
    /// Whole minutes until the next keepalive run; negative when
    /// overdue (the dashboard clamps to zero).
    pub keepalive: i64,
}

impl StateSnapshot {
    /// Formatted value for a single channel (`/temperature<n>`).
    pub fn temperature(&self, channel: usize) -> &str {
        match channel {
            0 => &self.temp0,
            1 => &self.temp1,
            _ => &self.temp2,
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of a struct of strings and an i64 cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Render one sample the way the dashboard shows it.
pub fn format_temperature(sample: &TemperatureSample) -> String {
    if sample.valid {
        format!("{:.1}", sample.celsius)
    } else {
        FAULT_DISPLAY.to_string()
    }
}
