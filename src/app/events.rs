//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits
//! these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them — today
//! that is the serial log.

use crate::control::relay::RelayState;
use crate::sensors::temperature::TemperatureSample;
use crate::sensors::SENSOR_CHANNELS;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// The service has started (carries the boot relay state).
    Started(RelayState),

    /// The relay changed state or activation reason.
    RelayChanged { from: RelayState, to: RelayState },

    /// A scheduled anti-seize run began.
    KeepaliveStarted,

    /// The anti-seize run completed (or was cancelled).
    KeepaliveFinished,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry record suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub relay: RelayState,
    pub temps: [TemperatureSample; SENSOR_CHANNELS],
    /// Minutes until the next keepalive run (negative when overdue).
    pub keepalive_minutes: i64,
}
