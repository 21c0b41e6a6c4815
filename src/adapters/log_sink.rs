//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured control events to
//! the logger (UART / USB-CDC in production). Any future transport
//! (MQTT, and so on) would implement the same trait.

use log::info;

use crate::app::events::ControlEvent;
use crate::app::ports::EventSink;
use crate::app::snapshot::format_temperature;
use crate::control::relay::RelayState;

/// Adapter that logs every [`ControlEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Telemetry(t) => {
                info!(
                    "TELEM | relay={} | water={} aussen={} innen={} \u{00b0}C | keepalive in {} min",
                    t.relay.label(),
                    format_temperature(&t.temps[0]),
                    format_temperature(&t.temps[1]),
                    format_temperature(&t.temps[2]),
                    t.keepalive_minutes,
                );
            }
            ControlEvent::RelayChanged { from, to } => {
                info!("RELAY | {} -> {}", describe(from), describe(to));
            }
            ControlEvent::KeepaliveStarted => {
                info!("KEEPALIVE | run started");
            }
            ControlEvent::KeepaliveFinished => {
                info!("KEEPALIVE | run finished");
            }
            ControlEvent::Started(state) => {
                info!("START | relay={}", state.label());
            }
        }
    }
}

fn describe(state: &RelayState) -> String {
    match state {
        RelayState::Off => "AUS".to_string(),
        RelayState::On { reason, .. } => format!("AN ({:?})", reason),
    }
}
