//! Controller service — the hexagonal core.
//!
//! [`ControllerService`] owns the relay state machine, the keepalive
//! schedule, and the latest sensor samples. It exposes a clean,
//! hardware-agnostic API; all I/O flows through port traits injected
//! at call sites, so the whole thing runs on the host with mock
//! adapters.
//!
//! ```text
//!  SensorBusPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                    │      ControllerService       │
//!     RelayPort ◀────│  RelayController · Keepalive │
//!                    └──────────────────────────────┘
//! ```
//!
//! The service is strictly tick-driven and single-threaded: one
//! `tick()` runs to completion before the next input is looked at, and
//! `snapshot()` between ticks always sees a fully applied transition.

use log::info;

use crate::config::SystemConfig;
use crate::control::relay::{OnReason, RelayCommand, RelayController, RelayState};
use crate::scheduler::KeepAliveScheduler;
use crate::sensors::temperature::{TemperatureSample, TemperatureSampler};
use crate::sensors::SENSOR_CHANNELS;

use super::commands::ManualCommand;
use super::events::{ControlEvent, TelemetryData};
use super::ports::{EventSink, RelayPort, SensorBusPort};
use super::snapshot::{format_temperature, StateSnapshot};

/// The application service orchestrating all control logic.
pub struct ControllerService {
    controller: RelayController,
    scheduler: KeepAliveScheduler,
    sampler: TemperatureSampler,
    /// Latest validated samples, refreshed by [`poll_sensors`](Self::poll_sensors).
    samples: [TemperatureSample; SENSOR_CHANNELS],
    tick_count: u64,
}

impl ControllerService {
    /// Construct the service. `boot_now` seeds the keepalive schedule:
    /// the first anti-seize run is due one idle interval after boot.
    pub fn new(config: &SystemConfig, boot_now: u64) -> Self {
        Self {
            controller: RelayController::new(config),
            scheduler: KeepAliveScheduler::new(boot_now, config.keepalive_interval_secs as u64),
            sampler: TemperatureSampler::new(),
            samples: core::array::from_fn(|i| TemperatureSample::invalid(i as u8)),
            tick_count: 0,
        }
    }

    /// Announce the boot state. The relay driver already released the
    /// coil and the schedule is armed — there is nothing to force here.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&ControlEvent::Started(self.controller.state()));
        info!("Controller started, relay {}", self.controller.state().label());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Refresh all temperature samples from the bus (10 s cadence).
    pub fn poll_sensors(&mut self, bus: &mut impl SensorBusPort) {
        self.samples = self.sampler.poll(bus);
    }

    /// Run one control tick: decide, drive the relay, emit events.
    ///
    /// `command` is the at-most-one manual command for this tick
    /// (drained from the mailbox by the caller); it is consumed
    /// entirely here.
    pub fn tick(
        &mut self,
        now: u64,
        command: Option<ManualCommand>,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev = self.controller.state();

        let action = self
            .controller
            .evaluate(now, &self.samples[0], command, &mut self.scheduler);

        match action {
            Some(RelayCommand::Energize) => relay.energize(),
            Some(RelayCommand::DeEnergize) => relay.de_energize(),
            None => {}
        }

        let state = self.controller.state();
        if state != prev {
            sink.emit(&ControlEvent::RelayChanged {
                from: prev,
                to: state,
            });
            if is_keepalive(state) {
                sink.emit(&ControlEvent::KeepaliveStarted);
            } else if is_keepalive(prev) {
                sink.emit(&ControlEvent::KeepaliveFinished);
            }
        }
    }

    /// Emit a telemetry record (60 s cadence).
    pub fn report_telemetry(&self, now: u64, sink: &mut impl EventSink) {
        sink.emit(&ControlEvent::Telemetry(TelemetryData {
            relay: self.controller.state(),
            temps: self.samples,
            keepalive_minutes: self.scheduler.minutes_until(now),
        }));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Consistent read-only projection for the web layer. Call between
    /// ticks only (the main loop publishes it right after `tick`).
    pub fn snapshot(&self, now: u64) -> StateSnapshot {
        StateSnapshot {
            temp0: format_temperature(&self.samples[0]),
            temp1: format_temperature(&self.samples[1]),
            temp2: format_temperature(&self.samples[2]),
            relstate: self.controller.state().label(),
            keepalive: self.scheduler.minutes_until(now),
        }
    }

    /// Current relay state.
    pub fn state(&self) -> RelayState {
        self.controller.state()
    }

    /// Uptime second at which the next keepalive run is due.
    pub fn keepalive_due_at(&self) -> u64 {
        self.scheduler.due_at()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

fn is_keepalive(state: RelayState) -> bool {
    matches!(
        state,
        RelayState::On {
            reason: OnReason::Keepalive,
            ..
        }
    )
}
