//! End-to-end tests of the service → controller → relay pipeline,
//! driven through the same ports the firmware uses.

use crate::mock_hw::{MockRelay, RecordingSink, RelayCall, ScriptedBus};

use pumpwerk::app::commands::ManualCommand;
use pumpwerk::app::service::ControllerService;
use pumpwerk::config::SystemConfig;
use pumpwerk::control::relay::{OnReason, RelayState};

struct Rig {
    service: ControllerService,
    bus: ScriptedBus,
    relay: MockRelay,
    sink: RecordingSink,
}

impl Rig {
    fn boot() -> Self {
        Self::boot_at(0)
    }

    fn boot_at(boot_now: u64) -> Self {
        let config = SystemConfig::default();
        let mut service = ControllerService::new(&config, boot_now);
        let mut sink = RecordingSink::new();
        service.start(&mut sink);
        Self {
            service,
            bus: ScriptedBus::idle(),
            relay: MockRelay::new(),
            sink,
        }
    }

    /// Poll + tick, the order the main loop uses.
    fn step(&mut self, now: u64, command: Option<ManualCommand>) {
        self.service.poll_sensors(&mut self.bus);
        self.service.tick(now, command, &mut self.relay, &mut self.sink);
    }

    fn reason(&self) -> Option<OnReason> {
        match self.service.state() {
            RelayState::On { reason, .. } => Some(reason),
            RelayState::Off => None,
        }
    }
}

// ── Boot defaults ─────────────────────────────────────────────

#[test]
fn boot_state_is_off_with_keepalive_armed() {
    let rig = Rig::boot();
    assert_eq!(rig.service.state(), RelayState::Off);
    assert_eq!(rig.service.keepalive_due_at(), 3600);
    assert!(rig.sink.contains("Started"));
}

// ── The full day-in-the-life scenario ─────────────────────────

#[test]
fn keepalive_then_thermal_scenario() {
    let mut rig = Rig::boot();

    // Idle until the keepalive is due: nothing happens.
    rig.step(3599, None);
    assert_eq!(rig.service.state(), RelayState::Off);
    assert!(rig.relay.calls.is_empty());

    // t=3600: keepalive run starts.
    rig.step(3600, None);
    assert_eq!(rig.reason(), Some(OnReason::Keepalive));
    assert_eq!(rig.relay.last_call(), Some(RelayCall::Energize));
    assert!(rig.sink.contains("KeepaliveStarted"));

    // t=3630: run over, relay off, schedule re-armed from the OFF time.
    rig.step(3630, None);
    assert_eq!(rig.service.state(), RelayState::Off);
    assert_eq!(rig.relay.last_call(), Some(RelayCall::DeEnergize));
    assert_eq!(rig.service.keepalive_due_at(), 3630 + 3600);
    assert!(rig.sink.contains("KeepaliveFinished"));

    // t=7300: water jumps to 60 °C — thermal activation wins over the
    // (also due) keepalive.
    rig.bus.set_water(60.0);
    rig.step(7300, None);
    assert_eq!(rig.reason(), Some(OnReason::AutoThermal));

    // Hot all the way to t=10900: stays on past the 3600 s mark.
    for now in (7400..=10900).step_by(100) {
        rig.step(now, None);
        assert!(rig.service.state().is_on(), "must stay on at t={}", now);
    }

    // t=10901: water back at 40 °C, 3601 s since activation — off.
    rig.bus.set_water(40.0);
    rig.step(10901, None);
    assert_eq!(rig.service.state(), RelayState::Off);
    assert_eq!(rig.relay.last_call(), Some(RelayCall::DeEnergize));
    assert_eq!(rig.service.keepalive_due_at(), 10901 + 3600);
}

// ── Manual command behavior ───────────────────────────────────

#[test]
fn turn_off_cancels_keepalive_and_rearms() {
    let mut rig = Rig::boot();
    rig.step(3600, None);
    assert_eq!(rig.reason(), Some(OnReason::Keepalive));

    rig.step(3610, Some(ManualCommand::TurnOff));
    assert_eq!(rig.service.state(), RelayState::Off);
    assert_eq!(rig.relay.last_call(), Some(RelayCall::DeEnergize));
    assert_eq!(rig.service.keepalive_due_at(), 3610 + 3600);
    assert!(rig.sink.contains("KeepaliveFinished"));
}

#[test]
fn manual_activation_expires_after_an_hour() {
    let mut rig = Rig::boot();
    rig.step(100, Some(ManualCommand::TurnOn));
    assert_eq!(rig.reason(), Some(OnReason::Manual));

    rig.step(3699, None);
    assert!(rig.service.state().is_on(), "must not expire early");

    rig.step(3700, None);
    assert_eq!(rig.service.state(), RelayState::Off);
}

#[test]
fn toggle_round_trip_through_the_service() {
    let mut rig = Rig::boot();

    rig.step(10, Some(ManualCommand::Toggle));
    assert_eq!(rig.reason(), Some(OnReason::Manual));

    rig.step(20, Some(ManualCommand::Toggle));
    assert_eq!(rig.service.state(), RelayState::Off);
}

// ── Sensor fault behavior ─────────────────────────────────────

#[test]
fn dead_governing_probe_never_triggers_thermal() {
    let mut rig = Rig::boot();
    rig.bus.fault_water();

    for now in 1..600 {
        rig.step(now, None);
    }
    assert_eq!(rig.service.state(), RelayState::Off);
    assert!(rig.relay.calls.is_empty());
}

#[test]
fn dead_probe_still_honours_manual_timeout() {
    let mut rig = Rig::boot_at(0);
    rig.bus.fault_water();

    rig.step(0, Some(ManualCommand::TurnOn));
    assert!(rig.service.state().is_on());

    rig.step(3599, None);
    assert!(rig.service.state().is_on());

    rig.step(3600, None);
    assert_eq!(rig.service.state(), RelayState::Off);
}

#[test]
fn keepalive_runs_even_with_dead_probe() {
    let mut rig = Rig::boot();
    rig.bus.fault_water();

    rig.step(3600, None);
    assert_eq!(rig.reason(), Some(OnReason::Keepalive));

    rig.step(3630, None);
    assert_eq!(rig.service.state(), RelayState::Off);
}

// ── Snapshot projection ───────────────────────────────────────

#[test]
fn snapshot_round_trip_formats_all_channels() {
    let mut rig = Rig::boot();
    rig.bus.temps = [61.2, 18.4, 22.0];
    rig.step(10, None);

    let snap = rig.service.snapshot(10);
    assert_eq!(snap.temp0, "61.2");
    assert_eq!(snap.temp1, "18.4");
    assert_eq!(snap.temp2, "22.0");
    assert_eq!(snap.relstate, "AN"); // 61.2 °C water switched it on
    assert_eq!(snap.keepalive, 59);
}

#[test]
fn snapshot_shows_placeholder_for_faulted_channel() {
    let mut rig = Rig::boot();
    rig.bus.temps[1] = pumpwerk::sensors::temperature::FAULT_SENTINEL_C;
    rig.step(10, None);

    let snap = rig.service.snapshot(10);
    assert_eq!(snap.temp1, "00.00");
    assert_eq!(snap.temp0, "20.0");
}

#[test]
fn snapshot_keepalive_goes_negative_when_overdue() {
    let rig = Rig::boot();
    // No ticks: the schedule from boot is still armed for t=3600.
    let snap = rig.service.snapshot(3690);
    assert_eq!(snap.keepalive, -2);
}

#[test]
fn snapshot_json_matches_wire_contract() {
    let mut rig = Rig::boot();
    rig.bus.temps = [24.5, 3.0, 21.9];
    rig.step(60, None);

    let json = rig.service.snapshot(60).to_json();
    assert_eq!(
        json,
        r#"{"temp0":"24.5","temp1":"3.0","temp2":"21.9","relstate":"AUS","keepalive":59}"#
    );
}
