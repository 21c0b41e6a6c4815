//! Tests of the web boundary: route parsing, the command mailbox, and
//! the snapshot cell — the full path a browser request takes short of
//! the actual socket.

use crate::mock_hw::{MockRelay, RecordingSink, ScriptedBus};

use pumpwerk::adapters::http::{
    command_response, current, parse_route, publish, shared_snapshot, CommandResponse, Route,
};
use pumpwerk::app::commands::ManualCommand;
use pumpwerk::app::ports::RelayPort;
use pumpwerk::app::service::ControllerService;
use pumpwerk::config::SystemConfig;
use pumpwerk::control::relay::RelayState;
use pumpwerk::events;

/// One test for the whole mailbox flow: the mailbox is a process-wide
/// static, so splitting this across parallel test threads would race.
#[test]
fn browser_toggle_reaches_the_relay_next_tick() {
    let config = SystemConfig::default();
    let mut service = ControllerService::new(&config, 0);
    let mut bus = ScriptedBus::idle();
    let mut relay = MockRelay::new();
    let mut sink = RecordingSink::new();

    // GET /relais_toggle arrives on the server task.
    let route = parse_route("/relais_toggle").unwrap();
    let Route::RelayCommand(cmd) = route else {
        panic!("toggle must parse as a relay command");
    };
    assert_eq!(command_response(cmd), CommandResponse::RedirectHome);
    events::post_manual_command(cmd);

    // Next control tick consumes it.
    service.poll_sensors(&mut bus);
    let command = events::take_manual_command();
    service.tick(1, command, &mut relay, &mut sink);
    assert!(service.state().is_on());
    assert!(relay.is_energized());

    // The mailbox is one-shot: the following tick sees nothing.
    assert_eq!(events::take_manual_command(), None);
    service.tick(2, None, &mut relay, &mut sink);
    assert!(service.state().is_on());

    // GET /relais_off, then two commands racing within one tick:
    // the operator's latest press wins.
    events::post_manual_command(ManualCommand::TurnOn);
    events::post_manual_command(ManualCommand::TurnOff);
    let command = events::take_manual_command();
    service.tick(3, command, &mut relay, &mut sink);
    assert_eq!(service.state(), RelayState::Off);
}

#[test]
fn snapshot_cell_serves_what_the_loop_published() {
    let config = SystemConfig::default();
    let mut service = ControllerService::new(&config, 0);
    let mut bus = ScriptedBus::idle();
    bus.temps = [61.2, 18.4, 22.0];
    let mut relay = MockRelay::new();
    let mut sink = RecordingSink::new();

    let cell = shared_snapshot();
    assert_eq!(current(&cell).relstate, "AUS");

    service.poll_sensors(&mut bus);
    service.tick(10, None, &mut relay, &mut sink);
    publish(&cell, service.snapshot(10));

    // What a handler for GET /data would serialize:
    let snap = current(&cell);
    assert_eq!(snap.temp0, "61.2");
    assert_eq!(snap.relstate, "AN");
    assert_eq!(
        snap.to_json(),
        r#"{"temp0":"61.2","temp1":"18.4","temp2":"22.0","relstate":"AN","keepalive":59}"#
    );

    // And for GET /temperature1:
    assert_eq!(snap.temperature(1), "18.4");
}

#[test]
fn unknown_paths_never_become_commands() {
    for path in ["/relais_boom", "/relais_ON", "/temperature9", "/admin"] {
        assert!(parse_route(path).is_err(), "{} must be rejected", path);
    }
}
