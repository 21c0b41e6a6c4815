//! Web dashboard and control endpoints.
//!
//! Thin transport over the core: every route either reads the published
//! [`StateSnapshot`] or drops one [`ManualCommand`] into the mailbox.
//! No relay decision is ever made here.
//!
//! | route              | effect                                   |
//! |--------------------|------------------------------------------|
//! | `/`                | HTML dashboard                           |
//! | `/data`            | snapshot JSON                            |
//! | `/temperature0..2` | single formatted channel value           |
//! | `/relais_on`       | post `TurnOn`, respond `"AN"`            |
//! | `/relais_off`      | post `TurnOff`, respond `"AUS"`          |
//! | `/relais_toggle`   | post `Toggle`, redirect to `/`           |
//! | `/relais_state`    | current relay label                      |
//!
//! Route parsing and rendering are pure functions tested on the host;
//! only the `EspHttpServer` wiring is ESP-IDF-specific. Unknown routes
//! and malformed command verbs are rejected right here with a 404 and
//! never reach the controller.

use core::fmt;

use crate::app::commands::ManualCommand;
use crate::app::snapshot::StateSnapshot;
use crate::sensors::SENSOR_CHANNELS;

// ───────────────────────────────────────────────────────────────
// Shared snapshot cell
// ───────────────────────────────────────────────────────────────

/// Snapshot cell shared between the control loop (writer, once per
/// tick) and the HTTP handlers (readers). The lock is held only for
/// the clone/replace, so the control tick never blocks on a slow
/// client.
pub type SharedSnapshot = std::sync::Arc<std::sync::Mutex<StateSnapshot>>;

/// Fresh cell with the boot-state placeholder values.
pub fn shared_snapshot() -> SharedSnapshot {
    std::sync::Arc::new(std::sync::Mutex::new(StateSnapshot {
        temp0: crate::app::snapshot::FAULT_DISPLAY.to_string(),
        temp1: crate::app::snapshot::FAULT_DISPLAY.to_string(),
        temp2: crate::app::snapshot::FAULT_DISPLAY.to_string(),
        relstate: "AUS",
        keepalive: 0,
    }))
}

/// Publish a new snapshot (called by the main loop after each tick).
pub fn publish(cell: &SharedSnapshot, snapshot: StateSnapshot) {
    if let Ok(mut guard) = cell.lock() {
        *guard = snapshot;
    }
}

/// Read the current snapshot (called by HTTP handlers).
pub fn current(cell: &SharedSnapshot) -> StateSnapshot {
    cell.lock().map(|guard| guard.clone()).unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

// ───────────────────────────────────────────────────────────────
// Routes
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Data,
    Temperature(usize),
    RelayCommand(ManualCommand),
    RelayState,
}

/// Request for a path this server does not serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteError;

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not found")
    }
}

/// Map a request path onto a [`Route`].
pub fn parse_route(path: &str) -> Result<Route, RouteError> {
    match path {
        "/" => return Ok(Route::Index),
        "/data" => return Ok(Route::Data),
        "/relais_state" => return Ok(Route::RelayState),
        _ => {}
    }

    if let Some(verb) = path.strip_prefix("/relais_") {
        let cmd = ManualCommand::parse(verb).map_err(|_| RouteError)?;
        return Ok(Route::RelayCommand(cmd));
    }

    if let Some(digit) = path.strip_prefix("/temperature") {
        let channel: usize = digit.parse().map_err(|_| RouteError)?;
        if channel < SENSOR_CHANNELS {
            return Ok(Route::Temperature(channel));
        }
    }

    Err(RouteError)
}

// ───────────────────────────────────────────────────────────────
// Responses
// ───────────────────────────────────────────────────────────────

/// What a command route answers with, before the command has even been
/// ticked in: the label of the commanded target state, or a redirect
/// back to the dashboard for the toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResponse {
    Label(&'static str),
    RedirectHome,
}

pub fn command_response(cmd: ManualCommand) -> CommandResponse {
    match cmd {
        ManualCommand::TurnOn => CommandResponse::Label("AN"),
        ManualCommand::TurnOff => CommandResponse::Label("AUS"),
        ManualCommand::Toggle => CommandResponse::RedirectHome,
    }
}

/// The dashboard page, adapted from the legacy controller UI. Static:
/// all live values arrive via the 10 s `/data` refresh.
pub const INDEX_HTML: &str = r#"<!DOCTYPE HTML><html>
<head>
  <meta name="viewport" content="width=device-width, initial-scale=1" charset="utf-8">
  <style>
    html { font-family: Arial; display: inline-block; margin: 0px auto; text-align: center; }
    h2 { font-size: 1.5rem; }
    p { font-size: 1.5rem; }
    .units { font-size: 1.2rem; }
    .btn { padding: 10px 10px; cursor: pointer; }
    .btn:hover { background-color: rgba(167, 169, 173, 0.185); }
  </style>
</head>
<body onload="requestData()">
  <h2 id="time">Datum und Uhrzeit</h2>
  <p><span>Wasser</span> <span id="temperature0">--</span><sup class="units">&deg;C</sup></p>
  <p><span>Aussen</span> <span id="temperature1">--</span><sup class="units">&deg;C</sup></p>
  <p><span>Innen</span> <span id="temperature2">--</span><sup class="units">&deg;C</sup></p>
  <p>
    <button id="relbtn" class="btn" onClick="location.href='/relais_toggle'">Pumpe</button>
    <span id="relstate">--</span>
  </p>
  <p id="pKeep">
    <span>Erhaltungslauf in</span>
    <span id="keepalive">--</span>
    <span>Min</span>
  </p>
</body>
<script>
setInterval(function () {requestData()}, 10000);
setInterval(function () {setDate()}, 1000);

function requestData(){
  var xhttp = new XMLHttpRequest();
  xhttp.onreadystatechange = function() {
    if (this.readyState == 4 && this.status == 200) {
      var data = JSON.parse(this.responseText);
      document.getElementById("temperature0").innerHTML = data.temp0;
      document.getElementById("temperature1").innerHTML = data.temp1;
      document.getElementById("temperature2").innerHTML = data.temp2;
      document.getElementById("relstate").innerHTML = data.relstate;
      document.getElementById("keepalive").innerHTML = Math.max(0, data.keepalive);
      document.getElementById("pKeep").style.visibility =
        data.relstate === "AN" ? "hidden" : "visible";
    }
  };
  xhttp.open("GET", "/data", true);
  xhttp.send();
}
function setDate(){
  document.getElementById('time').innerHTML = new Date().toLocaleString('de-DE');
}
setDate();
</script>
</html>"#;

// ───────────────────────────────────────────────────────────────
// ESP-IDF server wiring
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub mod server {
    use anyhow::Result;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::http::Method;
    use esp_idf_svc::io::Write;
    use log::info;

    use super::{
        command_response, current, parse_route, CommandResponse, Route, SharedSnapshot, INDEX_HTML,
    };
    use crate::events;

    /// Bring up the web server and register every route. The returned
    /// handle must stay alive for the lifetime of the loop.
    pub fn start(snapshot: SharedSnapshot) -> Result<EspHttpServer<'static>> {
        let mut server = EspHttpServer::new(&Configuration::default())?;

        for path in [
            "/",
            "/data",
            "/temperature0",
            "/temperature1",
            "/temperature2",
            "/relais_on",
            "/relais_off",
            "/relais_toggle",
            "/relais_state",
        ] {
            let cell = snapshot.clone();
            server.fn_handler::<anyhow::Error, _>(path, Method::Get, move |req| {
                match parse_route(req.uri()) {
                    Ok(Route::Index) => {
                        req.into_ok_response()?.write_all(INDEX_HTML.as_bytes())?;
                    }
                    Ok(Route::Data) => {
                        let body = current(&cell).to_json();
                        req.into_ok_response()?.write_all(body.as_bytes())?;
                    }
                    Ok(Route::Temperature(ch)) => {
                        let snap = current(&cell);
                        req.into_ok_response()?
                            .write_all(snap.temperature(ch).as_bytes())?;
                    }
                    Ok(Route::RelayState) => {
                        let snap = current(&cell);
                        req.into_ok_response()?.write_all(snap.relstate.as_bytes())?;
                    }
                    Ok(Route::RelayCommand(cmd)) => {
                        events::post_manual_command(cmd);
                        match command_response(cmd) {
                            CommandResponse::Label(label) => {
                                req.into_ok_response()?.write_all(label.as_bytes())?;
                            }
                            CommandResponse::RedirectHome => {
                                req.into_response(302, None, &[("Location", "/")])?;
                            }
                        }
                    }
                    Err(_) => {
                        req.into_response(404, None, &[])?.write_all(b"not found")?;
                    }
                }
                Ok(())
            })?;
        }

        info!("HTTP: server up on port 80");
        Ok(server)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_served_routes() {
        assert_eq!(parse_route("/"), Ok(Route::Index));
        assert_eq!(parse_route("/data"), Ok(Route::Data));
        assert_eq!(parse_route("/temperature0"), Ok(Route::Temperature(0)));
        assert_eq!(parse_route("/temperature2"), Ok(Route::Temperature(2)));
        assert_eq!(
            parse_route("/relais_on"),
            Ok(Route::RelayCommand(ManualCommand::TurnOn))
        );
        assert_eq!(
            parse_route("/relais_off"),
            Ok(Route::RelayCommand(ManualCommand::TurnOff))
        );
        assert_eq!(
            parse_route("/relais_toggle"),
            Ok(Route::RelayCommand(ManualCommand::Toggle))
        );
        assert_eq!(parse_route("/relais_state"), Ok(Route::RelayState));
    }

    #[test]
    fn rejects_unknown_routes_and_bad_commands() {
        assert!(parse_route("/reboot").is_err());
        assert!(parse_route("/relais_explode").is_err());
        assert!(parse_route("/relais_").is_err());
        assert!(parse_route("/temperature3").is_err());
        assert!(parse_route("/temperature").is_err());
        assert!(parse_route("").is_err());
    }

    #[test]
    fn command_responses_match_legacy_behavior() {
        assert_eq!(
            command_response(ManualCommand::TurnOn),
            CommandResponse::Label("AN")
        );
        assert_eq!(
            command_response(ManualCommand::TurnOff),
            CommandResponse::Label("AUS")
        );
        assert_eq!(
            command_response(ManualCommand::Toggle),
            CommandResponse::RedirectHome
        );
    }

    #[test]
    fn publish_and_read_shared_snapshot() {
        let cell = shared_snapshot();
        assert_eq!(current(&cell).relstate, "AUS");

        let mut snap = current(&cell);
        snap.relstate = "AN";
        snap.temp0 = "61.2".into();
        publish(&cell, snap);

        let read = current(&cell);
        assert_eq!(read.relstate, "AN");
        assert_eq!(read.temp0, "61.2");
    }

    #[test]
    fn dashboard_references_every_live_field() {
        for id in ["temperature0", "temperature1", "temperature2", "relstate", "keepalive"] {
            assert!(INDEX_HTML.contains(id), "dashboard missing '{}'", id);
        }
        assert!(INDEX_HTML.contains("/relais_toggle"));
        assert!(INDEX_HTML.contains("/data"));
    }
}
