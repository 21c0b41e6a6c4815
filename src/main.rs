//! Pumpwerk firmware — main entry point.
//!
//! Single-threaded tick loop around the hexagonal core:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                  │
//! │                                                           │
//! │  HardwareAdapter    LogEventSink    UptimeClock           │
//! │  (SensorBus+Relay)  (EventSink)     (time source)         │
//! │  WifiAdapter        HTTP server     TaskWatchdog          │
//! │  (Connectivity)     (dashboard)     (stall reset)         │
//! │                                                           │
//! │  ─────────────── Port Trait Boundary ──────────────       │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────┐      │
//! │  │        ControllerService (pure logic)           │      │
//! │  │  RelayController · KeepAliveScheduler · Sampler │      │
//! │  └─────────────────────────────────────────────────┘      │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! One loop iteration per second: poll sensors every tenth iteration,
//! run one control tick, publish the snapshot for the web handlers,
//! check the WiFi link, feed the watchdog. Nothing in the loop blocks
//! on the network — a dead link degrades to a restart, never to a
//! stuck relay.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod config;
mod events;
mod pins;
mod scheduler;

mod adapters;
pub mod app;
pub mod control;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::http;
use adapters::log_sink::LogEventSink;
use adapters::onewire::OneWireBusAdapter;
use adapters::time::UptimeClock;
use adapters::wifi::{ConnectivityPort, ConnectivityWatchdog, WatchdogVerdict, WifiAdapter};
use app::service::ControllerService;
use config::SystemConfig;
use drivers::relay::RelayDriver;
use drivers::watchdog::{system_restart, TaskWatchdog};
use events::{push_event, Event};

// Replace with your network credentials
const WIFI_SSID: &str = "xxxx";
const WIFI_PASSWORD: &str = "xxxxxxxx";

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger_init();

    info!("Pumpwerk v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Hardware ───────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    let relay_pin = {
        let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
        esp_idf_hal::gpio::PinDriver::output(peripherals.pins.gpio23)?
    };
    #[cfg(not(target_os = "espidf"))]
    let relay_pin = drivers::relay::SimPin::default();

    info!(
        "Relay on GPIO{}, one-wire bus on GPIO{}",
        pins::RELAY_GPIO,
        pins::ONE_WIRE_GPIO
    );

    // RelayDriver::new releases the coil — the relay is OFF from the
    // first instruction after boot.
    let mut hw = HardwareAdapter::new(
        OneWireBusAdapter::new(pins::ONE_WIRE_GPIO),
        RelayDriver::new(relay_pin),
    );
    let task_watchdog = TaskWatchdog::subscribe();

    // ── 3. Core service ───────────────────────────────────────
    let config = SystemConfig::default();
    let clock = UptimeClock::new();
    let mut sink = LogEventSink::new();

    let mut service = ControllerService::new(&config, clock.now_secs());
    service.start(&mut sink);
    // First sensor read right away, like every boot thereafter.
    service.poll_sensors(&mut hw);

    // ── 4. Connectivity ───────────────────────────────────────
    let mut wifi = WifiAdapter::new();
    wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD)?;
    if let Err(e) = wifi.connect() {
        // Not fatal here: the watchdog below retries, then restarts.
        warn!("WiFi: initial connect failed ({})", e);
    }
    let mut net_watchdog = ConnectivityWatchdog::new(config.wifi_max_retries);

    // ── 5. Web layer ──────────────────────────────────────────
    let snapshot_cell = http::shared_snapshot();
    http::publish(&snapshot_cell, service.snapshot(clock.now_secs()));

    #[cfg(target_os = "espidf")]
    let _http_server = http::server::start(snapshot_cell.clone())?;

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let mut last_poll = clock.now_secs();
    let mut last_telemetry = clock.now_secs();

    loop {
        // One iteration per control interval. On ESP-IDF this yields
        // to FreeRTOS; on the host it is a plain sleep.
        #[cfg(target_os = "espidf")]
        esp_idf_hal::delay::FreeRtos::delay_ms(config.control_loop_interval_ms);
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(
            config.control_loop_interval_ms as u64,
        ));

        let now = clock.now_secs();

        // Sensor poll before the control tick, so a due poll feeds the
        // decision made in the same iteration.
        if now.saturating_sub(last_poll) >= config.sensor_poll_interval_secs as u64 {
            push_event(Event::SensorPollTick);
            last_poll = now;
        }
        push_event(Event::ControlTick);
        if now.saturating_sub(last_telemetry) >= config.telemetry_interval_secs as u64 {
            push_event(Event::TelemetryTick);
            last_telemetry = now;
        }

        events::drain_events(|event| match event {
            Event::SensorPollTick => {
                service.poll_sensors(&mut hw);
            }
            Event::ControlTick => {
                // The one-shot command mailbox is drained exactly once
                // per tick; whatever the web layer posted since the
                // last tick is consumed entirely here.
                let command = events::take_manual_command();
                service.tick(now, command, &mut hw, &mut sink);
                http::publish(&snapshot_cell, service.snapshot(now));
            }
            Event::TelemetryTick => {
                service.report_telemetry(now, &mut sink);
            }
        });

        // Connectivity watchdog: bounded retries, then a deliberate
        // reboot to clear a wedged network stack.
        if net_watchdog.check(&mut wifi) == WatchdogVerdict::Exhausted {
            system_restart();
        }

        task_watchdog.feed();
    }
}

/// Minimal host-side logger so `--no-default-features` runs still
/// print; real builds use the ESP-IDF logger.
#[cfg(not(target_os = "espidf"))]
fn env_logger_init() {
    struct StderrLogger;
    impl log::Log for StderrLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
        fn flush(&self) {}
    }
    static LOGGER: StderrLogger = StderrLogger;
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Info));
}
