//! Reset escape hatches: the task watchdog and the explicit restart.
//!
//! Two ways out of a wedged system, both ending in a clean reboot into
//! the safe boot state (relay off, keepalive due in one hour):
//!
//! - the TWDT fires when the main loop itself stalls;
//! - [`system_restart`] is called deliberately when the connectivity
//!   watchdog exhausts its retries.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// TWDT timeout. Three full sensor-poll periods: if the loop misses
/// that many, the device is wedged.
const TWDT_TIMEOUT_MS: u32 = 30_000;

pub struct TaskWatchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl TaskWatchdog {
    /// Reconfigure the TWDT and subscribe the current task.
    pub fn subscribe() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from main before the event loop.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: TWDT_TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                if esp_task_wdt_reconfigure(&cfg) != ESP_OK {
                    log::warn!("TWDT: reconfigure failed (may already be configured)");
                }

                let subscribed = esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK;
                if subscribed {
                    log::info!("TWDT: subscribed ({}s timeout)", TWDT_TIMEOUT_MS / 1000);
                } else {
                    log::warn!("TWDT: subscribe failed, running unsupervised");
                }
                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("TWDT(sim): no-op");
            Self {}
        }
    }

    /// Feed the watchdog. Called on every main-loop iteration.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: plain FFI call, subscribed task only.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

/// Reboot the device. In-memory state is discarded by design — boot
/// re-derives everything from the sensors and the clock.
pub fn system_restart() -> ! {
    log::error!("Restarting device");

    #[cfg(target_os = "espidf")]
    // SAFETY: esp_restart never returns.
    unsafe {
        esp_restart();
        unreachable!("esp_restart does not return");
    }

    #[cfg(not(target_os = "espidf"))]
    std::process::exit(1)
}
