//! Relay control state machine.
//!
//! One authoritative decision per tick: given the governing water
//! temperature, an optional operator command, and the keepalive
//! schedule, is the pump relay ON or OFF, and why.
//!
//! ```text
//!                   manual TurnOn / Toggle
//!        ┌────────────────────────────────────────┐
//!        │                                        ▼
//!      OFF ──[water > 55 °C]───────────▶ ON(AutoThermal)
//!        │                                        │
//!        ├──[keepalive due]──▶ ON(Keepalive)      │
//!        │                         │              │
//!        ▲     [30 s up, water cold]│  [3600 s up, water cold]
//!        └─────────────────────────┴──────────────┘
//!                 every OFF transition re-arms the schedule
//! ```
//!
//! Rule precedence within a tick: manual command (absolute, consumes
//! the tick) → thermal activation → thermal retention → keepalive
//! activation → timeout deactivation. Thermal retention dominating the
//! timeouts is the safety core: the pump never stops while the water
//! is hot, however it was started.
//!
//! An invalid governing sample reads as "not hot". That is the
//! fail-safe direction for activation (no pumping on garbage data) and
//! irrelevant for the timeouts, which are purely time-based.

use log::info;

use crate::app::commands::ManualCommand;
use crate::config::SystemConfig;
use crate::scheduler::KeepAliveScheduler;
use crate::sensors::temperature::TemperatureSample;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Why the relay is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnReason {
    /// Operator pressed on/toggle.
    Manual,
    /// Governing sensor crossed the thermal threshold.
    AutoThermal,
    /// Scheduled anti-seize run.
    Keepalive,
}

/// Relay state. The activation timestamp lives inside `On`, so it
/// cannot outlive the state it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Off,
    On { reason: OnReason, since_secs: u64 },
}

impl RelayState {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On { .. })
    }

    /// Display label, as shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::On { .. } => "AN",
            Self::Off => "AUS",
        }
    }
}

/// The declared side effect of a tick: what the driver must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCommand {
    Energize,
    DeEnergize,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The relay decision logic. Pure: reads samples and the schedule,
/// returns the driver command; applying it is the caller's job.
#[derive(Debug)]
pub struct RelayController {
    state: RelayState,
    thermal_threshold_c: f32,
    keepalive_run_secs: u64,
    manual_run_secs: u64,
}

impl RelayController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: RelayState::Off,
            thermal_threshold_c: config.thermal_threshold_c,
            keepalive_run_secs: config.keepalive_run_secs as u64,
            manual_run_secs: config.manual_run_secs as u64,
        }
    }

    /// Current relay state.
    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Run one evaluation tick.
    ///
    /// `temp0` is the latest governing-sensor sample, `command` the
    /// at-most-one manual command for this tick. Scheduler mutations
    /// (re-arm on OFF, in-progress on keepalive start) happen here so
    /// they can never drift apart from the transition that caused them.
    pub fn evaluate(
        &mut self,
        now: u64,
        temp0: &TemperatureSample,
        command: Option<ManualCommand>,
        sched: &mut KeepAliveScheduler,
    ) -> Option<RelayCommand> {
        // 1. Manual command: applied unconditionally, consumes the tick.
        //    An operator's off-press beats simultaneous thermal
        //    retention; the thermal rule gets its say again next tick.
        if let Some(cmd) = command {
            return Some(self.apply_manual(cmd, now, sched));
        }

        let hot = temp0.valid && temp0.celsius > self.thermal_threshold_c;

        match self.state {
            RelayState::Off => {
                // 2. Thermal auto-activation.
                if hot {
                    return Some(self.switch_on(OnReason::AutoThermal, now));
                }
                // 4. Keepalive activation (only when not hot and off).
                if sched.is_due(now) {
                    sched.mark_in_progress();
                    return Some(self.switch_on(OnReason::Keepalive, now));
                }
                None
            }
            RelayState::On { reason, since_secs } => {
                // 3. Thermal retention: hot water pins the relay on,
                //    whatever started it and however long it has run.
                if hot {
                    return None;
                }
                // 5. Timeout deactivation by activation reason.
                let limit = match reason {
                    OnReason::Keepalive => self.keepalive_run_secs,
                    OnReason::Manual | OnReason::AutoThermal => self.manual_run_secs,
                };
                if now.saturating_sub(since_secs) >= limit {
                    return Some(self.switch_off(now, sched));
                }
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn apply_manual(
        &mut self,
        cmd: ManualCommand,
        now: u64,
        sched: &mut KeepAliveScheduler,
    ) -> RelayCommand {
        match cmd {
            // TurnOn always (re)stamps the activation as manual, even
            // when already on — the operator just bought another hour.
            ManualCommand::TurnOn => self.switch_on(OnReason::Manual, now),
            // TurnOff re-arms the schedule even when already off,
            // matching the original /relais_off handler.
            ManualCommand::TurnOff => self.switch_off(now, sched),
            ManualCommand::Toggle => match self.state {
                RelayState::Off => self.switch_on(OnReason::Manual, now),
                RelayState::On { .. } => self.switch_off(now, sched),
            },
        }
    }

    fn switch_on(&mut self, reason: OnReason, now: u64) -> RelayCommand {
        if !self.state.is_on() {
            info!("Relay: OFF -> ON ({:?}) at t={}s", reason, now);
        }
        self.state = RelayState::On {
            reason,
            since_secs: now,
        };
        RelayCommand::Energize
    }

    fn switch_off(&mut self, now: u64, sched: &mut KeepAliveScheduler) -> RelayCommand {
        if let RelayState::On { reason, since_secs } = self.state {
            info!(
                "Relay: ON ({:?}) -> OFF after {}s",
                reason,
                now.saturating_sub(since_secs)
            );
        }
        self.state = RelayState::Off;
        // Every OFF transition (and every explicit off-press) restarts
        // the idle clock and cancels a running keepalive cycle.
        sched.arm_next(now);
        RelayCommand::DeEnergize
    }
}
