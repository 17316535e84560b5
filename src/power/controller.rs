//! Power controller: the decision-and-transition engine.
//!
//! [`PowerController`] owns the rail state, the poll deadline and the
//! "last time power was needed" timestamp.  All I/O flows through port
//! traits injected at call sites, so the whole controller runs against
//! mock adapters and a virtual clock in tests.
//!
//! ```text
//!  ActivityPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                   │     PowerController      │
//!      RailPort ◀── │ need · cool-down · seq.  │ ◀── Clock
//!                   └─────────────────────────┘
//! ```
//!
//! ## Poll cycle
//!
//! 1. [`check`](PowerController::check) returns immediately until the
//!    deadline is reached, then moves the deadline one interval forward.
//! 2. The activity snapshot is read and evaluated.
//! 3. Needed → power-on.  Not needed and cool-down over → power-off.
//!    Otherwise the rail is left alone.
//!
//! Settle delays block the caller; transitions are rare and short.

use log::{debug, info};

use crate::app::commands::PowerCommand;
use crate::app::events::{PowerEvent, PowerStatus, reason_string};
use crate::app::ports::{ActivityPort, Clock, EventSink, RailPort};
use crate::config::PowerConfig;
use crate::power::need::{NeedEvaluator, PowerNeed};
use crate::power::{LOG_TARGET, RailState};
use crate::time::{self, Millis};

/// What one executed poll decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Power was needed; the power-on procedure ran.
    PowerOn(PowerNeed),
    /// Idle and past cool-down; the power-off procedure ran.
    PowerOff,
    /// Idle but still inside the cool-down window.
    Hold,
}

// ───────────────────────────────────────────────────────────────
// PowerController
// ───────────────────────────────────────────────────────────────

pub struct PowerController {
    evaluator: NeedEvaluator,
    power_up_delay_ms: u32,
    power_down_delay_ms: u32,
    driver_settle_after_restore: bool,
    cooldown_timeout_ms: u32,
    poll_interval_ms: u32,

    rail: RailState,
    /// Last time power was needed or manually requested.
    last_power_on: Option<Millis>,
    /// `None` until the first poll anchors it.
    next_poll: Option<Millis>,
    evaluations: u64,
}

impl PowerController {
    /// Construct the controller with the rail assumed off and no history.
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            evaluator: NeedEvaluator::new(config.triggers),
            power_up_delay_ms: config.power_up_delay_ms,
            power_down_delay_ms: config.power_down_delay_ms,
            driver_settle_after_restore: config.driver_settle_after_restore,
            cooldown_timeout_ms: config.cooldown_timeout_ms(),
            poll_interval_ms: config.poll_interval_ms,
            rail: RailState::Off,
            last_power_on: None,
            next_poll: None,
            evaluations: 0,
        }
    }

    // ── Polling driver ────────────────────────────────────────

    /// Call from the main loop as often as convenient.
    ///
    /// Returns `None` when the poll deadline has not been reached yet,
    /// otherwise the action the evaluation took.
    pub fn check<H, C, S>(&mut self, hw: &mut H, clock: &mut C, sink: &mut S) -> Option<PollAction>
    where
        H: ActivityPort + RailPort,
        C: Clock,
        S: EventSink,
    {
        let now = clock.now_ms();
        match self.next_poll {
            Some(deadline) if !time::reached(now, deadline) => return None,
            Some(deadline) => {
                self.next_poll = Some(deadline.wrapping_add(self.poll_interval_ms));
            }
            None => self.next_poll = Some(now.wrapping_add(self.poll_interval_ms)),
        }
        self.evaluations += 1;

        let snapshot = hw.read_activity();
        let need = self.evaluator.evaluate(&snapshot);
        sink.emit(&PowerEvent::Evaluated {
            at: now,
            need,
            rail: self.rail,
        });

        let action = if let Some(need) = need {
            self.power_on("poll: power needed", hw, clock, sink);
            PollAction::PowerOn(need)
        } else if self.cooldown_elapsed(now) {
            self.power_off("poll: idle past cool-down", hw, clock, sink);
            PollAction::PowerOff
        } else {
            debug!(
                target: LOG_TARGET,
                "poll | hold | rail={} | cooldown_remaining_ms={}",
                self.rail,
                self.cooldown_remaining_ms(now)
            );
            PollAction::Hold
        };
        Some(action)
    }

    // ── Sequencing ────────────────────────────────────────────

    /// Energize the rail (if off) and restart the cool-down window.
    ///
    /// The timestamp is refreshed on every call, including when the rail
    /// is already on, so cool-down always counts from the latest need.
    pub fn power_on(
        &mut self,
        reason: &str,
        hw: &mut impl RailPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) {
        let before = self.rail;
        self.last_power_on = Some(clock.now_ms());

        if !self.rail.is_on() {
            hw.set_rail(true);
            clock.delay_ms(self.power_up_delay_ms);
            hw.restore_drivers();
            if self.driver_settle_after_restore {
                clock.delay_ms(self.power_up_delay_ms);
            }
            self.rail = RailState::On;
            info!(target: LOG_TARGET, "rail | off -> on | reason={reason}");
        }

        debug!(
            target: LOG_TARGET,
            "power_on | reason={reason} | enter={before} | leave={}",
            self.rail
        );
        sink.emit(&PowerEvent::PowerOn {
            reason: reason_string(reason),
            before,
            after: self.rail,
        });
    }

    /// De-energize the rail (if on), then wait out the power-down delay.
    pub fn power_off(
        &mut self,
        reason: &str,
        hw: &mut impl RailPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) {
        let before = self.rail;

        if self.rail.is_on() {
            hw.set_rail(false);
            self.rail = RailState::Off;
            info!(target: LOG_TARGET, "rail | on -> off | reason={reason}");
        }
        if self.power_down_delay_ms > 0 {
            clock.delay_ms(self.power_down_delay_ms);
        }

        debug!(target: LOG_TARGET, "power_off | reason={reason} | enter={before}");
        sink.emit(&PowerEvent::PowerOff {
            reason: reason_string(reason),
            before,
        });
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a manual power request from the host.
    pub fn handle_command(
        &mut self,
        cmd: PowerCommand,
        hw: &mut impl RailPort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            PowerCommand::PowerOn => self.power_on(cmd.reason(), hw, clock, sink),
            PowerCommand::PowerOff => self.power_off(cmd.reason(), hw, clock, sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn rail(&self) -> RailState {
        self.rail
    }

    pub fn is_rail_on(&self) -> bool {
        self.rail.is_on()
    }

    pub fn last_power_on(&self) -> Option<Millis> {
        self.last_power_on
    }

    pub fn next_poll(&self) -> Option<Millis> {
        self.next_poll
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Milliseconds since the last need at `now`.
    ///
    /// A stamp taken after `now` (the caller sampled the clock before a
    /// transition) counts as zero rather than wrapping.
    pub fn since_last_need_ms(&self, now: Millis) -> Option<u32> {
        self.last_power_on
            .map(|t| if time::reached(now, t) { time::elapsed(now, t) } else { 0 })
    }

    /// True when an idle poll at `now` is allowed to power off.
    pub fn cooldown_elapsed(&self, now: Millis) -> bool {
        self.since_last_need_ms(now)
            .is_none_or(|idle| idle >= self.cooldown_timeout_ms)
    }

    /// Milliseconds of cool-down left at `now` (0 once elapsed or never on).
    pub fn cooldown_remaining_ms(&self, now: Millis) -> u32 {
        self.since_last_need_ms(now)
            .map_or(0, |idle| self.cooldown_timeout_ms.saturating_sub(idle))
    }

    /// Build a telemetry snapshot at `now`.
    pub fn status(&self, now: Millis) -> PowerStatus {
        PowerStatus {
            rail: self.rail,
            last_power_on: self.last_power_on,
            since_last_need_ms: self.since_last_need_ms(now),
            cooldown_remaining_ms: self.cooldown_remaining_ms(now),
            next_poll: self.next_poll,
            evaluations: self.evaluations,
        }
    }
}
