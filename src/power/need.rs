//! Need evaluator.
//!
//! Decides whether anything on the machine currently requires the power
//! rail.  Categories are checked in a fixed priority order and the first
//! match wins; because the result is a plain OR across categories, the
//! order only changes which [`PowerNeed`] is reported, never whether
//! power is needed.
//!
//! ## Category order
//!
//! 1. general-purpose fans
//! 2. extruder auto fans
//! 3. controller fan
//! 4. chamber fan
//! 5. motor-driver enable lines
//! 6. hotend heating (target or duty)
//! 7. bed heating (target or duty)
//! 8. hotend still hot (measured ≥ threshold)
//! 9. chamber still hot (measured ≥ threshold)
//!
//! Each category can be switched off in [`PowerTriggers`].

use core::fmt;

use log::debug;

use crate::config::PowerTriggers;
use crate::power::LOG_TARGET;
use crate::power::activity::{ActivitySnapshot, DriverSet};

/// The activity category that made power necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerNeed {
    /// General-purpose fan `n` is spinning.
    Fan(u8),
    /// Auto fan on extruder `n` is spinning.
    ExtruderFan(u8),
    ControllerFan,
    ChamberFan,
    /// These driver enable lines are asserted.
    Drivers(DriverSet),
    /// Hotend `n` has a target or heater duty.
    HotendHeating(u8),
    BedHeating,
    /// Hotend `n` is still above the "still hot" threshold.
    HotendStillHot(u8),
    ChamberStillHot,
}

impl fmt::Display for PowerNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fan(n) => write!(f, "fan {n} running"),
            Self::ExtruderFan(n) => write!(f, "extruder fan E{n} running"),
            Self::ControllerFan => write!(f, "controller fan running"),
            Self::ChamberFan => write!(f, "chamber fan running"),
            Self::Drivers(set) => write!(f, "drivers enabled: {set}"),
            Self::HotendHeating(n) => write!(f, "hotend E{n} heating"),
            Self::BedHeating => write!(f, "bed heating"),
            Self::HotendStillHot(n) => write!(f, "hotend E{n} still hot"),
            Self::ChamberStillHot => write!(f, "chamber still hot"),
        }
    }
}

/// Stateless evaluator over a snapshot, parameterised by the triggers.
#[derive(Debug, Clone, Copy)]
pub struct NeedEvaluator {
    triggers: PowerTriggers,
}

impl NeedEvaluator {
    pub fn new(triggers: PowerTriggers) -> Self {
        Self { triggers }
    }

    /// True if any enabled category requires power.
    pub fn is_power_needed(&self, snap: &ActivitySnapshot) -> bool {
        self.evaluate(snap).is_some()
    }

    /// First category that requires power, or `None` if the machine is idle.
    ///
    /// Emits one trace line naming the result.
    pub fn evaluate(&self, snap: &ActivitySnapshot) -> Option<PowerNeed> {
        let need = self.first_need(snap);
        match need {
            Some(n) => debug!(target: LOG_TARGET, "need | needed=true | cause={n}"),
            None => debug!(target: LOG_TARGET, "need | needed=false"),
        }
        need
    }

    // ── Internal ──────────────────────────────────────────────────

    fn first_need(&self, snap: &ActivitySnapshot) -> Option<PowerNeed> {
        let t = &self.triggers;

        // ── Fans ──────────────────────────────────────────────────
        if t.fans {
            if let Some(i) = first_nonzero(&snap.fan_speeds) {
                return Some(PowerNeed::Fan(i));
            }
        }
        if t.extruder_fans {
            if let Some(i) = first_nonzero(&snap.auto_fan_speeds) {
                return Some(PowerNeed::ExtruderFan(i));
            }
        }
        if t.controller_fan && snap.controller_fan_active == Some(true) {
            return Some(PowerNeed::ControllerFan);
        }
        if t.chamber_fan && snap.chamber_fan_speed.is_some_and(|s| s > 0) {
            return Some(PowerNeed::ChamberFan);
        }

        // ── Motor drivers ─────────────────────────────────────────
        if t.drivers && !snap.drivers_enabled.is_empty() {
            return Some(PowerNeed::Drivers(snap.drivers_enabled));
        }

        // ── Heaters ───────────────────────────────────────────────
        if t.hotends {
            if let Some(i) = snap.hotends.iter().position(|h| h.is_heating()) {
                return Some(PowerNeed::HotendHeating(i as u8));
            }
        }
        if t.bed && snap.bed.is_some_and(|b| b.is_heating()) {
            return Some(PowerNeed::BedHeating);
        }

        // ── Residual heat ─────────────────────────────────────────
        if let Some(limit) = t.hotend_still_hot_c {
            if let Some(i) = snap.hotends.iter().position(|h| h.current_c >= limit) {
                return Some(PowerNeed::HotendStillHot(i as u8));
            }
        }
        if let (Some(limit), Some(temp)) = (t.chamber_still_hot_c, snap.chamber_temp_c) {
            if temp >= limit {
                return Some(PowerNeed::ChamberStillHot);
            }
        }

        None
    }
}

fn first_nonzero(speeds: &[u8]) -> Option<u8> {
    speeds.iter().position(|&s| s > 0).map(|i| i as u8)
}
