//! Outbound controller events.
//!
//! The [`PowerController`](crate::power::controller::PowerController) emits
//! these through the [`EventSink`](super::ports::EventSink) port.  They are
//! diagnostics only: nothing in the core reads them back.

use crate::power::RailState;
use crate::power::need::PowerNeed;
use crate::time::Millis;

/// Structured events emitted by the power controller.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerEvent {
    /// One poll evaluation finished.
    Evaluated {
        at: Millis,
        need: Option<PowerNeed>,
        rail: RailState,
    },

    /// The power-on procedure ran.
    PowerOn {
        reason: heapless::String<48>,
        before: RailState,
        after: RailState,
    },

    /// The power-off procedure ran.
    PowerOff {
        reason: heapless::String<48>,
        before: RailState,
    },

    /// Periodic status snapshot.
    Status(PowerStatus),
}

/// A point-in-time view of the controller suitable for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerStatus {
    pub rail: RailState,
    /// When power was last needed, `None` if never.
    pub last_power_on: Option<Millis>,
    /// Milliseconds since power was last needed.
    pub since_last_need_ms: Option<u32>,
    /// Milliseconds of cool-down left before an idle poll may power off.
    pub cooldown_remaining_ms: u32,
    /// Deadline of the next evaluation, `None` before the first poll.
    pub next_poll: Option<Millis>,
    /// Evaluations run since startup.
    pub evaluations: u64,
}

/// Copy `reason` into a fixed-capacity string, truncating on a char boundary.
pub(crate) fn reason_string(reason: &str) -> heapless::String<48> {
    let mut out = heapless::String::new();
    for c in reason.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
