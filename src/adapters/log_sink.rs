//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every controller event as one
//! pipe-separated line through the `log` facade.  Where the lines end up
//! (UART, RTT, stderr) is the logger backend's business.

use log::{debug, info};

use crate::app::events::PowerEvent;
use crate::app::ports::EventSink;

/// `log` target for event lines.
pub const EVENT_TARGET: &str = "autopower::event";

/// Adapter that logs every [`PowerEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PowerEvent) {
        match event {
            PowerEvent::Evaluated { at, need, rail } => match need {
                Some(n) => debug!(target: EVENT_TARGET, "EVAL | t={at} | rail={rail} | need={n}"),
                None => debug!(target: EVENT_TARGET, "EVAL | t={at} | rail={rail} | need=none"),
            },
            PowerEvent::PowerOn {
                reason,
                before,
                after,
            } => {
                info!(target: EVENT_TARGET, "PSU ON | {before} -> {after} | {reason}");
            }
            PowerEvent::PowerOff { reason, before } => {
                info!(target: EVENT_TARGET, "PSU OFF | was {before} | {reason}");
            }
            PowerEvent::Status(s) => {
                info!(
                    target: EVENT_TARGET,
                    "STATUS | rail={} | last_on={:?} | idle_ms={:?} | cooldown_left_ms={} | \
                     next_poll={:?} | evals={}",
                    s.rail,
                    s.last_power_on,
                    s.since_last_need_ms,
                    s.cooldown_remaining_ms,
                    s.next_poll,
                    s.evaluations,
                );
            }
        }
    }
}
