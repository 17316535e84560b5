//! Power core: need evaluation and rail sequencing.
//!
//! ```text
//!  ActivityPort ──▶ NeedEvaluator ──▶ PowerController ──▶ RailPort
//!                                          │
//!                                     Clock (now, delay)
//! ```
//!
//! [`need`] is a pure predicate over an [`activity::ActivitySnapshot`].
//! [`controller`] owns the rail state, the poll deadline and the cool-down
//! timestamp, and runs the power-on / power-off procedures.

pub mod activity;
pub mod controller;
pub mod need;

use core::fmt;

/// `log` target for every line emitted by the power core.
pub const LOG_TARGET: &str = "autopower::power";

/// Whether the switched PSU output is energized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RailState {
    #[default]
    Off,
    On,
}

impl RailState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for RailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}
