//! Application boundary: ports, inbound commands, outbound events.
//!
//! The power core in [`crate::power`] talks to the outside world only
//! through the **port traits** defined in [`ports`], keeping it fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
