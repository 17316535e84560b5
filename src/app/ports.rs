//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PowerController (domain)
//! ```
//!
//! Driven adapters (peripheral readers, the PSU pin, clocks, event sinks,
//! config storage) implement these traits.  The
//! [`PowerController`](crate::power::controller::PowerController) consumes
//! them via generics, so the domain core never touches hardware directly.

use embedded_hal::delay::DelayNs;

use crate::config::PowerConfig;
use crate::error::ConfigError;
use crate::power::activity::{ActivitySnapshot, HeaterActivity};
use crate::time::Millis;

// ───────────────────────────────────────────────────────────────
// Activity port (driven adapter: peripherals → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per evaluation.
pub trait ActivityPort {
    /// Sample every fan, driver enable line and heater into one snapshot.
    fn read_activity(&mut self) -> ActivitySnapshot;
}

// ───────────────────────────────────────────────────────────────
// Rail port (driven adapter: domain → PSU hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this during power sequencing.
pub trait RailPort {
    /// Assert (`true`) or de-assert (`false`) the PSU enable signal.
    fn set_rail(&mut self, energized: bool);

    /// Reprogram every configured motor driver after the rail came up.
    fn restore_drivers(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: monotonic time + blocking delay)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock that can also block.
///
/// The delay half comes from [`DelayNs`] so real HAL delay providers slot
/// straight in.  Test clocks advance their virtual time inside
/// `delay_ns`, which makes settle delays instantaneous but observable.
pub trait Clock: DelayNs {
    /// Milliseconds since boot (wraps).
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`PowerEvent`](super::events::PowerEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PowerEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: startup configuration)
// ───────────────────────────────────────────────────────────────

/// Loads the controller configuration.
///
/// Implementations MUST run [`PowerConfig::validate`] before returning;
/// an out-of-range value is an error, never silently clamped.
pub trait ConfigPort {
    fn load(&self) -> Result<PowerConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Collaborator ports (consumed by the hardware adapter)
// ───────────────────────────────────────────────────────────────

/// Query surface of the temperature/fan subsystem.
///
/// Indices are 0-based and always below the counts in
/// [`MachineTopology`](crate::config::MachineTopology).
pub trait ThermalPort {
    /// Commanded speed of general-purpose fan `index` (0 = off).
    fn fan_speed(&self, index: usize) -> u8;

    /// Commanded speed of the auto fan on extruder `extruder`.
    fn extruder_fan_speed(&self, extruder: usize) -> u8;

    /// Whether the controller fan is currently running.
    fn controller_fan_active(&self) -> bool;

    /// Commanded speed of the chamber fan.
    fn chamber_fan_speed(&self) -> u8;

    /// Target, duty and measured temperature of hotend `extruder`.
    fn hotend(&self, extruder: usize) -> HeaterActivity;

    /// Target, duty and measured temperature of the bed.
    fn bed(&self) -> HeaterActivity;

    /// Measured chamber temperature (°C).
    fn chamber_temp_c(&self) -> f32;
}

/// Stepper driver subsystem.
pub trait StepperPort {
    /// Re-send configuration to every driver (they forget it unpowered).
    fn restore_drivers(&mut self);
}
