//! System configuration parameters
//!
//! Everything the power controller needs to know about the machine and
//! its timing.  Resolved once at startup (from defaults or a JSON file)
//! and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::power::activity::{MAX_FANS, MAX_HOTENDS};

/// Which activity categories keep the rail energized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerTriggers {
    /// Any general-purpose fan spinning.
    pub fans: bool,
    /// Any extruder auto fan spinning.
    pub extruder_fans: bool,
    /// Controller (electronics) fan running.
    pub controller_fan: bool,
    /// Chamber fan spinning.
    pub chamber_fan: bool,
    /// Any motor-driver enable line asserted.
    pub drivers: bool,
    /// Any hotend with a target or heater duty.
    pub hotends: bool,
    /// Heated bed with a target or heater duty.
    pub bed: bool,
    /// Keep power while any hotend reads at or above this (°C).
    pub hotend_still_hot_c: Option<f32>,
    /// Keep power while the chamber reads at or above this (°C).
    pub chamber_still_hot_c: Option<f32>,
}

impl Default for PowerTriggers {
    fn default() -> Self {
        Self {
            fans: true,
            extruder_fans: true,
            controller_fan: true,
            chamber_fan: true,
            drivers: true,
            hotends: true,
            bed: true,
            hotend_still_hot_c: None,
            chamber_still_hot_c: None,
        }
    }
}

/// What hardware the machine actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineTopology {
    /// Number of general-purpose fans.
    pub fans: u8,
    /// Number of hotends (one auto fan each).
    pub hotends: u8,
    pub heated_bed: bool,
    pub heated_chamber: bool,
    pub controller_fan: bool,
    pub chamber_fan: bool,
}

impl Default for MachineTopology {
    fn default() -> Self {
        Self {
            fans: 1,
            hotends: 1,
            heated_bed: true,
            heated_chamber: false,
            controller_fan: false,
            chamber_fan: false,
        }
    }
}

/// Core power-controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub triggers: PowerTriggers,
    pub topology: MachineTopology,

    // --- Sequencing ---
    /// Settle time after asserting the rail before touching drivers (ms).
    pub power_up_delay_ms: u32,
    /// Settle time after de-asserting the rail (ms). Zero disables it.
    pub power_down_delay_ms: u32,
    /// Smart drivers need a second settle after reconfiguration.
    pub driver_settle_after_restore: bool,
    /// Logic level that energizes the PSU (`true` = active HIGH).
    pub rail_active_high: bool,

    // --- Timing ---
    /// Idle time after the last detected need before power-off (seconds).
    pub cooldown_timeout_secs: u32,
    /// Interval between need evaluations (milliseconds).
    pub poll_interval_ms: u32,

    // --- Logging ---
    /// Maximum log level for the console backend ("error" … "trace").
    pub log_level: heapless::String<8>,
}

/// Default poll interval of the reference firmware.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 2500;

impl Default for PowerConfig {
    fn default() -> Self {
        let mut log_level = heapless::String::new();
        let _ = log_level.push_str("info");
        Self {
            triggers: PowerTriggers::default(),
            topology: MachineTopology::default(),

            power_up_delay_ms: 250,
            power_down_delay_ms: 0,
            driver_settle_after_restore: false,
            rail_active_high: false, // ATX PS_ON is active LOW

            cooldown_timeout_secs: 30,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,

            log_level,
        }
    }
}

impl PowerConfig {
    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.topology.fans as usize > MAX_FANS {
            return Err(ConfigError::ValidationFailed("topology.fans exceeds MAX_FANS"));
        }
        if self.topology.hotends as usize > MAX_HOTENDS {
            return Err(ConfigError::ValidationFailed(
                "topology.hotends exceeds MAX_HOTENDS",
            ));
        }
        if let Some(t) = self.triggers.hotend_still_hot_c {
            if !t.is_finite() || t <= 0.0 {
                return Err(ConfigError::ValidationFailed(
                    "triggers.hotend_still_hot_c must be a positive temperature",
                ));
            }
        }
        if let Some(t) = self.triggers.chamber_still_hot_c {
            if !t.is_finite() || t <= 0.0 {
                return Err(ConfigError::ValidationFailed(
                    "triggers.chamber_still_hot_c must be a positive temperature",
                ));
            }
        }
        if self.log_level_filter().is_none() {
            return Err(ConfigError::ValidationFailed("log_level is not a known level"));
        }
        Ok(())
    }

    /// Cool-down timeout in milliseconds.
    pub fn cooldown_timeout_ms(&self) -> u32 {
        crate::time::secs_to_ms(self.cooldown_timeout_secs)
    }

    /// Parsed [`log::LevelFilter`], `None` if the string is unknown.
    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }
}
