//! Pin-level drivers: PSU enable output, driver enable read-back, host GPIO.

pub mod enable_line;
pub mod psu;
pub mod sim_pin;
