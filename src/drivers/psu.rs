//! PSU enable output driver.
//!
//! Drives the switched supply's enable input (ATX `PS_ON`, relay coil,
//! SSR) through any `embedded-hal` output pin.
//!
//! ## Active level
//!
//! ATX supplies switch on when `PS_ON` is pulled LOW; most relay boards
//! switch on HIGH.  The driver takes the active level at construction and
//! callers only ever speak in terms of "energized".
//!
//! The driver is a dumb actuator: sequencing and timing belong to the
//! power controller.

use embedded_hal::digital::OutputPin;

use crate::error::PinFault;

pub struct PsuDriver<P> {
    pin: P,
    active_high: bool,
    energized: bool,
}

impl<P: OutputPin> PsuDriver<P> {
    /// Take ownership of `pin` and drive it to the de-energized level.
    pub fn new(pin: P, active_high: bool) -> Result<Self, PinFault> {
        let mut psu = Self {
            pin,
            active_high,
            energized: true,
        };
        psu.set(false)?;
        Ok(psu)
    }

    /// Energize (`true`) or de-energize (`false`) the supply.
    pub fn set(&mut self, energized: bool) -> Result<(), PinFault> {
        let high = energized == self.active_high;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| PinFault::RailWriteFailed)?;
        self.energized = energized;
        Ok(())
    }

    /// Last successfully written state.
    pub fn is_energized(&self) -> bool {
        self.energized
    }
}
