//! Motor-driver enable line reader.
//!
//! The stepper subsystem owns the enable outputs; the power controller
//! only reads back their latched level.  Most stepper drivers (A4988,
//! TMC22xx) are enabled by pulling `EN` LOW, so each line carries its own
//! active level.

use embedded_hal::digital::StatefulOutputPin;

use crate::error::PinFault;
use crate::power::activity::DriverAxis;

pub struct DriverEnableLine<P> {
    axis: DriverAxis,
    pin: P,
    active_low: bool,
}

impl<P: StatefulOutputPin> DriverEnableLine<P> {
    pub fn new(axis: DriverAxis, pin: P, active_low: bool) -> Self {
        Self {
            axis,
            pin,
            active_low,
        }
    }

    pub fn axis(&self) -> DriverAxis {
        self.axis
    }

    /// Whether the line currently sits at its "driver enabled" level.
    pub fn is_enabled(&mut self) -> Result<bool, PinFault> {
        let high = self
            .pin
            .is_set_high()
            .map_err(|_| PinFault::EnableReadFailed)?;
        Ok(high != self.active_low)
    }
}
