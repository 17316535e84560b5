//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the PSU enable driver and the motor-driver enable lines, and
//! borrows the thermal and stepper subsystems through their collaborator
//! ports.  Exposes everything to the controller as [`ActivityPort`] and
//! [`RailPort`].  This is the only module that touches pins.

use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use log::warn;

use crate::app::ports::{ActivityPort, RailPort, StepperPort, ThermalPort};
use crate::config::{MachineTopology, PowerConfig};
use crate::drivers::enable_line::DriverEnableLine;
use crate::drivers::psu::PsuDriver;
use crate::error::{Error, Result};
use crate::power::activity::{ActivitySnapshot, DriverAxis, MAX_E_STEPPERS};

/// X, Y, Z, their secondaries, and every extruder.
pub const MAX_ENABLE_LINES: usize = 6 + MAX_E_STEPPERS;

/// Concrete adapter that combines all power-relevant hardware behind port traits.
pub struct HardwareAdapter<R, D, T, S> {
    psu: PsuDriver<R>,
    enable_lines: heapless::Vec<DriverEnableLine<D>, MAX_ENABLE_LINES>,
    thermal: T,
    steppers: S,
    topology: MachineTopology,
}

impl<R, D, T, S> HardwareAdapter<R, D, T, S>
where
    R: OutputPin,
    D: StatefulOutputPin,
    T: ThermalPort,
    S: StepperPort,
{
    /// Take the PSU pin (driven to de-energized immediately) and the
    /// collaborator subsystems.
    pub fn new(config: &PowerConfig, psu_pin: R, thermal: T, steppers: S) -> Result<Self> {
        config.validate()?;
        let psu = PsuDriver::new(psu_pin, config.rail_active_high)?;
        Ok(Self {
            psu,
            enable_lines: heapless::Vec::new(),
            thermal,
            steppers,
            topology: config.topology,
        })
    }

    /// Register a motor-driver enable line to watch.
    pub fn add_enable_line(&mut self, axis: DriverAxis, pin: D, active_low: bool) -> Result<()> {
        if !axis.is_tracked() {
            return Err(Error::Capacity("extruder driver index"));
        }
        self.enable_lines
            .push(DriverEnableLine::new(axis, pin, active_low))
            .map_err(|_| Error::Capacity("driver enable lines"))
    }

    pub fn thermal(&self) -> &T {
        &self.thermal
    }

    pub fn thermal_mut(&mut self) -> &mut T {
        &mut self.thermal
    }

    pub fn steppers(&self) -> &S {
        &self.steppers
    }

    /// Whether the PSU pin was last driven to its energized level.
    pub fn psu_energized(&self) -> bool {
        self.psu.is_energized()
    }
}

// ── ActivityPort implementation ───────────────────────────────

impl<R, D, T, S> ActivityPort for HardwareAdapter<R, D, T, S>
where
    R: OutputPin,
    D: StatefulOutputPin,
    T: ThermalPort,
    S: StepperPort,
{
    fn read_activity(&mut self) -> ActivitySnapshot {
        let topo = self.topology;
        let thermal = &self.thermal;
        let mut snap = ActivitySnapshot::idle();

        // Capacity was checked by PowerConfig::validate in new().
        for fan in 0..topo.fans as usize {
            let _ = snap.fan_speeds.push(thermal.fan_speed(fan));
        }
        for e in 0..topo.hotends as usize {
            let _ = snap.auto_fan_speeds.push(thermal.extruder_fan_speed(e));
            let _ = snap.hotends.push(thermal.hotend(e));
        }
        snap.controller_fan_active = topo.controller_fan.then(|| thermal.controller_fan_active());
        snap.chamber_fan_speed = topo.chamber_fan.then(|| thermal.chamber_fan_speed());
        snap.bed = topo.heated_bed.then(|| thermal.bed());
        snap.chamber_temp_c = topo.heated_chamber.then(|| thermal.chamber_temp_c());

        for line in &mut self.enable_lines {
            match line.is_enabled() {
                Ok(true) => snap.drivers_enabled.insert(line.axis()),
                Ok(false) => {}
                Err(e) => {
                    // Unknown state counts as enabled: never cut power under a live driver.
                    warn!("enable line {}: {} (treating as enabled)", line.axis(), e);
                    snap.drivers_enabled.insert(line.axis());
                }
            }
        }

        snap
    }
}

// ── RailPort implementation ───────────────────────────────────

impl<R, D, T, S> RailPort for HardwareAdapter<R, D, T, S>
where
    R: OutputPin,
    D: StatefulOutputPin,
    T: ThermalPort,
    S: StepperPort,
{
    fn set_rail(&mut self, energized: bool) {
        if let Err(e) = self.psu.set(energized) {
            warn!("PSU enable (energized={}) failed: {}", energized, e);
        }
    }

    fn restore_drivers(&mut self) {
        self.steppers.restore_drivers();
    }
}
