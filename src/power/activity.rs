//! Point-in-time view of everything that can keep the rail up.
//!
//! An [`ActivitySnapshot`] is assembled by the hardware adapter on every
//! evaluation and thrown away afterwards.  Optional hardware (bed,
//! chamber, controller fan, chamber fan) is modelled as `Option` so a
//! machine without it simply reports `None`.

use core::fmt;

/// Maximum number of general-purpose part-cooling fans.
pub const MAX_FANS: usize = 8;
/// Maximum number of hotends (and per-extruder auto fans).
pub const MAX_HOTENDS: usize = 8;
/// Maximum number of extruder steppers.
pub const MAX_E_STEPPERS: usize = 8;

// ---------------------------------------------------------------------------
// Heater activity
// ---------------------------------------------------------------------------

/// State of one heater as reported by the thermal subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaterActivity {
    /// Commanded target temperature (°C). Zero means "heater off".
    pub target_c: f32,
    /// Active soft-PWM duty (0 = not heating).
    pub duty: u8,
    /// Measured temperature (°C).
    pub current_c: f32,
}

impl HeaterActivity {
    /// A heater that is off and at `current_c`.
    pub const fn idle(current_c: f32) -> Self {
        Self {
            target_c: 0.0,
            duty: 0,
            current_c,
        }
    }

    /// True if the heater has a target or is actively driving its element.
    pub fn is_heating(&self) -> bool {
        self.target_c > 0.0 || self.duty > 0
    }
}

// ---------------------------------------------------------------------------
// Motor drivers
// ---------------------------------------------------------------------------

/// Identity of a motor-driver enable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverAxis {
    X,
    Y,
    Z,
    X2,
    Y2,
    Z2,
    /// Extruder stepper by index (0-based).
    E(u8),
}

impl DriverAxis {
    /// Bit position inside a [`DriverSet`]; `None` for an extruder index
    /// beyond [`MAX_E_STEPPERS`].
    const fn bit(self) -> Option<u16> {
        match self {
            Self::X => Some(0),
            Self::Y => Some(1),
            Self::Z => Some(2),
            Self::X2 => Some(3),
            Self::Y2 => Some(4),
            Self::Z2 => Some(5),
            Self::E(n) if (n as usize) < MAX_E_STEPPERS => Some(6 + n as u16),
            Self::E(_) => None,
        }
    }

    /// Whether the axis fits in a [`DriverSet`].
    pub const fn is_tracked(self) -> bool {
        self.bit().is_some()
    }

    fn from_bit(bit: u16) -> Self {
        match bit {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::Z,
            3 => Self::X2,
            4 => Self::Y2,
            5 => Self::Z2,
            n => Self::E((n - 6) as u8),
        }
    }
}

impl fmt::Display for DriverAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
            Self::X2 => write!(f, "X2"),
            Self::Y2 => write!(f, "Y2"),
            Self::Z2 => write!(f, "Z2"),
            Self::E(n) => write!(f, "E{n}"),
        }
    }
}

/// Bitset of drivers whose enable line is currently asserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSet(u16);

impl DriverSet {
    const USED_BITS: u16 = 6 + MAX_E_STEPPERS as u16;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Untracked axes are ignored.
    pub fn insert(&mut self, axis: DriverAxis) {
        if let Some(bit) = axis.bit() {
            self.0 |= 1 << bit;
        }
    }

    pub fn contains(&self, axis: DriverAxis) -> bool {
        axis.bit().is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = DriverAxis> + '_ {
        (0..Self::USED_BITS)
            .filter(|b| self.0 & (1 << b) != 0)
            .map(DriverAxis::from_bit)
    }
}

impl FromIterator<DriverAxis> for DriverSet {
    fn from_iter<I: IntoIterator<Item = DriverAxis>>(iter: I) -> Self {
        let mut set = Self::empty();
        for axis in iter {
            set.insert(axis);
        }
        set
    }
}

impl fmt::Display for DriverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for axis in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{axis}")?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Every peripheral signal the need evaluator consults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitySnapshot {
    /// Commanded speed of each general-purpose fan (0 = off).
    pub fan_speeds: heapless::Vec<u8, MAX_FANS>,
    /// Commanded speed of each extruder auto fan (0 = off).
    pub auto_fan_speeds: heapless::Vec<u8, MAX_HOTENDS>,
    /// Controller (electronics) fan state; `None` if not fitted.
    pub controller_fan_active: Option<bool>,
    /// Chamber fan speed; `None` if not fitted.
    pub chamber_fan_speed: Option<u8>,
    /// Drivers whose enable line is asserted.
    pub drivers_enabled: DriverSet,
    /// Per-hotend heater state.
    pub hotends: heapless::Vec<HeaterActivity, MAX_HOTENDS>,
    /// Heated bed; `None` if not fitted.
    pub bed: Option<HeaterActivity>,
    /// Measured chamber temperature (°C); `None` if not fitted.
    pub chamber_temp_c: Option<f32>,
}

impl ActivitySnapshot {
    /// A machine with nothing running: no fans, no drivers, no heaters.
    pub fn idle() -> Self {
        Self::default()
    }
}
