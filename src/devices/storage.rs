use std::fmt;

use super::types::{Kind, Table};

/// Storage technologies, in the fixed order they are charged and discharged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Pumped,
    Battery,
    P2g,
}

impl StorageKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pumped => "Pumped hydro",
            Self::Battery => "Battery",
            Self::P2g => "Power-to-gas",
        }
    }
}

impl Kind for StorageKind {
    const ALL: &'static [Self] = &[Self::Pumped, Self::Battery, Self::P2g];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Pumped => "pumped",
            Self::Battery => "battery",
            Self::P2g => "p2g",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per storage device.
pub type StorageTable<T> = Table<StorageKind, T, 3>;

/// Energy held by one storage device between hours.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StorageState {
    /// Stored energy (MWh), always within `[0, max_energy_mwh]`.
    pub energy_mwh: f64,
}

/// Static parameters of an aggregate storage device.
///
/// Timesteps are one hour long, so a power of `P` MW held for the step moves
/// `P` MWh. Conversion losses are applied when charging only.
///
/// # Power Flow Convention
/// - `charge` consumes power from the grid
/// - `discharge` delivers power to the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageDevice {
    /// Maximum charging and discharging power (MW).
    pub capacity_mw: f64,
    /// Maximum stored energy (MWh).
    pub max_energy_mwh: f64,
    /// Fraction of charging power that ends up stored, in `(0, 1]`.
    pub efficiency: f64,
}

impl StorageDevice {
    /// Creates a storage device.
    ///
    /// # Panics
    ///
    /// Panics if a capacity is negative or `efficiency` is outside `(0, 1]`.
    pub fn new(capacity_mw: f64, max_energy_mwh: f64, efficiency: f64) -> Self {
        assert!(capacity_mw >= 0.0 && max_energy_mwh >= 0.0);
        assert!(efficiency > 0.0 && efficiency <= 1.0);
        Self {
            capacity_mw,
            max_energy_mwh,
            efficiency,
        }
    }

    /// State holding `soc` of the maximum energy.
    pub fn state_at_soc(&self, soc: f64) -> StorageState {
        StorageState {
            energy_mwh: self.max_energy_mwh * soc.clamp(0.0, 1.0),
        }
    }

    /// Largest charging power the device can accept in the current state (MW).
    pub fn available_charge_mw(&self, state: &StorageState) -> f64 {
        let headroom_mwh = (self.max_energy_mwh - state.energy_mwh).max(0.0);
        self.capacity_mw.min(headroom_mwh / self.efficiency)
    }

    /// Largest discharging power the device can deliver in the current state (MW).
    pub fn available_discharge_mw(&self, state: &StorageState) -> f64 {
        self.capacity_mw.min(state.energy_mwh.max(0.0))
    }

    /// Charges with up to `power_mw` and returns the power actually accepted.
    pub fn charge(&self, state: &mut StorageState, power_mw: f64) -> f64 {
        let accepted = power_mw.max(0.0).min(self.available_charge_mw(state));
        state.energy_mwh = (state.energy_mwh + accepted * self.efficiency).min(self.max_energy_mwh);
        accepted
    }

    /// Discharges up to `power_mw` and returns the power actually delivered.
    pub fn discharge(&self, state: &mut StorageState, power_mw: f64) -> f64 {
        let delivered = power_mw.max(0.0).min(self.available_discharge_mw(state));
        state.energy_mwh = (state.energy_mwh - delivered).max(0.0);
        delivered
    }

    /// Reverses up to `power_mw` of a discharge made in the same hour.
    ///
    /// `discharged_mw` is what [`StorageDevice::discharge`] delivered this hour;
    /// the amount reversed never exceeds it. Returns the power taken back.
    pub fn cancel_discharge(
        &self,
        state: &mut StorageState,
        discharged_mw: f64,
        power_mw: f64,
    ) -> f64 {
        let reversed = power_mw.max(0.0).min(discharged_mw.max(0.0));
        state.energy_mwh = (state.energy_mwh + reversed).min(self.max_energy_mwh);
        reversed
    }
}
