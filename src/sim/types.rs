//! Core simulation types: hourly inputs, carried state, and result records.

use std::fmt;

use crate::devices::{
    FlexTable, Kind, Source, SourceTable, StorageKind, StorageState, StorageTable, UnitMode,
    UnitState,
};

/// Exogenous data for one simulated hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourInput {
    /// Raw demand before the load multiplier and grid losses (MW).
    pub demand_mw: f64,
    /// Solar PV capacity factor in `[0, 1]`.
    pub pv_cf: f64,
    /// Wind capacity factor in `[0, 1]`.
    pub wind_cf: f64,
}

/// Everything carried from one hour to the next.
///
/// Passed by value into [`dispatch_hour`](super::dispatch::dispatch_hour) and
/// returned updated, so a single hour can be replayed from any snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridState {
    /// Operating state of every flexible unit.
    pub units: FlexTable<UnitState>,
    /// Stored energy of every storage device.
    pub storage: StorageTable<StorageState>,
}

/// Complete record of one simulated hour.
///
/// Storage and cross-border flows are signed from the grid's point of view:
/// positive values feed the grid, negative values draw from it.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Hour index from the start of the run.
    pub hour: usize,
    /// Demand after the load multiplier, before losses (MW).
    pub demand_mw: f64,
    /// Demand grossed up by transmission and distribution losses (MW).
    pub effective_demand_mw: f64,
    /// Net generation per source (MW).
    pub generation: SourceTable<f64>,
    /// Storage output per device (MW; positive=discharge, negative=charge).
    pub storage_mw: StorageTable<f64>,
    /// Stored energy per device at the end of the hour (MWh).
    pub storage_energy_mwh: StorageTable<f64>,
    /// Operating mode of each flexible unit during the hour.
    pub unit_modes: FlexTable<UnitMode>,
    /// Flexible units that left `Off` during the hour.
    pub unit_starts: FlexTable<bool>,
    /// Cross-border flow (MW; positive=import, negative=export).
    pub net_import_mw: f64,
    /// Unmet demand (MW).
    pub shortage_mw: f64,
    /// Generation that could be neither used, stored nor exported (MW).
    pub dump_mw: f64,
}

/// Chronological sequence of hourly records for one run.
pub type ResultTable = Vec<HourlyRecord>;

impl HourlyRecord {
    /// Net generation of nuclear, PV and wind (MW).
    pub fn inflexible_mw(&self) -> f64 {
        self.generation
            .iter()
            .filter(|(source, _)| source.is_inflexible())
            .map(|(_, mw)| mw)
            .sum()
    }

    /// Net generation of the flexible units (MW).
    pub fn flexible_mw(&self) -> f64 {
        self.generation.total() - self.inflexible_mw()
    }

    /// Total storage discharge (MW, positive).
    pub fn discharge_mw(&self) -> f64 {
        self.storage_mw.values().map(|p| p.max(0.0)).sum()
    }

    /// Total storage charge (MW, positive magnitude).
    pub fn charge_mw(&self) -> f64 {
        self.storage_mw.values().map(|p| (-p).max(0.0)).sum()
    }

    /// Import across the border (MW, positive).
    pub fn import_mw(&self) -> f64 {
        self.net_import_mw.max(0.0)
    }

    /// Export across the border (MW, positive magnitude).
    pub fn export_mw(&self) -> f64 {
        (-self.net_import_mw).max(0.0)
    }

    /// Net generation of one source (MW).
    pub fn generation_mw(&self, source: Source) -> f64 {
        self.generation[source]
    }

    /// Signed output of one storage device (MW).
    pub fn storage_output_mw(&self, kind: StorageKind) -> f64 {
        self.storage_mw[kind]
    }
}

impl fmt::Display for HourlyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>4} | demand={:>9.1} MW  effective={:>9.1} MW | inflex={:.1}  flex={:.1} \
             | storage={:+.1} | border={:+.1} | shortage={:.1}  dump={:.1} |",
            self.hour,
            self.demand_mw,
            self.effective_demand_mw,
            self.inflexible_mw(),
            self.flexible_mw(),
            self.storage_mw.total(),
            self.net_import_mw,
            self.shortage_mw,
            self.dump_mw,
        )?;
        for (unit, mode) in self.unit_modes.iter() {
            write!(f, " {}={}", unit.name(), mode.as_str())?;
        }
        Ok(())
    }
}
