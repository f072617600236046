//! Static grid parameters shared by every simulated hour.

use crate::devices::{
    CrossBorderLink, FlexTable, FlexibleSource, InitialMode, PowerSource, SourceTable,
    StorageDevice, StorageTable, ThermalUnit,
};

use super::types::GridState;

/// Immutable description of the grid for one run.
///
/// Built from a validated [`GridConfig`](crate::config::GridConfig), or directly
/// in tests.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Installed capacity and self-consumption per source.
    pub sources: SourceTable<PowerSource>,
    /// Operating limits per flexible unit, sized on net output.
    pub units: FlexTable<ThermalUnit>,
    /// Mode of each flexible unit at hour zero.
    pub initial_modes: FlexTable<InitialMode>,
    /// Storage devices, charged and discharged in canonical order.
    pub storage: StorageTable<StorageDevice>,
    /// State of charge of each device at hour zero, in `[0, 1]`.
    pub initial_soc: StorageTable<f64>,
    pub cross_border: CrossBorderLink,
    /// Order in which flexible units cover a deficit.
    pub merit_order: [FlexibleSource; 4],
    /// Multiplier applied to raw demand.
    pub load_multiplier: f64,
    /// Combined transmission and distribution loss fraction.
    pub grid_losses: f64,
}

impl Grid {
    /// Builds a grid whose flexible units are sized from `sources`.
    ///
    /// Everything else starts empty: no storage, a closed border, default merit
    /// order, unit load multiplier and no losses.
    pub fn new(sources: SourceTable<PowerSource>) -> Self {
        let units = FlexTable::from_fn(|unit: FlexibleSource| {
            ThermalUnit::new(sources[unit.source()].max_net_mw(), Default::default())
        });
        Self {
            sources,
            units,
            initial_modes: FlexTable::default(),
            storage: StorageTable::from_fn(|_| StorageDevice::new(0.0, 0.0, 1.0)),
            initial_soc: StorageTable::default(),
            cross_border: CrossBorderLink::closed(),
            merit_order: FlexibleSource::DEFAULT_MERIT_ORDER,
            load_multiplier: 1.0,
            grid_losses: 0.0,
        }
    }

    /// State at the start of the run.
    pub fn initial_state(&self) -> GridState {
        GridState {
            units: FlexTable::from_fn(|unit| self.units[unit].initial_state(self.initial_modes[unit])),
            storage: StorageTable::from_fn(|kind| self.storage[kind].state_at_soc(self.initial_soc[kind])),
        }
    }
}
