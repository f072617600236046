//! Hourly merit-order dispatch.
//!
//! One call to [`dispatch_hour`] covers one hour:
//!
//! 1. Effective demand is raw demand times the load multiplier, grossed up by
//!    grid losses.
//! 2. Nuclear, PV and wind produce unconditionally.
//! 3. Flexible units still inside their minimum uptime produce their minimum
//!    load whatever happens next.
//! 4. A remaining deficit is covered by storage discharge, flexible units in
//!    merit order, import, and finally recorded as shortage.
//! 5. A remaining surplus goes to storage charge, export, and finally dump.
//!
//! A flexible unit started to cover a deficit may overshoot it because of its
//! minimum load. The overshoot first cancels storage discharged earlier in the
//! same hour (last device first), then follows the surplus order of step 5.

use tracing::debug;

use crate::devices::{
    FlexTable, FlexibleSource, Kind, Source, SourceClass, SourceTable, StorageKind, StorageState,
    StorageTable, UnitHour, UnitMode, UnitState,
};

use super::grid::Grid;
use super::types::{GridState, HourInput, HourlyRecord};

/// Deficits and surpluses smaller than this are treated as zero (MW).
pub const EPSILON_MW: f64 = 1e-9;

/// Capacity factor applied to a source in the given hour.
fn capacity_factor(source: Source, input: &HourInput) -> f64 {
    match source.class() {
        SourceClass::Baseload => 1.0,
        SourceClass::Intermittent => match source {
            Source::Pv => input.pv_cf,
            _ => input.wind_cf,
        },
        SourceClass::Flexible(_) => 0.0,
    }
}

/// Places `surplus_mw` into storage charge, then export, then dump.
///
/// Returns the signed net import and the dump. A device only charges once any
/// discharge it made this hour has been fully cancelled, so charge adds to a
/// zero `storage_mw` entry.
fn absorb_surplus(
    grid: &Grid,
    storage: &mut StorageTable<StorageState>,
    storage_mw: &mut StorageTable<f64>,
    surplus_mw: f64,
) -> (f64, f64) {
    let mut surplus = surplus_mw;
    for &kind in StorageKind::ALL {
        if surplus <= EPSILON_MW {
            break;
        }
        let accepted = grid.storage[kind].charge(&mut storage[kind], surplus);
        if accepted > 0.0 {
            storage_mw[kind] -= accepted;
            surplus -= accepted;
        }
    }

    let exported = grid.cross_border.export(surplus);
    let net_import_mw = if exported > 0.0 { -exported } else { 0.0 };
    (net_import_mw, (surplus - exported).max(0.0))
}

/// Dispatches one hour and returns the state for the next hour with the hour's record.
///
/// Never fails: shortage and dump absorb whatever the grid cannot balance.
pub fn dispatch_hour(
    grid: &Grid,
    state: GridState,
    hour: usize,
    input: &HourInput,
) -> (GridState, HourlyRecord) {
    let GridState {
        units: unit_states,
        mut storage,
    } = state;

    let demand_mw = input.demand_mw * grid.load_multiplier;
    let effective_demand_mw = demand_mw * (1.0 + grid.grid_losses);

    let mut generation: SourceTable<f64> =
        SourceTable::from_fn(|source| grid.sources[source].net_output_mw(capacity_factor(source, input)));
    let inflexible_mw = generation.total();

    let forced: FlexTable<f64> =
        FlexTable::from_fn(|unit| grid.units[unit].forced_output_mw(unit_states[unit]));
    let residual_mw = effective_demand_mw - inflexible_mw - forced.total();

    // Outcome for units that are not asked for more than their forced minimum.
    let mut outcomes: FlexTable<UnitHour> =
        FlexTable::from_fn(|unit| grid.units[unit].advance(unit_states[unit], forced[unit]));

    let mut storage_mw = StorageTable::<f64>::default();
    let mut net_import_mw = 0.0;
    let mut shortage_mw = 0.0;
    let mut dump_mw = 0.0;

    if residual_mw > EPSILON_MW {
        let mut deficit = residual_mw;

        for &kind in StorageKind::ALL {
            let delivered = grid.storage[kind].discharge(&mut storage[kind], deficit);
            storage_mw[kind] = delivered;
            deficit -= delivered;
        }

        for &unit in &grid.merit_order {
            let outcome = grid.units[unit].advance(unit_states[unit], forced[unit] + deficit.max(0.0));
            deficit -= outcome.output_mw - forced[unit];
            outcomes[unit] = outcome;
        }

        if deficit > EPSILON_MW {
            let imported = grid.cross_border.import(deficit);
            net_import_mw = imported;
            shortage_mw = (deficit - imported).max(0.0);
        } else if deficit < -EPSILON_MW {
            let mut excess = -deficit;
            for &kind in StorageKind::ALL.iter().rev() {
                let reversed =
                    grid.storage[kind].cancel_discharge(&mut storage[kind], storage_mw[kind], excess);
                storage_mw[kind] -= reversed;
                excess -= reversed;
            }
            (net_import_mw, dump_mw) =
                absorb_surplus(grid, &mut storage, &mut storage_mw, excess);
        }
    } else {
        (net_import_mw, dump_mw) =
            absorb_surplus(grid, &mut storage, &mut storage_mw, -residual_mw);
    }

    for &unit in FlexibleSource::ALL {
        let outcome = &outcomes[unit];
        generation[unit.source()] = outcome.output_mw;
        if outcome.started {
            debug!(hour, unit = unit.name(), "unit start-up");
        } else if matches!(unit_states[unit], UnitState::On { .. }) && outcome.mode == UnitMode::Off {
            debug!(hour, unit = unit.name(), "unit shut-down");
        }
    }

    let next = GridState {
        units: outcomes.map(|_, outcome| outcome.next),
        storage,
    };

    let record = HourlyRecord {
        hour,
        demand_mw,
        effective_demand_mw,
        generation,
        storage_mw,
        storage_energy_mwh: storage.map(|_, s| s.energy_mwh),
        unit_modes: outcomes.map(|_, outcome| outcome.mode),
        unit_starts: outcomes.map(|_, outcome| outcome.started),
        net_import_mw,
        shortage_mw,
        dump_mw,
    };

    (next, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{CrossBorderLink, InitialMode, PowerSource, StorageDevice, ThermalConstraints, ThermalUnit};
    use crate::sim::power_balance::balance_residual_mw;

    fn installed(nuclear: f64, pv: f64, wind: f64, gas: f64, coal: f64) -> SourceTable<PowerSource> {
        SourceTable::from_fn(|source| {
            let mw = match source {
                Source::Nuclear => nuclear,
                Source::Pv => pv,
                Source::Wind => wind,
                Source::Gas => gas,
                Source::Coal => coal,
                Source::Hydro | Source::Biomass => 0.0,
            };
            PowerSource::new(mw, 0.0)
        })
    }

    fn input(demand_mw: f64, pv_cf: f64, wind_cf: f64) -> HourInput {
        HourInput {
            demand_mw,
            pv_cf,
            wind_cf,
        }
    }

    fn assert_balanced(record: &HourlyRecord) {
        assert!(
            balance_residual_mw(record).abs() < 1e-6,
            "hour {} out of balance: {record}",
            record.hour
        );
    }

    #[test]
    fn inflexible_covers_demand_exactly() {
        let grid = Grid::new(installed(1000.0, 500.0, 500.0, 0.0, 0.0));
        let (_, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(1500.0, 0.5, 0.5));
        assert_eq!(r.inflexible_mw(), 1500.0);
        assert_eq!(r.shortage_mw, 0.0);
        assert_eq!(r.dump_mw, 0.0);
        assert_balanced(&r);
    }

    #[test]
    fn losses_and_multiplier_scale_demand() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 0.0, 0.0));
        grid.load_multiplier = 2.0;
        grid.grid_losses = 0.1;
        let (_, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(100.0, 0.0, 0.0));
        assert_eq!(r.demand_mw, 200.0);
        assert!((r.effective_demand_mw - 220.0).abs() < 1e-9);
        assert!((r.shortage_mw - 220.0).abs() < 1e-9);
    }

    #[test]
    fn deficit_prefers_storage_then_flexible_then_import() {
        let mut grid = Grid::new(installed(1000.0, 0.0, 0.0, 300.0, 0.0));
        grid.storage[StorageKind::Battery] = StorageDevice::new(200.0, 1000.0, 1.0);
        grid.initial_soc[StorageKind::Battery] = 1.0;
        grid.cross_border = CrossBorderLink::with_limits(100.0, 100.0);

        let (next, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(1650.0, 0.0, 0.0));
        assert_eq!(r.storage_output_mw(StorageKind::Battery), 200.0);
        assert_eq!(r.generation_mw(Source::Gas), 300.0);
        assert_eq!(r.net_import_mw, 100.0);
        assert_eq!(r.shortage_mw, 50.0);
        assert_eq!(next.storage[StorageKind::Battery].energy_mwh, 800.0);
        assert_balanced(&r);
    }

    #[test]
    fn merit_order_decides_which_unit_runs() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 500.0, 500.0));
        let (_, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(400.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Gas), 400.0);
        assert_eq!(r.generation_mw(Source::Coal), 0.0);

        grid.merit_order = [
            FlexibleSource::Coal,
            FlexibleSource::Hydro,
            FlexibleSource::Biomass,
            FlexibleSource::Gas,
        ];
        let (_, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(400.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Coal), 400.0);
        assert_eq!(r.generation_mw(Source::Gas), 0.0);
    }

    #[test]
    fn surplus_charges_storage_then_exports_then_dumps() {
        let mut grid = Grid::new(installed(0.0, 1000.0, 0.0, 0.0, 0.0));
        grid.storage[StorageKind::Pumped] = StorageDevice::new(300.0, 10_000.0, 0.75);
        grid.storage[StorageKind::Battery] = StorageDevice::new(100.0, 10_000.0, 0.9);
        grid.cross_border = CrossBorderLink::with_limits(0.0, 250.0);

        let (next, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(200.0, 1.0, 0.0));
        assert_eq!(r.storage_output_mw(StorageKind::Pumped), -300.0);
        assert_eq!(r.storage_output_mw(StorageKind::Battery), -100.0);
        assert_eq!(r.export_mw(), 250.0);
        assert_eq!(r.dump_mw, 150.0);
        assert_eq!(next.storage[StorageKind::Pumped].energy_mwh, 225.0);
        assert!((next.storage[StorageKind::Battery].energy_mwh - 90.0).abs() < 1e-9);
        assert_balanced(&r);
    }

    #[test]
    fn starting_unit_leaves_deficit_to_import() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 0.0, 1000.0));
        grid.units[FlexibleSource::Coal] = ThermalUnit::new(
            1000.0,
            ThermalConstraints {
                min_load: 0.4,
                min_uptime: 4,
                min_downtime: 2,
                startup_hours: 2,
            },
        );
        grid.cross_border = CrossBorderLink::with_limits(1000.0, 1000.0);

        let mut state = grid.initial_state();
        let mut records = Vec::new();
        for hour in 0..3 {
            let (next, r) = dispatch_hour(&grid, state, hour, &input(600.0, 0.0, 0.0));
            assert_balanced(&r);
            records.push(r);
            state = next;
        }
        assert_eq!(records[0].unit_modes[FlexibleSource::Coal], UnitMode::Starting);
        assert!(records[0].unit_starts[FlexibleSource::Coal]);
        assert_eq!(records[0].net_import_mw, 600.0);
        assert_eq!(records[1].unit_modes[FlexibleSource::Coal], UnitMode::Starting);
        assert_eq!(records[2].unit_modes[FlexibleSource::Coal], UnitMode::On);
        assert_eq!(records[2].generation_mw(Source::Coal), 600.0);
        assert_eq!(records[2].net_import_mw, 0.0);
    }

    #[test]
    fn forced_minimum_is_exported_when_not_needed() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 0.0, 1000.0));
        grid.units[FlexibleSource::Coal] = ThermalUnit::new(
            1000.0,
            ThermalConstraints {
                min_load: 0.4,
                min_uptime: 4,
                ..Default::default()
            },
        );
        grid.cross_border = CrossBorderLink::with_limits(0.0, 100.0);
        let mut state = grid.initial_state();
        state.units[FlexibleSource::Coal] = UnitState::On { hours_on: 1 };

        let (next, r) = dispatch_hour(&grid, state, 0, &input(0.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Coal), 400.0);
        assert_eq!(r.export_mw(), 100.0);
        assert_eq!(r.dump_mw, 300.0);
        assert_eq!(next.units[FlexibleSource::Coal], UnitState::On { hours_on: 2 });
        assert_balanced(&r);
    }

    #[test]
    fn min_load_overshoot_returns_to_storage_first() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 0.0, 1000.0));
        grid.units[FlexibleSource::Coal] = ThermalUnit::new(
            1000.0,
            ThermalConstraints {
                min_load: 0.5,
                ..Default::default()
            },
        );
        grid.storage[StorageKind::Battery] = StorageDevice::new(100.0, 1000.0, 1.0);
        grid.initial_soc[StorageKind::Battery] = 1.0;

        // 600 MW deficit: battery gives 100, coal must run at >= 500 and covers 500 exactly.
        let (_, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(600.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Coal), 500.0);
        assert_eq!(r.storage_output_mw(StorageKind::Battery), 100.0);
        assert_balanced(&r);

        // 300 MW deficit: coal's 500 MW minimum overshoots, the battery hands its 100 MW back.
        let (next, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(300.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Coal), 500.0);
        assert_eq!(r.storage_output_mw(StorageKind::Battery), 0.0);
        assert_eq!(r.dump_mw, 200.0);
        assert_eq!(next.storage[StorageKind::Battery].energy_mwh, 1000.0);
        assert_balanced(&r);
    }

    #[test]
    fn min_load_overshoot_charges_empty_storage_before_export() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 0.0, 1000.0));
        grid.units[FlexibleSource::Coal] = ThermalUnit::new(
            1000.0,
            ThermalConstraints {
                min_load: 0.5,
                ..Default::default()
            },
        );
        grid.storage[StorageKind::Battery] = StorageDevice::new(500.0, 1000.0, 0.9);
        grid.cross_border = CrossBorderLink::with_limits(1000.0, 1000.0);
        let mut state = grid.initial_state();
        state.units[FlexibleSource::Coal] = UnitState::On { hours_on: 10 };

        let (next, r) = dispatch_hour(&grid, state, 0, &input(200.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Coal), 500.0);
        assert_eq!(r.storage_output_mw(StorageKind::Battery), -300.0);
        assert_eq!(r.net_import_mw, 0.0);
        assert_eq!(r.dump_mw, 0.0);
        assert!((next.storage[StorageKind::Battery].energy_mwh - 270.0).abs() < 1e-9);
        assert_balanced(&r);
    }

    #[test]
    fn overshoot_cancels_discharge_then_charges_in_device_order() {
        let mut grid = Grid::new(installed(0.0, 0.0, 0.0, 0.0, 1000.0));
        grid.units[FlexibleSource::Coal] = ThermalUnit::new(
            1000.0,
            ThermalConstraints {
                min_load: 0.5,
                ..Default::default()
            },
        );
        grid.storage[StorageKind::Pumped] = StorageDevice::new(100.0, 1000.0, 1.0);
        grid.initial_soc[StorageKind::Pumped] = 0.5;
        grid.storage[StorageKind::Battery] = StorageDevice::new(500.0, 1000.0, 0.9);

        // Pumped hydro covers 100 of the 300 MW deficit, coal's 500 MW minimum
        // leaves 300 MW over: 100 cancels the discharge, pumped then charges
        // 100 and the battery takes the last 100.
        let (next, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(300.0, 0.0, 0.0));
        assert_eq!(r.generation_mw(Source::Coal), 500.0);
        assert_eq!(r.storage_output_mw(StorageKind::Pumped), -100.0);
        assert_eq!(r.storage_output_mw(StorageKind::Battery), -100.0);
        assert_eq!(r.dump_mw, 0.0);
        assert!((next.storage[StorageKind::Pumped].energy_mwh - 600.0).abs() < 1e-9);
        assert!((next.storage[StorageKind::Battery].energy_mwh - 90.0).abs() < 1e-9);
        assert_balanced(&r);
    }

    #[test]
    fn zero_demand_never_starts_units() {
        let mut grid = Grid::new(installed(0.0, 400.0, 400.0, 800.0, 800.0));
        grid.initial_modes[FlexibleSource::Gas] = InitialMode::Off;
        let (next, r) = dispatch_hour(&grid, grid.initial_state(), 0, &input(0.0, 0.5, 0.5));
        assert_eq!(r.flexible_mw(), 0.0);
        assert!(r.unit_starts.values().all(|s| !s));
        assert_eq!(r.dump_mw, 400.0);
        assert_eq!(next.units, grid.initial_state().units.map(|_, s| match *s {
            UnitState::Off { hours_off } => UnitState::Off { hours_off: hours_off + 1 },
            other => other,
        }));
    }
}
