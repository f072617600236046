//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use grid_sim::config::{FlexiblePlantConfig, GridConfig, PlantConfig, PlantsConfig};
use grid_sim::devices::{FlexibleSource, Kind, StorageKind, StorageState, UnitMode};
use grid_sim::sim::{Engine, Grid, HourlyRecord, ResultTable};
use grid_sim::world::{SyntheticYear, TimeSeries};

/// Hours in a non-leap year.
pub const YEAR_HOURS: usize = 8760;

/// Energy balance tolerance (MW).
pub const TOLERANCE_MW: f64 = 1e-6;

/// Synthetic world with default parameters.
pub fn synthetic_world(hours: usize, seed: u64) -> TimeSeries {
    SyntheticYear::default().generate(hours, seed)
}

/// World with the same demand and capacity factors every hour.
pub fn flat_world(hours: usize, demand_mw: f64, pv_cf: f64, wind_cf: f64) -> TimeSeries {
    TimeSeries::new(vec![demand_mw; hours], vec![pv_cf; hours], vec![wind_cf; hours])
        .unwrap_or_else(|e| panic!("flat world should be valid: {e}"))
}

/// Builds and validates the grid described by `config`.
pub fn grid(config: &GridConfig) -> Grid {
    config
        .to_grid()
        .unwrap_or_else(|errors| panic!("config should be valid: {errors:?}"))
}

/// Runs `config` over `world` and returns every hourly record.
pub fn run(config: &GridConfig, world: TimeSeries) -> ResultTable {
    let mut engine = Engine::from_config(config, world)
        .unwrap_or_else(|e| panic!("engine should build: {e}"));
    engine.run()
}

/// Small lossless grid: 1000 MW nuclear, 500 MW PV, 500 MW wind and 700 MW of
/// gas that starts instantly. No storage, closed border.
pub fn small_config() -> GridConfig {
    GridConfig {
        consumption: Default::default(),
        plants: PlantsConfig {
            nuclear: plant(1000.0),
            pv: plant(500.0),
            wind: plant(500.0),
            gas: FlexiblePlantConfig {
                installed_mw: 700.0,
                min_load: 0.3,
                min_uptime_hours: 2,
                ..Default::default()
            },
            ..Default::default()
        },
        storage: Default::default(),
        cross_border: Default::default(),
        dispatch: Default::default(),
    }
}

pub fn plant(installed_mw: f64) -> PlantConfig {
    PlantConfig {
        installed_mw,
        self_consumption: 0.0,
    }
}

/// Asserts that every hour balances within [`TOLERANCE_MW`].
pub fn assert_balanced(records: &[HourlyRecord]) {
    for r in records {
        let residual = grid_sim::sim::power_balance::balance_residual_mw(r);
        assert!(
            residual.abs() <= TOLERANCE_MW,
            "hour {} out of balance by {residual} MW",
            r.hour
        );
    }
}

/// Asserts that storage stays within its power and energy limits and that
/// every change in stored energy matches the hour's signed flow.
pub fn assert_storage_consistent(grid: &Grid, records: &[HourlyRecord]) {
    let initial = grid.initial_state();
    for &kind in StorageKind::ALL {
        let device = &grid.storage[kind];
        let mut previous = initial.storage[kind].energy_mwh;
        for r in records {
            let flow = r.storage_mw[kind];
            let energy = r.storage_energy_mwh[kind];
            assert!(
                flow.abs() <= device.capacity_mw + TOLERANCE_MW,
                "{} flow {flow} MW exceeds capacity at hour {}",
                kind.name(),
                r.hour
            );
            assert!(
                energy >= -TOLERANCE_MW && energy <= device.max_energy_mwh + TOLERANCE_MW,
                "{} energy {energy} MWh out of bounds at hour {}",
                kind.name(),
                r.hour
            );
            let expected = if flow > 0.0 {
                previous - flow
            } else {
                previous - flow * device.efficiency
            };
            assert!(
                (energy - expected).abs() <= 1e-6 * device.max_energy_mwh.max(1.0),
                "{} energy {energy} MWh does not follow flow {flow} MW at hour {}",
                kind.name(),
                r.hour
            );
            previous = energy;
        }
    }
}

/// Asserts that export only happens once storage can take no more charge this
/// hour, and dump only once export is also at its limit.
pub fn assert_surplus_order(grid: &Grid, records: &[HourlyRecord]) {
    for r in records {
        if r.export_mw() <= TOLERANCE_MW && r.dump_mw <= TOLERANCE_MW {
            continue;
        }
        for &kind in StorageKind::ALL {
            let device = &grid.storage[kind];
            let after = StorageState {
                energy_mwh: r.storage_energy_mwh[kind],
            };
            let spare_mw = device
                .available_charge_mw(&after)
                .min(device.capacity_mw + r.storage_mw[kind]);
            assert!(
                spare_mw <= TOLERANCE_MW,
                "{} could still charge {spare_mw} MW while exporting at hour {}",
                kind.name(),
                r.hour
            );
        }
        if r.dump_mw > TOLERANCE_MW {
            assert!(
                (r.export_mw() - grid.cross_border.max_export_mw()).abs() <= TOLERANCE_MW,
                "dumped {} MW below the export limit at hour {}",
                r.dump_mw,
                r.hour
            );
        }
    }
}

/// Asserts start-up durations, minimum uptime and minimum downtime for every
/// flexible unit. Runs cut short by the end of the series are exempt.
pub fn assert_thermal_constraints(grid: &Grid, records: &[HourlyRecord]) {
    for &unit in FlexibleSource::ALL {
        let c = *grid.units[unit].constraints();
        let modes: Vec<UnitMode> = records.iter().map(|r| r.unit_modes[unit]).collect();

        let mut start = 0;
        while start < modes.len() {
            let mode = modes[start];
            let mut end = start;
            while end < modes.len() && modes[end] == mode {
                end += 1;
            }
            let len = end - start;
            let truncated = end == modes.len();
            let previous = start.checked_sub(1).map(|i| modes[i]);

            match mode {
                UnitMode::Starting => {
                    assert!(
                        len == c.startup_hours as usize || truncated,
                        "{} started for {len} hours at hour {start}",
                        unit.name()
                    );
                    assert!(c.startup_hours > 0, "{} never starts up", unit.name());
                }
                UnitMode::On => {
                    let initially_on = previous.is_none();
                    assert!(
                        len >= c.min_uptime as usize || truncated || initially_on,
                        "{} ran for only {len} hours from hour {start}",
                        unit.name()
                    );
                }
                UnitMode::Off => {
                    let after_run = previous == Some(UnitMode::On);
                    assert!(
                        len >= c.min_downtime as usize || truncated || !after_run,
                        "{} rested for only {len} hours from hour {start}",
                        unit.name()
                    );
                    assert_ne!(
                        previous,
                        Some(UnitMode::Starting),
                        "{} stopped during start-up",
                        unit.name()
                    );
                }
            }

            if mode == UnitMode::On && previous == Some(UnitMode::Off) {
                assert_eq!(c.startup_hours, 0, "{} skipped its start-up", unit.name());
            }
            start = end;
        }

        for r in records {
            let output = r.generation[unit.source()];
            match r.unit_modes[unit] {
                UnitMode::On => assert!(
                    output >= grid.units[unit].min_output_mw() - TOLERANCE_MW
                        && output <= grid.units[unit].max_output_mw() + TOLERANCE_MW,
                    "{} output {output} MW outside its operating range at hour {}",
                    unit.name(),
                    r.hour
                ),
                UnitMode::Off | UnitMode::Starting => assert_eq!(
                    output,
                    0.0,
                    "{} produced while not online at hour {}",
                    unit.name(),
                    r.hour
                ),
            }
        }
    }
}
