//! TOML-based grid configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::devices::{
    CrossBorderLink, FlexibleSource, InitialMode, Kind, PowerSource, Source, SourceTable,
    StorageDevice, StorageKind, ThermalConstraints, ThermalUnit,
};
pub use crate::error::ConfigError;
use crate::sim::grid::Grid;

/// Top-level grid configuration parsed from TOML.
///
/// Only `[plants]` is required; every other section falls back to an empty
/// default (no losses, no storage, closed border, default merit order). Load
/// from TOML with [`GridConfig::from_toml_file`] or start from a preset with
/// [`GridConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Demand scaling and grid losses.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Generation fleet.
    pub plants: PlantsConfig,
    /// Storage devices.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Cross-border transmission limits.
    #[serde(default)]
    pub cross_border: CrossBorderConfig,
    /// Flexible-unit priority.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Demand scaling and grid losses.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Multiplier applied to raw hourly demand.
    pub load_multiplier: f64,
    /// Transmission loss as a fraction of demand.
    pub transmission_loss: f64,
    /// Distribution loss as a fraction of demand.
    pub distribution_loss: f64,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            load_multiplier: 1.0,
            transmission_loss: 0.0,
            distribution_loss: 0.0,
        }
    }
}

/// An inflexible plant (nuclear, PV or wind).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantConfig {
    /// Installed capacity (MW).
    pub installed_mw: f64,
    /// Fraction of gross output consumed on site, in `[0, 1)`.
    #[serde(default)]
    pub self_consumption: f64,
}

/// A flexible plant with thermal operating limits.
///
/// The limits default to zero, which describes a unit that follows any
/// request instantly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlexiblePlantConfig {
    /// Installed capacity (MW).
    pub installed_mw: f64,
    /// Fraction of gross output consumed on site, in `[0, 1)`.
    #[serde(default)]
    pub self_consumption: f64,
    /// Minimum output while running, as a fraction of net capacity.
    #[serde(default)]
    pub min_load: f64,
    /// Minimum hours online once producing.
    #[serde(default)]
    pub min_uptime_hours: u32,
    /// Minimum hours offline before a restart.
    #[serde(default)]
    pub min_downtime_hours: u32,
    /// Hours spent starting up before producing.
    #[serde(default)]
    pub startup_hours: u32,
    /// Mode at hour zero.
    #[serde(default)]
    pub initial_mode: InitialMode,
}

impl FlexiblePlantConfig {
    fn constraints(&self) -> ThermalConstraints {
        ThermalConstraints {
            min_load: self.min_load,
            min_uptime: self.min_uptime_hours,
            min_downtime: self.min_downtime_hours,
            startup_hours: self.startup_hours,
        }
    }
}

/// Generation fleet. A missing plant is installed at zero capacity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantsConfig {
    pub nuclear: PlantConfig,
    pub pv: PlantConfig,
    pub wind: PlantConfig,
    pub hydro: FlexiblePlantConfig,
    pub biomass: FlexiblePlantConfig,
    pub gas: FlexiblePlantConfig,
    pub coal: FlexiblePlantConfig,
}

impl PlantsConfig {
    /// Installed capacity and self-consumption of `source`.
    pub fn capacity(&self, source: Source) -> (f64, f64) {
        match source {
            Source::Nuclear => (self.nuclear.installed_mw, self.nuclear.self_consumption),
            Source::Pv => (self.pv.installed_mw, self.pv.self_consumption),
            Source::Wind => (self.wind.installed_mw, self.wind.self_consumption),
            Source::Hydro | Source::Biomass | Source::Gas | Source::Coal => {
                let plant = match source {
                    Source::Hydro => &self.hydro,
                    Source::Biomass => &self.biomass,
                    Source::Gas => &self.gas,
                    _ => &self.coal,
                };
                (plant.installed_mw, plant.self_consumption)
            }
        }
    }

    /// Configuration of one flexible plant.
    pub fn flexible(&self, unit: FlexibleSource) -> &FlexiblePlantConfig {
        match unit {
            FlexibleSource::Hydro => &self.hydro,
            FlexibleSource::Biomass => &self.biomass,
            FlexibleSource::Gas => &self.gas,
            FlexibleSource::Coal => &self.coal,
        }
    }
}

/// One storage device.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageDeviceConfig {
    /// Charging and discharging power limit (MW).
    pub capacity_mw: f64,
    /// Maximum stored energy (MWh).
    pub max_energy_mwh: f64,
    /// Charging efficiency in `(0, 1]`.
    pub efficiency: f64,
    /// State of charge at hour zero in `[0, 1]`.
    pub initial_soc: f64,
}

impl Default for StorageDeviceConfig {
    fn default() -> Self {
        Self {
            capacity_mw: 0.0,
            max_energy_mwh: 0.0,
            efficiency: 1.0,
            initial_soc: 0.0,
        }
    }
}

/// Storage fleet. A missing device is installed at zero capacity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub pumped: StorageDeviceConfig,
    pub battery: StorageDeviceConfig,
    pub p2g: StorageDeviceConfig,
}

impl StorageConfig {
    /// Configuration of one device.
    pub fn device(&self, kind: StorageKind) -> &StorageDeviceConfig {
        match kind {
            StorageKind::Pumped => &self.pumped,
            StorageKind::Battery => &self.battery,
            StorageKind::P2g => &self.p2g,
        }
    }
}

/// Cross-border import/export limits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrossBorderConfig {
    /// Maximum export (MW, positive magnitude).
    pub max_export_mw: f64,
    /// Maximum import (MW); defaults to the export limit.
    pub max_import_mw: Option<f64>,
}

impl CrossBorderConfig {
    /// Effective import limit (MW).
    pub fn import_limit_mw(&self) -> f64 {
        self.max_import_mw.unwrap_or(self.max_export_mw)
    }
}

/// Flexible-unit priority.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Order in which flexible units cover a deficit; each unit exactly once.
    pub merit_order: Vec<FlexibleSource>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            merit_order: FlexibleSource::DEFAULT_MERIT_ORDER.to_vec(),
        }
    }
}

fn plant(installed_mw: f64, self_consumption: f64) -> PlantConfig {
    PlantConfig {
        installed_mw,
        self_consumption,
    }
}

fn storage(capacity_mw: f64, max_energy_mwh: f64, efficiency: f64, initial_soc: f64) -> StorageDeviceConfig {
    StorageDeviceConfig {
        capacity_mw,
        max_energy_mwh,
        efficiency,
        initial_soc,
    }
}

impl GridConfig {
    /// Returns the baseline preset: a present-day grid with a large coal fleet.
    pub fn baseline() -> Self {
        Self {
            consumption: ConsumptionConfig {
                load_multiplier: 1.0,
                transmission_loss: 0.03,
                distribution_loss: 0.05,
            },
            plants: PlantsConfig {
                nuclear: plant(4000.0, 0.06),
                pv: plant(3000.0, 0.0),
                wind: plant(1500.0, 0.0),
                hydro: FlexiblePlantConfig {
                    installed_mw: 2000.0,
                    self_consumption: 0.01,
                    ..FlexiblePlantConfig::default()
                },
                biomass: FlexiblePlantConfig {
                    installed_mw: 600.0,
                    self_consumption: 0.1,
                    min_load: 0.5,
                    min_uptime_hours: 6,
                    min_downtime_hours: 4,
                    startup_hours: 2,
                    initial_mode: InitialMode::Off,
                },
                gas: FlexiblePlantConfig {
                    installed_mw: 4000.0,
                    self_consumption: 0.03,
                    min_load: 0.3,
                    min_uptime_hours: 2,
                    min_downtime_hours: 1,
                    startup_hours: 1,
                    initial_mode: InitialMode::Off,
                },
                coal: FlexiblePlantConfig {
                    installed_mw: 5000.0,
                    self_consumption: 0.08,
                    min_load: 0.4,
                    min_uptime_hours: 12,
                    min_downtime_hours: 8,
                    startup_hours: 4,
                    initial_mode: InitialMode::On,
                },
            },
            storage: StorageConfig {
                pumped: storage(1500.0, 9000.0, 0.75, 0.5),
                battery: storage(500.0, 1000.0, 0.9, 0.5),
                p2g: StorageDeviceConfig::default(),
            },
            cross_border: CrossBorderConfig {
                max_export_mw: 2500.0,
                max_import_mw: None,
            },
            dispatch: DispatchConfig::default(),
        }
    }

    /// Returns the decarbonised preset: no coal, a large renewable fleet and
    /// seasonal power-to-gas storage.
    pub fn decarbonised() -> Self {
        let base = Self::baseline();
        Self {
            plants: PlantsConfig {
                pv: plant(12_000.0, 0.0),
                wind: plant(8000.0, 0.0),
                biomass: FlexiblePlantConfig {
                    installed_mw: 1200.0,
                    ..base.plants.biomass.clone()
                },
                gas: FlexiblePlantConfig {
                    installed_mw: 3000.0,
                    ..base.plants.gas.clone()
                },
                coal: FlexiblePlantConfig::default(),
                ..base.plants.clone()
            },
            storage: StorageConfig {
                pumped: storage(2500.0, 15_000.0, 0.75, 0.5),
                battery: storage(4000.0, 12_000.0, 0.9, 0.5),
                p2g: storage(2000.0, 500_000.0, 0.4, 0.2),
            },
            cross_border: CrossBorderConfig {
                max_export_mw: 4000.0,
                max_import_mw: Some(3000.0),
            },
            ..base
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "decarbonised"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "decarbonised" => Ok(Self::decarbonised()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, lacks a required field,
    /// or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let c = &self.consumption;
        non_negative(&mut errors, "consumption.load_multiplier", c.load_multiplier);
        fraction_below_one(&mut errors, "consumption.transmission_loss", c.transmission_loss);
        fraction_below_one(&mut errors, "consumption.distribution_loss", c.distribution_loss);
        if c.transmission_loss + c.distribution_loss >= 1.0 {
            errors.push(ConfigError::new(
                "consumption.distribution_loss",
                "transmission_loss + distribution_loss must be < 1.0",
            ));
        }

        for &source in Source::ALL {
            let (installed_mw, self_consumption) = self.plants.capacity(source);
            let prefix = format!("plants.{}", source.name());
            non_negative(&mut errors, &format!("{prefix}.installed_mw"), installed_mw);
            fraction_below_one(&mut errors, &format!("{prefix}.self_consumption"), self_consumption);
        }
        for &unit in FlexibleSource::ALL {
            let plant = self.plants.flexible(unit);
            if !(0.0..=1.0).contains(&plant.min_load) {
                errors.push(ConfigError::new(
                    format!("plants.{}.min_load", unit.name()),
                    "must be in [0.0, 1.0]",
                ));
            }
        }

        for &kind in StorageKind::ALL {
            let device = self.storage.device(kind);
            let prefix = format!("storage.{}", kind.name());
            non_negative(&mut errors, &format!("{prefix}.capacity_mw"), device.capacity_mw);
            non_negative(&mut errors, &format!("{prefix}.max_energy_mwh"), device.max_energy_mwh);
            if !(device.efficiency > 0.0 && device.efficiency <= 1.0) {
                errors.push(ConfigError::new(
                    format!("{prefix}.efficiency"),
                    "must be in (0.0, 1.0]",
                ));
            }
            if !(0.0..=1.0).contains(&device.initial_soc) {
                errors.push(ConfigError::new(
                    format!("{prefix}.initial_soc"),
                    "must be in [0.0, 1.0]",
                ));
            }
        }

        non_negative(&mut errors, "cross_border.max_export_mw", self.cross_border.max_export_mw);
        if let Some(import) = self.cross_border.max_import_mw {
            non_negative(&mut errors, "cross_border.max_import_mw", import);
        }

        if !FlexibleSource::is_merit_order(&self.dispatch.merit_order) {
            errors.push(ConfigError::new(
                "dispatch.merit_order",
                "must list hydro, biomass, gas and coal exactly once each",
            ));
        }

        errors
    }

    /// Validates the configuration and builds the grid it describes.
    ///
    /// # Errors
    ///
    /// Returns every validation error if the configuration is invalid.
    pub fn to_grid(&self) -> Result<Grid, Vec<ConfigError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let sources = SourceTable::from_fn(|source| {
            let (installed_mw, self_consumption) = self.plants.capacity(source);
            PowerSource::new(installed_mw, self_consumption)
        });
        let mut grid = Grid::new(sources);

        for &unit in FlexibleSource::ALL {
            let plant = self.plants.flexible(unit);
            let max_output_mw = grid.sources[unit.source()].max_net_mw();
            grid.units[unit] = ThermalUnit::new(max_output_mw, plant.constraints());
            grid.initial_modes[unit] = plant.initial_mode;
        }

        for &kind in StorageKind::ALL {
            let device = self.storage.device(kind);
            grid.storage[kind] =
                StorageDevice::new(device.capacity_mw, device.max_energy_mwh, device.efficiency);
            grid.initial_soc[kind] = device.initial_soc;
        }

        grid.cross_border = CrossBorderLink::with_limits(
            self.cross_border.import_limit_mw(),
            self.cross_border.max_export_mw,
        );
        if let Ok(order) = <[FlexibleSource; 4]>::try_from(self.dispatch.merit_order.as_slice()) {
            grid.merit_order = order;
        }
        grid.load_multiplier = self.consumption.load_multiplier;
        grid.grid_losses = self.consumption.transmission_loss + self.consumption.distribution_loss;

        Ok(grid)
    }
}

fn non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(field, "must be finite and >= 0"));
    }
}

fn fraction_below_one(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(0.0..1.0).contains(&value) {
        errors.push(ConfigError::new(field, "must be in [0.0, 1.0)"));
    }
}
