//! Generation technologies and their static parameters.

use std::fmt;

use serde::Deserialize;

use super::types::{Kind, Table};

/// One generation technology in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Nuclear,
    Pv,
    Wind,
    Hydro,
    Biomass,
    Gas,
    Coal,
}

/// How a source takes part in dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceClass {
    /// Runs at full installed capacity every hour.
    Baseload,
    /// Follows an hourly capacity factor; output is must-run.
    Intermittent,
    /// Dispatched on demand in merit order.
    Flexible(FlexibleSource),
}

impl Source {
    /// Returns the dispatch class of this source.
    pub const fn class(self) -> SourceClass {
        match self {
            Self::Nuclear => SourceClass::Baseload,
            Self::Pv | Self::Wind => SourceClass::Intermittent,
            Self::Hydro => SourceClass::Flexible(FlexibleSource::Hydro),
            Self::Biomass => SourceClass::Flexible(FlexibleSource::Biomass),
            Self::Gas => SourceClass::Flexible(FlexibleSource::Gas),
            Self::Coal => SourceClass::Flexible(FlexibleSource::Coal),
        }
    }

    /// Returns `true` for sources whose output is not dispatched (baseload and intermittent).
    pub const fn is_inflexible(self) -> bool {
        !matches!(self.class(), SourceClass::Flexible(_))
    }

    /// Human-readable label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nuclear => "Nuclear",
            Self::Pv => "Solar PV",
            Self::Wind => "On-shore wind",
            Self::Hydro => "Hydro",
            Self::Biomass => "Biomass",
            Self::Gas => "Natural gas",
            Self::Coal => "Coal",
        }
    }
}

impl Kind for Source {
    const ALL: &'static [Self] = &[
        Self::Nuclear,
        Self::Pv,
        Self::Wind,
        Self::Hydro,
        Self::Biomass,
        Self::Gas,
        Self::Coal,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Nuclear => "nuclear",
            Self::Pv => "pv",
            Self::Wind => "wind",
            Self::Hydro => "hydro",
            Self::Biomass => "biomass",
            Self::Gas => "gas",
            Self::Coal => "coal",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The dispatchable subset of [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexibleSource {
    Hydro,
    Biomass,
    Gas,
    Coal,
}

impl FlexibleSource {
    /// Default merit order: hydro, biomass, gas, coal.
    pub const DEFAULT_MERIT_ORDER: [Self; 4] = [Self::Hydro, Self::Biomass, Self::Gas, Self::Coal];

    /// The generation technology this unit belongs to.
    pub const fn source(self) -> Source {
        match self {
            Self::Hydro => Source::Hydro,
            Self::Biomass => Source::Biomass,
            Self::Gas => Source::Gas,
            Self::Coal => Source::Coal,
        }
    }

    /// Returns `true` if `order` lists every flexible unit exactly once.
    pub fn is_merit_order(order: &[Self]) -> bool {
        order.len() == Self::ALL.len() && Self::ALL.iter().all(|unit| order.contains(unit))
    }
}

impl Kind for FlexibleSource {
    const ALL: &'static [Self] = &[Self::Hydro, Self::Biomass, Self::Gas, Self::Coal];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        self.source().name()
    }
}

impl fmt::Display for FlexibleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per generation technology.
pub type SourceTable<T> = Table<Source, T, 7>;

/// One value per flexible unit.
pub type FlexTable<T> = Table<FlexibleSource, T, 4>;

/// Static parameters of one generation technology.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSource {
    /// Installed (nameplate) capacity in MW.
    pub installed_mw: f64,
    /// Fraction of gross generation consumed by the plant itself, in `[0, 1)`.
    pub self_consumption: f64,
}

impl PowerSource {
    /// Creates a power source.
    ///
    /// # Panics
    ///
    /// Panics if `installed_mw` is negative or `self_consumption` is outside `[0, 1)`.
    pub fn new(installed_mw: f64, self_consumption: f64) -> Self {
        assert!(installed_mw >= 0.0);
        assert!((0.0..1.0).contains(&self_consumption));
        Self {
            installed_mw,
            self_consumption,
        }
    }

    /// Maximum power delivered to the grid, net of self-consumption (MW).
    pub fn max_net_mw(&self) -> f64 {
        self.installed_mw * (1.0 - self.self_consumption)
    }

    /// Net power delivered to the grid at the given capacity factor (MW).
    ///
    /// Gross output is `installed × capacity_factor`; self-consumption is then
    /// netted off the gross figure.
    pub fn net_output_mw(&self, capacity_factor: f64) -> f64 {
        self.installed_mw * capacity_factor * (1.0 - self.self_consumption)
    }
}
