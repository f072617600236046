//! Hourly input data for one simulated year.

pub mod synthetic;

pub use synthetic::SyntheticYear;

use crate::error::InputShapeError;
use crate::sim::types::HourInput;

/// Hourly demand and intermittent capacity factors, all of equal length.
///
/// # Examples
///
/// ```
/// use grid_sim::world::TimeSeries;
///
/// let world = TimeSeries::new(vec![900.0, 1100.0], vec![0.0, 0.4], vec![0.3, 0.2])?;
/// assert_eq!(world.len(), 2);
/// assert_eq!(world.hour(1).pv_cf, 0.4);
/// # Ok::<(), grid_sim::error::InputShapeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    demand_mw: Vec<f64>,
    pv_cf: Vec<f64>,
    wind_cf: Vec<f64>,
}

impl TimeSeries {
    /// Builds a validated time series.
    ///
    /// # Errors
    ///
    /// Returns an [`InputShapeError`] if the series differ in length, demand is
    /// negative or non-finite, or a capacity factor lies outside `[0, 1]`.
    pub fn new(
        demand_mw: Vec<f64>,
        pv_cf: Vec<f64>,
        wind_cf: Vec<f64>,
    ) -> Result<Self, InputShapeError> {
        if demand_mw.len() != pv_cf.len() || demand_mw.len() != wind_cf.len() {
            return Err(InputShapeError::LengthMismatch {
                demand: demand_mw.len(),
                pv: pv_cf.len(),
                wind: wind_cf.len(),
            });
        }

        if let Some((hour, &value)) = demand_mw
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(InputShapeError::OutOfRange {
                series: "demand",
                hour,
                value,
                range: "[0, inf)",
            });
        }
        check_capacity_factors("pv", &pv_cf)?;
        check_capacity_factors("wind", &wind_cf)?;

        Ok(Self {
            demand_mw,
            pv_cf,
            wind_cf,
        })
    }

    /// Number of hours.
    pub fn len(&self) -> usize {
        self.demand_mw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demand_mw.is_empty()
    }

    /// Inputs for hour `h`.
    ///
    /// # Panics
    ///
    /// Panics if `h >= self.len()`.
    pub fn hour(&self, h: usize) -> HourInput {
        HourInput {
            demand_mw: self.demand_mw[h],
            pv_cf: self.pv_cf[h],
            wind_cf: self.wind_cf[h],
        }
    }

    /// Iterates over the hourly inputs in order.
    pub fn iter(&self) -> impl Iterator<Item = HourInput> + '_ {
        (0..self.len()).map(|h| self.hour(h))
    }
}

fn check_capacity_factors(series: &'static str, values: &[f64]) -> Result<(), InputShapeError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        Some((hour, &value)) => Err(InputShapeError::OutOfRange {
            series,
            hour,
            value,
            range: "[0, 1]",
        }),
        None => Ok(()),
    }
}
