//! Simulation driver stepping the dispatch engine through the year.

use tracing::{info, warn};

use crate::config::GridConfig;
use crate::error::{InputShapeError, SimError};
use crate::world::TimeSeries;

use super::dispatch::dispatch_hour;
use super::grid::Grid;
use super::summary::is_active;
use super::types::{GridState, HourlyRecord, ResultTable};

/// Simulation engine owning the grid, its inputs and the state carried between hours.
///
/// Hours are dispatched strictly in order; each one starts from the state the
/// previous one left behind.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    world: TimeSeries,
    state: GridState,
    hour: usize,
}

impl Engine {
    /// Creates an engine positioned at hour zero.
    pub fn new(grid: Grid, world: TimeSeries) -> Self {
        let state = grid.initial_state();
        Self {
            grid,
            world,
            state,
            hour: 0,
        }
    }

    /// Validates `config`, builds its grid and pairs it with `world`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] listing every invalid field, or
    /// [`SimError::InputShape`] if `world` holds no hours.
    pub fn from_config(config: &GridConfig, world: TimeSeries) -> Result<Self, SimError> {
        let grid = config.to_grid().map_err(SimError::Config)?;
        if world.is_empty() {
            return Err(InputShapeError::Empty.into());
        }
        Ok(Self::new(grid, world))
    }

    /// Dispatches the next hour, or returns `None` once the series is exhausted.
    pub fn step(&mut self) -> Option<HourlyRecord> {
        if self.hour >= self.world.len() {
            return None;
        }
        let input = self.world.hour(self.hour);
        let (next, record) = dispatch_hour(&self.grid, self.state, self.hour, &input);
        self.state = next;
        self.hour += 1;
        Some(record)
    }

    /// Dispatches every remaining hour and returns their records.
    pub fn run(&mut self) -> ResultTable {
        let remaining = self.world.len().saturating_sub(self.hour);
        info!(hours = remaining, "starting simulation");

        let mut results = Vec::with_capacity(remaining);
        while let Some(record) = self.step() {
            results.push(record);
        }

        let shortage_hours = results.iter().filter(|r| is_active(r.shortage_mw)).count();
        if shortage_hours > 0 {
            warn!(shortage_hours, "demand was not fully served");
        }
        info!(hours = results.len(), "simulation finished");
        results
    }

    /// Returns the grid being simulated.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the state carried into the next hour.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Index of the next hour to dispatch.
    pub fn hour(&self) -> usize {
        self.hour
    }
}
