//! Hour-by-hour grid simulation: parameters, dispatch, driver and totals.

/// Merit-order dispatch of a single hour.
pub mod dispatch;
pub mod engine;
/// Static grid parameters.
pub mod grid;
pub mod power_balance;
pub mod summary;
pub mod types;

pub use dispatch::dispatch_hour;
pub use engine::Engine;
pub use grid::Grid;
pub use summary::Summary;
pub use types::{GridState, HourInput, HourlyRecord, ResultTable};
