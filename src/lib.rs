//! Hourly electricity grid simulator.
//!
//! A year of demand is dispatched hour by hour over inflexible generation
//! (nuclear, PV, wind), flexible thermal units with operating constraints,
//! storage devices and a cross-border link, in a fixed merit order. Every
//! hour balances exactly: whatever cannot be served is recorded as shortage
//! and whatever cannot be used is recorded as dump.

pub mod cli;
/// TOML grid configuration and presets.
pub mod config;
pub mod devices;
pub mod error;
/// World file ingestion and result export.
pub mod io;
/// Grid parameters, dispatch engine, simulation driver and summary.
pub mod sim;
pub mod world;
