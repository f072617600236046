//! File input and output around the simulation core.

pub mod export;
/// World file ingestion.
pub mod world;

pub use export::{export_csv, write_csv};
pub use world::{read_world, read_world_csv};
