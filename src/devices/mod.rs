//! Grid components: generation technologies, thermal units, storage and the
//! cross-border link.

/// Cross-border import/export link.
pub mod cross_border;
pub mod source;
/// Aggregate storage devices.
pub mod storage;
/// Thermal unit operating-state machine.
pub mod thermal;
pub mod types;

pub use cross_border::CrossBorderLink;
pub use source::{FlexTable, FlexibleSource, PowerSource, Source, SourceClass, SourceTable};
pub use storage::{StorageDevice, StorageKind, StorageState, StorageTable};
pub use thermal::{InitialMode, ThermalConstraints, ThermalUnit, UnitHour, UnitMode, UnitState};
pub use types::{Kind, Table};
