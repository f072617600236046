//! Hourly energy balance.

use super::types::HourlyRecord;

/// Supply minus effective demand for one hour (MW).
///
/// All flows follow the grid-side sign convention:
/// - Positive = supply (generation, storage discharge, import, shortage)
/// - Negative = consumption (storage charge, export, dump)
///
/// A correctly dispatched hour returns zero up to floating-point error.
pub fn balance_residual_mw(record: &HourlyRecord) -> f64 {
    record.generation.total() + record.storage_mw.total() + record.net_import_mw
        + record.shortage_mw
        - record.dump_mw
        - record.effective_demand_mw
}

/// Returns `true` if every record balances within `tolerance_mw`.
pub fn all_balanced(records: &[HourlyRecord], tolerance_mw: f64) -> bool {
    records
        .iter()
        .all(|r| balance_residual_mw(r).abs() <= tolerance_mw)
}
