//! CSV export of the hourly result table.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::devices::{FlexibleSource, Kind, Source, StorageKind};
use crate::sim::types::HourlyRecord;

/// Column names, in output order.
pub fn header() -> Vec<String> {
    let mut columns = vec![
        "hour".to_string(),
        "demand_mw".to_string(),
        "effective_demand_mw".to_string(),
    ];
    columns.extend(Source::ALL.iter().map(|s| format!("{}_mw", s.name())));
    columns.extend(StorageKind::ALL.iter().map(|k| format!("{}_mw", k.name())));
    columns.extend(StorageKind::ALL.iter().map(|k| format!("{}_energy_mwh", k.name())));
    columns.extend(FlexibleSource::ALL.iter().map(|u| format!("{}_mode", u.name())));
    columns.extend(
        ["net_import_mw", "shortage_mw", "dump_mw"]
            .iter()
            .map(|c| c.to_string()),
    );
    columns
}

/// Fixed-precision rendering; `+ 0.0` folds negative zero into zero.
fn mw(value: f64) -> String {
    format!("{:.4}", value + 0.0)
}

/// Exports hourly records to a CSV file at the given path.
///
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[HourlyRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes hourly records as CSV to any writer.
///
/// Storage columns are signed (positive=discharge, negative=charge), as is
/// `net_import_mw` (positive=import, negative=export).
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[HourlyRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(header())?;

    for r in records {
        let mut row = Vec::with_capacity(header_len());
        row.push(r.hour.to_string());
        row.push(mw(r.demand_mw));
        row.push(mw(r.effective_demand_mw));
        row.extend(r.generation.values().map(|&v| mw(v)));
        row.extend(r.storage_mw.values().map(|&v| mw(v)));
        row.extend(r.storage_energy_mwh.values().map(|&v| mw(v)));
        row.extend(r.unit_modes.values().map(|m| m.as_str().to_string()));
        row.push(mw(r.net_import_mw));
        row.push(mw(r.shortage_mw));
        row.push(mw(r.dump_mw));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn header_len() -> usize {
    3 + Source::ALL.len() + 2 * StorageKind::ALL.len() + FlexibleSource::ALL.len() + 3
}
