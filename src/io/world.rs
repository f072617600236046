//! CSV ingestion of the hourly world file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::InputShapeError;
use crate::world::TimeSeries;

const REQUIRED_COLUMNS: [&str; 3] = ["load", "solar_util", "wind_util"];

#[derive(Debug, Deserialize)]
struct WorldRow {
    load: f64,
    solar_util: f64,
    wind_util: f64,
    #[serde(default)]
    year: Option<i32>,
}

/// Reads a world file from `path`.
///
/// # Errors
///
/// Returns an [`InputShapeError`] if the file cannot be opened or its
/// contents are rejected by [`read_world`].
pub fn read_world_csv(path: &Path, year: Option<i32>) -> Result<TimeSeries, InputShapeError> {
    let file = File::open(path).map_err(|source| InputShapeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_world(file, year)
}

/// Reads hourly demand and capacity factors from CSV.
///
/// Columns `load`, `solar_util` and `wind_util` are required; other columns
/// are ignored. When `year` is given, only rows whose `year` column matches
/// are kept, in file order.
///
/// # Errors
///
/// Returns an [`InputShapeError`] for a missing column, a malformed row,
/// out-of-range values, or a year selection that matches nothing.
pub fn read_world(reader: impl Read, year: Option<i32>) -> Result<TimeSeries, InputShapeError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(InputShapeError::MissingColumn(column));
        }
    }
    let has_year = headers.iter().any(|h| h == "year");
    if year.is_some() && !has_year {
        return Err(InputShapeError::NoYearColumn);
    }

    let mut demand_mw = Vec::new();
    let mut pv_cf = Vec::new();
    let mut wind_cf = Vec::new();

    for row in rdr.deserialize::<WorldRow>() {
        let row = row?;
        if year.is_some() && row.year != year {
            continue;
        }
        demand_mw.push(row.load);
        pv_cf.push(row.solar_util);
        wind_cf.push(row.wind_util);
    }

    match year {
        Some(selected) if demand_mw.is_empty() => {
            return Err(InputShapeError::NoRowsForYear(selected));
        }
        _ => {}
    }

    TimeSeries::new(demand_mw, pv_cf, wind_cf)
}
