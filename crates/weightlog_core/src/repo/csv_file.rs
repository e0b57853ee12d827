//! CSV interchange for measurements.
//!
//! # Responsibility
//! - Write the `date,weight` export format.
//! - Read an import file into validated measurements.
//!
//! # Invariants
//! - Export always writes the header, even for an empty sequence.
//! - Import is fail-fast: the first malformed row aborts with its line number
//!   and nothing is returned.
//! - Import does not validate dates; normalization handles those.

use crate::model::measurement::{parse_weight, Measurement, ValidationError};
use crate::repo::measurement_repo::{RepoError, RepoResult};
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

const CSV_HEADER: [&str; 2] = ["date", "weight"];

#[derive(Deserialize)]
struct CsvRow {
    date: String,
    weight: String,
}

/// Writes `measurements` to `path` with header `date,weight`.
///
/// Overwrites any existing file.
pub fn write_csv(path: &Path, measurements: &[Measurement]) -> RepoResult<()> {
    let file = File::create(path).map_err(|err| RepoError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    let csv_error = |err: csv::Error| RepoError::Csv {
        path: path.to_path_buf(),
        source: err,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for measurement in measurements {
        let weight = measurement.weight.to_string();
        writer
            .write_record([measurement.date.as_str(), weight.as_str()])
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|err| RepoError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    info!(
        "event=csv_export module=repo status=ok count={}",
        measurements.len()
    );
    Ok(())
}

/// Reads every row of the CSV file at `path`.
///
/// Columns are matched by header name, so extra columns and column order do
/// not matter.
///
/// # Errors
/// - `RepoError::Io` when the file cannot be opened.
/// - `RepoError::Validation(MalformedRow)` for the first row that is
///   syntactically broken, lacks a column, or carries an invalid weight.
pub fn read_csv(path: &Path) -> RepoResult<Vec<Measurement>> {
    let file = File::open(path).map_err(|err| RepoError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| malformed_row(&err, 1))?
        .clone();

    let mut measurements = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| malformed_row(&err, 0))?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();

        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|err| malformed_row(&err, line))?;
        let weight = parse_weight(&row.weight).map_err(|err| {
            warn!(
                "event=csv_import module=repo status=error error_code=invalid_weight line={}",
                line
            );
            ValidationError::MalformedRow {
                line,
                message: err.to_string(),
            }
        })?;
        measurements.push(Measurement {
            date: row.date,
            weight,
        });
    }

    info!(
        "event=csv_import module=repo status=ok count={}",
        measurements.len()
    );
    Ok(measurements)
}

fn malformed_row(err: &csv::Error, fallback_line: u64) -> RepoError {
    let line = err
        .position()
        .map(|pos| pos.line())
        .unwrap_or(fallback_line);
    warn!(
        "event=csv_import module=repo status=error error_code=malformed_row line={}",
        line
    );
    RepoError::Validation(ValidationError::MalformedRow {
        line,
        message: err.to_string(),
    })
}
