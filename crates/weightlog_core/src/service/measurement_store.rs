//! Measurement store use-cases.
//!
//! # Responsibility
//! - Own the in-memory measurement sequence for one process.
//! - Persist through the repository after every mutation.
//! - Answer statistics, chart and nearest-point queries for the UI.
//!
//! # Invariants
//! - Every mutating call saves before returning; there is no dirty state
//!   visible to callers.
//! - Insertion order is preserved; only `chart_points` sorts.
//! - A failed validation or index check leaves the sequence untouched.
//! - A failed save does not roll back the in-memory mutation.

use crate::analysis::chart::{chart_points, ChartPoint};
use crate::analysis::nearest::{nearest_measurement, NearestConfig, NearestQuery};
use crate::analysis::normalize::{normalize_measurements, NormalizeReport};
use crate::analysis::stats::{average, summarize, WeightSummary};
use crate::model::date::today_entry_string;
use crate::model::measurement::{parse_weight, Measurement, ValidationError};
use crate::repo::csv_file::{read_csv, write_csv};
use crate::repo::measurement_repo::{MeasurementRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Non-numeric or non-positive weight, or a malformed import row.
    Validation(ValidationError),
    /// Edit target does not exist.
    IndexOutOfRange { index: usize, len: usize },
    /// Persistence failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "measurement index {index} out of range (store has {len})")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Single-owner store over a persistence backend.
pub struct MeasurementStore<R: MeasurementRepository> {
    repo: R,
    measurements: Vec<Measurement>,
    nearest: NearestConfig,
}

impl<R: MeasurementRepository> MeasurementStore<R> {
    /// Loads the persisted sequence; a missing state file yields an empty store.
    pub fn load(repo: R) -> StoreResult<Self> {
        let measurements = repo.load()?;
        Ok(Self {
            repo,
            measurements,
            nearest: NearestConfig::default(),
        })
    }

    /// Replaces the nearest-point metric and threshold.
    pub fn with_nearest_config(mut self, nearest: NearestConfig) -> Self {
        self.nearest = nearest;
        self
    }

    pub fn nearest_config(&self) -> NearestConfig {
        self.nearest
    }

    /// Current sequence in insertion order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Writes the full sequence, replacing the previous state.
    pub fn save(&self) -> StoreResult<()> {
        self.repo.save(&self.measurements)?;
        Ok(())
    }

    /// Appends a measurement and saves.
    ///
    /// A blank `date_input` becomes today's date in `day/month/year` form.
    /// Any other date text is stored as given and checked only by
    /// `normalize`.
    ///
    /// Returns the index of the new measurement.
    ///
    /// # Errors
    /// - `Validation` when `weight_input` is not a positive number.
    /// - `Repo` when saving fails; the measurement stays in memory.
    pub fn add(&mut self, date_input: &str, weight_input: &str) -> StoreResult<usize> {
        let weight = parse_weight(weight_input)?;
        let date = match date_input.trim() {
            "" => today_entry_string(),
            given => given.to_string(),
        };

        self.measurements.push(Measurement { date, weight });
        let index = self.measurements.len() - 1;
        info!("event=measurement_add module=store status=ok index={}", index);
        self.save()?;
        Ok(index)
    }

    /// Replaces the date and weight at `index` and saves.
    ///
    /// A blank `date_input` keeps the existing date.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index >= len()`.
    /// - `Validation` when `weight_input` is not a positive number.
    pub fn edit_at(
        &mut self,
        index: usize,
        date_input: &str,
        weight_input: &str,
    ) -> StoreResult<()> {
        let len = self.measurements.len();
        if index >= len {
            warn!(
                "event=measurement_edit module=store status=error error_code=index_out_of_range index={} len={}",
                index, len
            );
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        let weight = parse_weight(weight_input)?;

        let target = &mut self.measurements[index];
        let date = date_input.trim();
        if !date.is_empty() {
            target.date = date.to_string();
        }
        target.weight = weight;

        info!("event=measurement_edit module=store status=ok index={}", index);
        self.save()
    }

    /// Rewrites dates in canonical form, drops unparseable records, saves.
    ///
    /// Dropped records are logged as warnings and returned in the report;
    /// they are not treated as errors.
    pub fn normalize(&mut self) -> StoreResult<NormalizeReport> {
        let report = normalize_measurements(&self.measurements);
        for dropped in &report.dropped {
            warn!(
                "event=normalize_drop module=store status=warn index={} date_chars={}",
                dropped.index,
                dropped.measurement.date.chars().count()
            );
        }
        info!(
            "event=normalize module=store status=ok kept={} dropped={}",
            report.kept(),
            report.dropped.len()
        );

        self.measurements = report.measurements.clone();
        self.save()?;
        Ok(report)
    }

    /// Mean weight; `None` when empty.
    pub fn average(&self) -> Option<f64> {
        average(&self.measurements)
    }

    /// Count, mean, min and max weight; `None` when empty.
    pub fn summary(&self) -> Option<WeightSummary> {
        summarize(&self.measurements)
    }

    /// Date-sorted plottable points carrying their store indices.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        chart_points(&self.measurements)
    }

    /// Index of the measurement closest to `query` under the configured
    /// metric, or `None` when nothing is within the threshold.
    pub fn nearest_to(&self, query: NearestQuery) -> Option<usize> {
        nearest_measurement(&self.measurements, query, self.nearest)
    }

    /// Writes the current sequence as `date,weight` CSV.
    pub fn export_csv(&self, path: &Path) -> StoreResult<()> {
        write_csv(path, &self.measurements)?;
        Ok(())
    }

    /// Appends every row of a CSV file, then normalizes and saves.
    ///
    /// The whole file is read before the store changes. The first malformed
    /// row aborts the import with `Validation` and the store is untouched.
    pub fn import_csv(&mut self, path: &Path) -> StoreResult<NormalizeReport> {
        let imported = read_csv(path)?;
        info!(
            "event=measurement_import module=store status=ok count={}",
            imported.len()
        );
        self.measurements.extend(imported);
        self.normalize()
    }
}
