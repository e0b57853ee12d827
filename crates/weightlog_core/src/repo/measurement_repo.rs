//! Measurement repository contracts and implementations.
//!
//! # Responsibility
//! - Load and save the ordered measurement sequence as a whole.
//! - Map file-system and decode failures to `RepoError` with the file path.
//!
//! # Invariants
//! - A missing state file loads as an empty sequence.
//! - Corrupt content (bad JSON, invalid weight) is an error, never empty.
//! - Writes overwrite the file in place without a temp-file rename, so a
//!   failed write can leave it truncated.

use crate::model::measurement::{Measurement, ValidationError};
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for state-file and CSV operations.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    Validation(ValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid measurement data in `{}`: {source}", path.display())
            }
            Self::Csv { path, source } => write!(f, "CSV error on `{}`: {source}", path.display()),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Whole-sequence persistence used by `MeasurementStore`.
pub trait MeasurementRepository {
    fn load(&self) -> RepoResult<Vec<Measurement>>;
    fn save(&self, measurements: &[Measurement]) -> RepoResult<()>;
}

impl<R: MeasurementRepository + ?Sized> MeasurementRepository for &R {
    fn load(&self) -> RepoResult<Vec<Measurement>> {
        (**self).load()
    }

    fn save(&self, measurements: &[Measurement]) -> RepoResult<()> {
        (**self).save(measurements)
    }
}

/// JSON array state file, e.g. `weights.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl MeasurementRepository for JsonFileRepository {
    fn load(&self) -> RepoResult<Vec<Measurement>> {
        let started_at = Instant::now();
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=state_load module=repo status=ok mode=missing count=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=state_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let measurements: Vec<Measurement> = serde_json::from_slice(&bytes).map_err(|err| {
            error!(
                "event=state_load module=repo status=error error_code=decode_failed line={} column={}",
                err.line(),
                err.column()
            );
            RepoError::Json {
                path: self.path.clone(),
                source: err,
            }
        })?;

        info!(
            "event=state_load module=repo status=ok mode=file count={} duration_ms={}",
            measurements.len(),
            started_at.elapsed().as_millis()
        );
        Ok(measurements)
    }

    fn save(&self, measurements: &[Measurement]) -> RepoResult<()> {
        let started_at = Instant::now();
        let bytes = serde_json::to_vec(measurements).map_err(|err| RepoError::Json {
            path: self.path.clone(),
            source: err,
        })?;

        if let Err(err) = std::fs::write(&self.path, bytes) {
            error!(
                "event=state_save module=repo status=error error_code=write_failed error={}",
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=state_save module=repo status=ok count={} duration_ms={}",
            measurements.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// In-process repository; `load` returns whatever was last saved.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    measurements: RefCell<Vec<Measurement>>,
    save_count: Cell<usize>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository as if `measurements` had been saved earlier.
    pub fn with_measurements(measurements: Vec<Measurement>) -> Self {
        Self {
            measurements: RefCell::new(measurements),
            save_count: Cell::new(0),
        }
    }

    /// Snapshot of the last saved sequence.
    pub fn snapshot(&self) -> Vec<Measurement> {
        self.measurements.borrow().clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl MeasurementRepository for MemoryRepository {
    fn load(&self) -> RepoResult<Vec<Measurement>> {
        Ok(self.snapshot())
    }

    fn save(&self, measurements: &[Measurement]) -> RepoResult<()> {
        *self.measurements.borrow_mut() = measurements.to_vec();
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
