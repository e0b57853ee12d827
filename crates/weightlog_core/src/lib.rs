//! Core domain logic for weightlog.
//! This crate owns the measurement store; UIs only render and forward input.

pub mod analysis;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analysis::chart::ChartPoint;
pub use analysis::nearest::{nearest_index, DistanceMetric, NearestConfig, NearestQuery};
pub use analysis::normalize::{normalize_measurements, DroppedMeasurement, NormalizeReport};
pub use analysis::stats::WeightSummary;
pub use config::{load_config, parse_config, AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::date::{parse_measurement_date, CANONICAL_DATE_FORMAT, ENTRY_DATE_FORMAT};
pub use model::measurement::{parse_weight, Measurement, ValidationError};
pub use repo::measurement_repo::{
    JsonFileRepository, MeasurementRepository, MemoryRepository, RepoError, RepoResult,
};
pub use service::measurement_store::{MeasurementStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
