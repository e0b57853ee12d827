//! Application configuration.
//!
//! # Responsibility
//! - Deserialize the optional TOML config file.
//! - Provide defaults for every field so an empty file is valid.
//!
//! # Invariants
//! - A loaded `AppConfig` has already passed `validate()`.
//! - Unknown keys are rejected rather than ignored.

use crate::analysis::nearest::{DistanceMetric, NearestConfig};
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// State file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "weights.json";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml(toml::de::Error),
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Toml(err) => write!(f, "invalid config: {err}"),
            Self::InvalidValue { field, message } => write!(f, "invalid `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Toml(value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreSection,
    pub nearest: NearestSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub data_file: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NearestSection {
    pub metric: DistanceMetric,
    /// `None` falls back to the metric's own default.
    pub max_distance_sq: Option<f64>,
}

impl Default for NearestSection {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Normalized,
            max_distance_sq: None,
        }
    }
}

impl NearestSection {
    pub fn to_nearest_config(&self) -> NearestConfig {
        NearestConfig {
            metric: self.metric,
            max_distance_sq: self
                .max_distance_sq
                .unwrap_or_else(|| self.metric.default_max_distance_sq()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// `None` lets the caller pick a level for the chosen target.
    pub level: Option<String>,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub dir: Option<PathBuf>,
}

impl LoggingSection {
    /// Configured level, else `default_log_level()` for files and `warn` for
    /// stderr so console output stays readable.
    pub fn effective_level(&self) -> &str {
        match (&self.level, &self.dir) {
            (Some(level), _) => level.as_str(),
            (None, Some(_)) => default_log_level(),
            (None, None) => "warn",
        }
    }
}

impl AppConfig {
    /// Checks values serde cannot express as types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.nearest.max_distance_sq {
            check_threshold(threshold)?;
        }
        if self.store.data_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.data_file",
                message: "path cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Rejects negative, NaN and infinite nearest-point thresholds.
pub fn check_threshold(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field: "nearest.max_distance_sq",
            message: format!("expected a finite value >= 0, got {value}"),
        })
    }
}

/// Parses and validates config text.
pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads and validates the config file at `path`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::{parse_config, AppConfig, ConfigError, DEFAULT_DATA_FILE};
    use crate::analysis::nearest::{DistanceMetric, RAW_MAX_DISTANCE_SQ};
    use std::path::PathBuf;

    #[test]
    fn empty_text_yields_defaults() {
        let config = parse_config("").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.nearest.metric, DistanceMetric::Normalized);
    }

    #[test]
    fn raw_metric_uses_its_default_threshold() {
        let config = parse_config(
            r#"
            [store]
            data_file = "/tmp/w.json"

            [nearest]
            metric = "raw"
            "#,
        )
        .expect("config should parse");
        let nearest = config.nearest.to_nearest_config();
        assert_eq!(nearest.metric, DistanceMetric::Raw);
        assert_eq!(nearest.max_distance_sq, RAW_MAX_DISTANCE_SQ);
    }

    #[test]
    fn explicit_threshold_overrides_default() {
        let config = parse_config("[nearest]\nmax_distance_sq = 0.5\n").expect("should parse");
        assert_eq!(config.nearest.to_nearest_config().max_distance_sq, 0.5);
    }

    #[test]
    fn rejects_unknown_metric_and_negative_threshold() {
        let err = parse_config("[nearest]\nmetric = \"pixel\"\n").expect_err("bad metric");
        assert!(matches!(err, ConfigError::Toml(_)));

        let err = parse_config("[nearest]\nmax_distance_sq = -1.0\n").expect_err("negative");
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "nearest.max_distance_sq",
                ..
            }
        ));
    }

    #[test]
    fn logging_level_defaults_depend_on_target() {
        let config = parse_config("").expect("should parse");
        assert_eq!(config.logging.effective_level(), "warn");

        let config = parse_config("[logging]\ndir = \"/var/log/weightlog\"\n").expect("should parse");
        assert_eq!(config.logging.effective_level(), crate::logging::default_log_level());

        let config = parse_config("[logging]\nlevel = \"trace\"\n").expect("should parse");
        assert_eq!(config.logging.effective_level(), "trace");
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = parse_config("[store]\npath = \"x\"\n").expect_err("unknown key");
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
