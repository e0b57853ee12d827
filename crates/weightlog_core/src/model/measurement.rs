//! Measurement record and validation.
//!
//! # Responsibility
//! - Define the `{date, weight}` record shared by persistence, CSV
//!   interchange and the store.
//! - Parse and validate user-entered weights.
//!
//! # Invariants
//! - `weight` is finite and `> 0` for every constructed or deserialized value.
//! - `date` is kept verbatim until normalization; it may be unparseable.

use crate::model::date::{format_canonical, parse_measurement_date};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for user-supplied or imported measurement data.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Weight text is not a number.
    InvalidWeight { input: String },
    /// Weight parsed but is zero, negative, NaN or infinite.
    NonPositiveWeight { value: f64 },
    /// A CSV import row could not be read as a measurement.
    MalformedRow { line: u64, message: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeight { input } => write!(f, "weight `{input}` is not a number"),
            Self::NonPositiveWeight { value } => {
                write!(f, "weight must be a positive number of kilograms, got {value}")
            }
            Self::MalformedRow { line, message } => {
                write!(f, "malformed CSV row at line {line}: {message}")
            }
        }
    }
}

impl Error for ValidationError {}

/// One dated weight record.
///
/// Serialized as `{"date": "...", "weight": 72.5}`. Deserialization also
/// accepts a numeric string for `weight`, which older files contain after a
/// CSV import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Entry (`31/01/2023`) or canonical (`2023-01-31`) date text.
    pub date: String,
    /// Kilograms.
    pub weight: f64,
}

impl Measurement {
    /// Creates a measurement after validating `weight`.
    pub fn new(date: impl Into<String>, weight: f64) -> Result<Self, ValidationError> {
        let measurement = Self {
            date: date.into(),
            weight,
        };
        measurement.validate()?;
        Ok(measurement)
    }

    /// Checks the weight invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_weight(self.weight).map(|_| ())
    }

    /// Parsed calendar date, or `None` when `date` is in no accepted format.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_measurement_date(&self.date)
    }

    /// Returns a copy with the date rewritten in canonical form.
    ///
    /// Returns `None` when the date cannot be parsed.
    pub fn to_canonical(&self) -> Option<Self> {
        self.parsed_date().map(|date| Self {
            date: format_canonical(date),
            weight: self.weight,
        })
    }
}

/// Parses user-entered weight text.
///
/// Surrounding whitespace is ignored. A comma is only a decimal separator
/// (`72,5`, `72,25`); thousands grouping such as `1,000` is rejected.
///
/// # Errors
/// - `InvalidWeight` when the text is not a number.
/// - `NonPositiveWeight` when the number is not finite or not `> 0`.
pub fn parse_weight(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidWeight {
        input: trimmed.to_string(),
    };
    let candidate = match trimmed.split_once(',') {
        None => trimmed.to_string(),
        Some((whole, fraction)) => {
            if !is_decimal_comma_fraction(fraction) || whole.contains('.') {
                return Err(invalid());
            }
            format!("{whole}.{fraction}")
        }
    };
    let value = candidate.parse::<f64>().map_err(|_| invalid())?;
    check_weight(value)
}

fn is_decimal_comma_fraction(fraction: &str) -> bool {
    (1..=2).contains(&fraction.len()) && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn check_weight(value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositiveWeight { value })
    }
}

#[derive(Deserialize)]
struct MeasurementRecord {
    date: String,
    weight: WeightValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeightValue {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = MeasurementRecord::deserialize(deserializer)?;
        let weight = match record.weight {
            WeightValue::Number(value) => check_weight(value),
            WeightValue::Text(text) => parse_weight(&text),
        }
        .map_err(serde::de::Error::custom)?;
        Ok(Self {
            date: record.date,
            weight,
        })
    }
}
