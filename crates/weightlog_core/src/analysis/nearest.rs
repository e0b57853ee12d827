//! Nearest-point lookup for click-to-edit.
//!
//! # Invariants
//! - Distances are squared Euclidean; no square root is taken.
//! - Ties resolve to the earliest candidate.
//! - A minimum distance above the threshold is "no match", never clamped.

use crate::analysis::chart::{dated_points, ChartPoint};
use crate::model::date::date_to_timestamp;
use crate::model::measurement::Measurement;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Threshold used by the raw metric, in seconds² + kg².
pub const RAW_MAX_DISTANCE_SQ: f64 = 100_000.0;

/// Threshold used by the normalized metric, in unit-square coordinates.
pub const NORMALIZED_MAX_DISTANCE_SQ: f64 = 0.0025;

/// Coordinate space in which distances are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Unix seconds on x, kilograms on y.
    Raw,
    /// Both axes min-max scaled to `[0, 1]` over the stored points; a flat
    /// axis is measured in days or kilograms instead.
    Normalized,
}

impl DistanceMetric {
    pub fn default_max_distance_sq(self) -> f64 {
        match self {
            Self::Raw => RAW_MAX_DISTANCE_SQ,
            Self::Normalized => NORMALIZED_MAX_DISTANCE_SQ,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Normalized => "normalized",
        }
    }
}

impl Display for DistanceMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "normalized" | "normalised" => Ok(Self::Normalized),
            other => Err(format!(
                "unsupported distance metric `{other}`; expected raw|normalized"
            )),
        }
    }
}

/// Metric plus the largest squared distance still counted as a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestConfig {
    pub metric: DistanceMetric,
    pub max_distance_sq: f64,
}

impl NearestConfig {
    /// Uses the metric's default threshold.
    pub fn for_metric(metric: DistanceMetric) -> Self {
        Self {
            metric,
            max_distance_sq: metric.default_max_distance_sq(),
        }
    }
}

impl Default for NearestConfig {
    fn default() -> Self {
        Self::for_metric(DistanceMetric::Normalized)
    }
}

/// Query point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestQuery {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Index of the point closest to `query`, or `None` when `points` is empty or
/// the closest one is farther than `max_distance_sq`.
///
/// Coordinates are opaque, so renderers can pass pixel positions directly.
pub fn nearest_index(
    points: &[(f64, f64)],
    query: (f64, f64),
    max_distance_sq: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, (x, y)) in points.iter().enumerate() {
        let distance = (x - query.0).powi(2) + (y - query.1).powi(2);
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((index, distance));
        }
    }

    best.filter(|(_, distance)| *distance <= max_distance_sq)
        .map(|(index, _)| index)
}

/// Store index of the measurement nearest to `query`.
///
/// Measurements with unparseable dates are not candidates.
pub fn nearest_measurement(
    measurements: &[Measurement],
    query: NearestQuery,
    config: NearestConfig,
) -> Option<usize> {
    let points = dated_points(measurements);
    if points.is_empty() {
        return None;
    }

    let raw: Vec<(f64, f64)> = points.iter().map(raw_coordinates).collect();
    let raw_query = (date_to_timestamp(query.date) as f64, query.weight);

    let position = match config.metric {
        DistanceMetric::Raw => nearest_index(&raw, raw_query, config.max_distance_sq),
        DistanceMetric::Normalized => {
            let x_axis = AxisScale::fit(raw.iter().map(|(x, _)| *x), FLAT_DATE_UNIT_SECS);
            let y_axis = AxisScale::fit(raw.iter().map(|(_, y)| *y), FLAT_WEIGHT_UNIT_KG);
            let scaled: Vec<(f64, f64)> = raw
                .iter()
                .map(|(x, y)| (x_axis.apply(*x), y_axis.apply(*y)))
                .collect();
            let scaled_query = (x_axis.apply(raw_query.0), y_axis.apply(raw_query.1));
            nearest_index(&scaled, scaled_query, config.max_distance_sq)
        }
    }?;

    Some(points[position].index)
}

fn raw_coordinates(point: &ChartPoint) -> (f64, f64) {
    (date_to_timestamp(point.date) as f64, point.weight)
}

/// Unit for the date axis when every candidate shares one date.
const FLAT_DATE_UNIT_SECS: f64 = 86_400.0;

/// Unit for the weight axis when every candidate has the same weight.
const FLAT_WEIGHT_UNIT_KG: f64 = 1.0;

/// Min-max scale for one axis.
///
/// A zero span falls back to a fixed unit, so values off the flat axis still
/// land away from it instead of collapsing onto the stored points.
struct AxisScale {
    min: f64,
    unit: f64,
}

impl AxisScale {
    fn fit(values: impl Iterator<Item = f64>, flat_unit: f64) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        let span = max - min;
        Self {
            min,
            unit: if span > 0.0 { span } else { flat_unit },
        }
    }

    fn apply(&self, value: f64) -> f64 {
        (value - self.min) / self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::{nearest_index, AxisScale, DistanceMetric};

    #[test]
    fn nearest_index_picks_minimum_and_first_on_ties() {
        let points = [(0.0, 0.0), (3.0, 4.0), (3.0, 4.0)];
        assert_eq!(nearest_index(&points, (2.9, 4.1), 1.0), Some(1));
        assert_eq!(nearest_index(&points, (0.1, 0.0), 1.0), Some(0));
    }

    #[test]
    fn nearest_index_respects_threshold() {
        let points = [(0.0, 0.0)];
        assert_eq!(nearest_index(&points, (3.0, 4.0), 25.0), Some(0));
        assert_eq!(nearest_index(&points, (3.0, 4.0), 24.9), None);
        assert_eq!(nearest_index(&[], (0.0, 0.0), 1.0), None);
    }

    #[test]
    fn axis_scale_uses_fallback_unit_on_flat_axis() {
        let flat = AxisScale::fit([5.0, 5.0].into_iter(), 2.0);
        assert_eq!(flat.apply(5.0), 0.0);
        assert_eq!(flat.apply(9.0), 2.0);
        assert_eq!(flat.apply(1.0), -2.0);

        let scale = AxisScale::fit([10.0, 20.0].into_iter(), 2.0);
        assert_eq!(scale.apply(15.0), 0.5);
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("RAW".parse::<DistanceMetric>(), Ok(DistanceMetric::Raw));
        assert_eq!(
            " normalized ".parse::<DistanceMetric>(),
            Ok(DistanceMetric::Normalized)
        );
        assert!("pixel".parse::<DistanceMetric>().is_err());
    }
}
