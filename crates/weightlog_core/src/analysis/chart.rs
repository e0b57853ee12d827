//! Date-sorted view consumed by chart renderers.

use crate::model::measurement::Measurement;
use chrono::NaiveDate;

/// A plottable measurement with its position in the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    /// Index into the store sequence, usable with `edit_at`.
    pub index: usize,
    pub date: NaiveDate,
    pub weight: f64,
}

/// Parseable measurements in insertion order.
pub fn dated_points(measurements: &[Measurement]) -> Vec<ChartPoint> {
    measurements
        .iter()
        .enumerate()
        .filter_map(|(index, measurement)| {
            measurement.parsed_date().map(|date| ChartPoint {
                index,
                date,
                weight: measurement.weight,
            })
        })
        .collect()
}

/// Parseable measurements sorted by date; same-day points keep insertion
/// order.
pub fn chart_points(measurements: &[Measurement]) -> Vec<ChartPoint> {
    let mut points = dated_points(measurements);
    points.sort_by_key(|point| point.date);
    points
}
