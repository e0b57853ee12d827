//! Weight statistics.

use crate::model::measurement::Measurement;

/// Aggregate over all stored weights, dates ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSummary {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Returns `None` for an empty sequence.
pub fn summarize(measurements: &[Measurement]) -> Option<WeightSummary> {
    let first = measurements.first()?;
    let mut sum = 0.0;
    let mut min = first.weight;
    let mut max = first.weight;
    for measurement in measurements {
        sum += measurement.weight;
        min = min.min(measurement.weight);
        max = max.max(measurement.weight);
    }

    Some(WeightSummary {
        count: measurements.len(),
        average: sum / measurements.len() as f64,
        min,
        max,
    })
}

/// Arithmetic mean of all weights; `None` for an empty sequence.
pub fn average(measurements: &[Measurement]) -> Option<f64> {
    summarize(measurements).map(|summary| summary.average)
}
