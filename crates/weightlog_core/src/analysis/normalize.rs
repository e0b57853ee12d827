//! Date normalization transform.

use crate::model::measurement::Measurement;

/// A record removed by normalization because its date did not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedMeasurement {
    /// Position in the input sequence.
    pub index: usize,
    pub measurement: Measurement,
}

/// Result of `normalize_measurements`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizeReport {
    /// Surviving records with canonical dates, in input order.
    pub measurements: Vec<Measurement>,
    /// Records with unparseable dates, in input order.
    pub dropped: Vec<DroppedMeasurement>,
}

impl NormalizeReport {
    pub fn kept(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_lossless(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Rewrites every parseable date in canonical form and drops the rest.
///
/// Applying this to its own output is a no-op.
pub fn normalize_measurements(measurements: &[Measurement]) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    for (index, measurement) in measurements.iter().enumerate() {
        match measurement.to_canonical() {
            Some(canonical) => report.measurements.push(canonical),
            None => report.dropped.push(DroppedMeasurement {
                index,
                measurement: measurement.clone(),
            }),
        }
    }
    report
}
