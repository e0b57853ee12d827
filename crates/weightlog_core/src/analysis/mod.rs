//! Pure computations over a measurement sequence.
//!
//! # Responsibility
//! - Date normalization as a transform that returns a new sequence.
//! - Derived statistics, the sorted chart view and nearest-point lookup.
//!
//! # Invariants
//! - Nothing in this module performs I/O or mutates its input.

pub mod chart;
pub mod nearest;
pub mod normalize;
pub mod stats;
