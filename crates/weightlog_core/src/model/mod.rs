//! Domain model for weight measurements.
//!
//! # Responsibility
//! - Define the persisted measurement record and its validation rules.
//! - Own the date formats accepted at entry time and written to disk.
//!
//! # Invariants
//! - Measurements are identified by position in the store, never by key.
//! - A stored weight is always finite and strictly positive.

pub mod date;
pub mod measurement;
