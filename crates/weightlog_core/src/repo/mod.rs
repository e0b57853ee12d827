//! Persistence layer for measurements.
//!
//! # Responsibility
//! - Define the load/save contract the store depends on.
//! - Keep file formats (JSON state file, CSV interchange) out of the store.
//!
//! # Invariants
//! - `save` always writes the full sequence; there is no append mode.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod csv_file;
pub mod measurement_repo;
