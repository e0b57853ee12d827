//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, analysis and persistence into store operations.
//! - Keep presentation layers decoupled from file formats.

pub mod measurement_store;
