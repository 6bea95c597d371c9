//! Quarterly country-usage pipeline.
//!
//! Ingests monthly per-country usage counts from CSV files whose names embed
//! a `YYYYMM` token, validates that the observed months form an unbroken
//! consecutive run, collapses them into calendar quarters, and resolves each
//! country to a coordinate pair through an external geocoding service fronted
//! by a persistent cache.

pub mod config;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod pipeline;
pub mod quarter;
pub mod report;
pub mod table;
