//! Input helpers.
//!
//! - CSV ingest + normalization (`ingest`)

pub mod ingest;

pub use ingest::*;
