//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw speed-test measurements (`Sample`)
//! - hourly aggregates and their stability flag (`HourBucket`)
//! - the billing outcome (`RebateResult`) and run configuration (`RebateConfig`)

pub mod types;

pub use types::*;
