//! `isp-rebate` library crate.
//!
//! The binary (`rebate`) is a thin wrapper around this library so that:
//!
//! - the hourly classification and rebate math are testable without spawning processes
//! - the computation can be exercised without a graphics environment
//! - chart rendering stays a separate, replaceable stage

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod stability;
