//! Hourly stability analysis.
//!
//! Pure computation, no I/O:
//! samples -> hour buckets (`aggregate`) -> unstable flags (`classify`) -> rebate (`rebate`)

pub mod aggregate;
pub mod classify;
pub mod rebate;

pub use aggregate::*;
pub use classify::*;
pub use rebate::*;
