//! Grouping of samples into clock-hour buckets.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Timelike};

use crate::domain::{HourBucket, Sample};

/// Floor a timestamp to the start of its hour.
pub fn floor_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_hms_opt(ts.hour(), 0, 0).unwrap_or(ts)
}

/// Group samples into one bucket per distinct hour, ascending by `hour_start`.
///
/// Hours without samples produce no bucket. Returned buckets are unclassified.
pub fn aggregate_hourly(samples: &[Sample]) -> Vec<HourBucket> {
    let mut by_hour: BTreeMap<NaiveDateTime, Vec<&Sample>> = BTreeMap::new();
    for s in samples {
        by_hour.entry(floor_to_hour(s.timestamp)).or_default().push(s);
    }

    by_hour
        .into_iter()
        .map(|(hour_start, members)| build_bucket(hour_start, &members))
        .collect()
}

fn build_bucket(hour_start: NaiveDateTime, members: &[&Sample]) -> HourBucket {
    let sample_count = members.len();
    let avg_download_mbps = if sample_count == 0 {
        0.0
    } else {
        members.iter().map(|s| s.download_mbps()).sum::<f64>() / sample_count as f64
    };

    HourBucket {
        hour_start,
        sample_count,
        min_download_bps: min_or_zero(members.iter().map(|s| s.download_bps)),
        min_upload_bps: min_or_zero(members.iter().map(|s| s.upload_bps)),
        has_failure: members.iter().any(|s| s.is_failed()),
        avg_download_mbps,
        unstable: false,
    }
}

/// Minimum of the values, or `0` for an empty set.
///
/// An empty bucket must never look fast, so "no data" maps to the slowest
/// possible speed rather than to `+inf`.
fn min_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::min).unwrap_or(0.0)
}
