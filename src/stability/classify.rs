//! Per-hour stability rule.

use crate::domain::{HourBucket, RebateConfig};

/// Whether a bucket counts as an unstable hour.
///
/// Any one condition is enough:
/// 1. a sample in the hour failed
/// 2. the slowest download is below `speed_threshold_bps`
/// 3. the slowest upload is below `speed_threshold_bps`
///
/// Upload is compared against the download threshold; there is no separate
/// upload threshold.
pub fn is_unstable(bucket: &HourBucket, config: &RebateConfig) -> bool {
    bucket.has_failure
        || bucket.min_download_bps < config.speed_threshold_bps
        || bucket.min_upload_bps < config.speed_threshold_bps
}

/// Set the `unstable` flag on every bucket.
pub fn classify_buckets(buckets: &mut [HourBucket], config: &RebateConfig) {
    for bucket in buckets.iter_mut() {
        bucket.unstable = is_unstable(bucket, config);
    }
}
