//! Shared domain types.
//!
//! Everything here is plain data: the loader produces `Sample`s, the stability
//! stage turns them into `HourBucket`s and a `RebateResult`, and the renderers
//! only read them.

use std::path::PathBuf;

use chrono::NaiveDateTime;

/// Status value that marks a failed speed test.
pub const FAILED_STATUS: &str = "Failed";

/// Status substituted when the CSV cell is empty.
pub const UNKNOWN_STATUS: &str = "Unknown";

const BITS_PER_MEGABIT: f64 = 1e6;

/// One speed-test measurement, as loaded from a CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Wall-clock time of the test. No time-zone conversion is applied.
    pub timestamp: NaiveDateTime,
    /// Download speed in bits/sec (`0` when the source value was invalid).
    pub download_bps: f64,
    /// Upload speed in bits/sec (`0` when the source value was invalid).
    pub upload_bps: f64,
    pub status: String,
}

impl Sample {
    pub fn download_mbps(&self) -> f64 {
        self.download_bps / BITS_PER_MEGABIT
    }

    pub fn upload_mbps(&self) -> f64 {
        self.upload_bps / BITS_PER_MEGABIT
    }

    pub fn is_failed(&self) -> bool {
        self.status == FAILED_STATUS
    }
}

/// Aggregate of all samples that fall in one clock hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBucket {
    /// Timestamp floored to the hour; unique per run.
    pub hour_start: NaiveDateTime,
    pub sample_count: usize,
    pub min_download_bps: f64,
    pub min_upload_bps: f64,
    /// True iff any member sample has status `"Failed"`.
    pub has_failure: bool,
    pub avg_download_mbps: f64,
    /// Set by the classifier; `false` until then.
    pub unstable: bool,
}

/// Billing outcome of a run.
///
/// Amounts are kept unrounded; rounding happens only when formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebateResult {
    pub total_slots: usize,
    pub unstable_slots: usize,
    pub monthly_bill: f64,
    pub rebate_amount: f64,
    pub payable_amount: f64,
}

impl RebateResult {
    pub fn unstable_fraction(&self) -> f64 {
        self.unstable_slots as f64 / self.total_slots as f64
    }
}

/// Run-wide parameters.
///
/// The defaults are the standard billing constants (580 bill, 25/10 Mbps);
/// tests and callers can override individual fields.
///
/// Chart colouring uses its own pair of thresholds, so changing the stability
/// rule does not recolour the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct RebateConfig {
    /// Amount billed for the period, in `currency_symbol` units.
    pub monthly_bill: f64,
    /// Stability threshold in bits/sec, applied to both download and upload minimums.
    pub speed_threshold_bps: f64,
    /// Red/yellow colour boundary in bits/sec. Only used by the charts.
    pub low_speed_threshold_bps: f64,
    /// Yellow/green colour boundary in bits/sec. Only used by the charts.
    pub good_speed_threshold_bps: f64,
    pub currency_symbol: String,
    /// Directory the chart images are written into.
    pub output_dir: PathBuf,
}

impl Default for RebateConfig {
    fn default() -> Self {
        Self {
            monthly_bill: 580.0,
            speed_threshold_bps: 25.0 * BITS_PER_MEGABIT,
            low_speed_threshold_bps: 10.0 * BITS_PER_MEGABIT,
            good_speed_threshold_bps: 25.0 * BITS_PER_MEGABIT,
            currency_symbol: "₹".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl RebateConfig {
    pub fn speed_threshold_mbps(&self) -> f64 {
        self.speed_threshold_bps / BITS_PER_MEGABIT
    }

    pub fn low_speed_threshold_mbps(&self) -> f64 {
        self.low_speed_threshold_bps / BITS_PER_MEGABIT
    }

    pub fn good_speed_threshold_mbps(&self) -> f64 {
        self.good_speed_threshold_bps / BITS_PER_MEGABIT
    }

    /// Colour band for a speed in Mbps.
    pub fn speed_band(&self, mbps: f64) -> SpeedBand {
        if mbps < self.low_speed_threshold_mbps() {
            SpeedBand::Low
        } else if mbps < self.good_speed_threshold_mbps() {
            SpeedBand::Degraded
        } else {
            SpeedBand::Good
        }
    }
}

/// Presentation band used to colour chart points and bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedBand {
    /// Below the low-speed threshold (red).
    Low,
    /// Between the low and good colour thresholds (yellow).
    Degraded,
    /// At or above the good colour threshold (green).
    Good,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(download_bps: f64, status: &str) -> Sample {
        Sample {
            timestamp: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            download_bps,
            upload_bps: 12_500_000.0,
            status: status.to_string(),
        }
    }

    #[test]
    fn derived_mbps_values() {
        let s = sample(30_000_000.0, "Completed");
        assert!((s.download_mbps() - 30.0).abs() < 1e-12);
        assert!((s.upload_mbps() - 12.5).abs() < 1e-12);
        assert!(!s.is_failed());
    }

    #[test]
    fn failure_match_is_exact() {
        assert!(sample(0.0, "Failed").is_failed());
        assert!(!sample(0.0, "failed").is_failed());
        assert!(!sample(0.0, UNKNOWN_STATUS).is_failed());
    }

    #[test]
    fn speed_bands_use_both_thresholds() {
        let config = RebateConfig::default();
        assert_eq!(config.speed_band(9.99), SpeedBand::Low);
        assert_eq!(config.speed_band(10.0), SpeedBand::Degraded);
        assert_eq!(config.speed_band(24.9), SpeedBand::Degraded);
        assert_eq!(config.speed_band(25.0), SpeedBand::Good);
    }

    #[test]
    fn colour_bands_ignore_stability_threshold() {
        let config = RebateConfig {
            speed_threshold_bps: 50e6,
            ..RebateConfig::default()
        };
        assert_eq!(config.speed_band(30.0), SpeedBand::Good);

        let recoloured = RebateConfig {
            good_speed_threshold_bps: 40e6,
            ..RebateConfig::default()
        };
        assert_eq!(recoloured.speed_band(30.0), SpeedBand::Degraded);
    }
}
