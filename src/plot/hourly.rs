//! Bar chart of mean download speed per hour bucket.

use std::path::Path;

use chrono::NaiveDateTime;
use plotters::prelude::*;

use super::{DrawResult, band_color, hours_since, time_label, y_upper};
use crate::domain::{HourBucket, RebateConfig, SpeedBand};

/// Fraction of the hour slot left empty on each side of a bar.
const BAR_GAP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBar {
    pub hour_start: NaiveDateTime,
    pub avg_download_mbps: f64,
    pub band: SpeedBand,
}

/// One bar per bucket, coloured by its average speed alone.
///
/// The colour is independent of the bucket's `unstable` flag: an hour with a
/// failed test can still draw green.
pub fn hourly_bars(buckets: &[HourBucket], config: &RebateConfig) -> Vec<HourlyBar> {
    buckets
        .iter()
        .map(|b| HourlyBar {
            hour_start: b.hour_start,
            avg_download_mbps: b.avg_download_mbps,
            band: config.speed_band(b.avg_download_mbps),
        })
        .collect()
}

pub(super) fn draw_hourly(path: &Path, bars: &[HourlyBar]) -> DrawResult {
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Err("no hour buckets to plot".into());
    };
    let origin = first.hour_start;
    let x_max = hours_since(origin, last.hour_start) + 1.0;
    let y_max = y_upper(bars.iter().map(|b| b.avg_download_mbps).fold(0.0, f64::max), 0.0);

    let root = BitMapBackend::new(path, (1500, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Hourly Internet Stability", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Hourly Slot")
        .y_desc("Avg Download Speed (Mbps)")
        .x_labels(12)
        .x_label_formatter(&|v| time_label(origin, *v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    chart.draw_series(bars.iter().map(|b| {
        let x = hours_since(origin, b.hour_start);
        Rectangle::new(
            [(x + BAR_GAP, 0.0), (x + 1.0 - BAR_GAP, b.avg_download_mbps)],
            band_color(b.band).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
