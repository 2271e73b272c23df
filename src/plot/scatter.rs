//! Raw-sample scatter: time vs. download speed.

use std::path::Path;

use chrono::NaiveDateTime;
use plotters::prelude::*;

use super::{DrawResult, band_color, hours_since, time_label, y_upper};
use crate::domain::{RebateConfig, Sample, SpeedBand};

/// One plotted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub timestamp: NaiveDateTime,
    pub download_mbps: f64,
    pub band: SpeedBand,
}

/// Colour every sample.
///
/// Failed tests are red regardless of the measured speed.
pub fn scatter_points(samples: &[Sample], config: &RebateConfig) -> Vec<ScatterPoint> {
    samples
        .iter()
        .map(|s| {
            let mbps = s.download_mbps();
            let band = if s.is_failed() { SpeedBand::Low } else { config.speed_band(mbps) };
            ScatterPoint {
                timestamp: s.timestamp,
                download_mbps: mbps,
                band,
            }
        })
        .collect()
}

pub(super) fn draw_scatter(path: &Path, points: &[ScatterPoint], config: &RebateConfig) -> DrawResult {
    let Some(origin) = points.iter().map(|p| p.timestamp).min() else {
        return Err("no samples to plot".into());
    };
    let x_max = points
        .iter()
        .map(|p| hours_since(origin, p.timestamp))
        .fold(0.0, f64::max);
    let y_max = y_upper(
        points.iter().map(|p| p.download_mbps).fold(0.0, f64::max),
        config.good_speed_threshold_mbps(),
    );

    let root = BitMapBackend::new(path, (1500, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Download Speed Scatter Plot", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..x_max + 0.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Download Speed (Mbps)")
        .x_labels(10)
        .x_label_formatter(&|v| time_label(origin, *v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    chart.draw_series(points.iter().map(|p| {
        Circle::new(
            (hours_since(origin, p.timestamp), p.download_mbps),
            4,
            band_color(p.band).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(mbps: f64, status: &str) -> Sample {
        Sample {
            timestamp: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            download_bps: mbps * 1e6,
            upload_bps: 50e6,
            status: status.to_string(),
        }
    }

    #[test]
    fn colours_follow_speed_bands_and_failures() {
        let samples = vec![
            sample(5.0, "Completed"),
            sample(15.0, "Completed"),
            sample(80.0, "Completed"),
            sample(80.0, "Failed"),
        ];
        let bands: Vec<SpeedBand> = scatter_points(&samples, &RebateConfig::default())
            .into_iter()
            .map(|p| p.band)
            .collect();
        assert_eq!(
            bands,
            vec![SpeedBand::Low, SpeedBand::Degraded, SpeedBand::Good, SpeedBand::Low]
        );
    }

    #[test]
    fn keeps_input_order_and_values() {
        let points = scatter_points(&[sample(42.5, "Completed")], &RebateConfig::default());
        assert_eq!(points.len(), 1);
        assert!((points[0].download_mbps - 42.5).abs() < 1e-12);
    }
}
