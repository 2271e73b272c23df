//! PNG chart rendering.
//!
//! Each chart is split in two:
//! - a pure data-prep function (`scatter_points`, `hourly_bars`, `HeatmapGrid`)
//!   that is unit-tested without any graphics environment
//! - a `draw_*` function that hands the prepared data to Plotters
//!
//! Charts are rendered independently: one failing chart does not stop the others.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use plotters::style::RGBColor;
use tracing::{info, warn};

use crate::domain::{HourBucket, RebateConfig, Sample, SpeedBand};
use crate::error::PipelineError;

pub mod heatmap;
pub mod hourly;
pub mod scatter;

pub use heatmap::HeatmapGrid;
pub use hourly::{HourlyBar, hourly_bars};
pub use scatter::{ScatterPoint, scatter_points};

pub const SCATTER_FILE: &str = "download_speed_scatter.png";
pub const HOURLY_FILE: &str = "hourly_internet_stability.png";
pub const HEATMAP_FILE: &str = "internet_stability_heatmap.png";

type DrawResult = Result<(), Box<dyn std::error::Error>>;

const RED: RGBColor = RGBColor(214, 39, 40);
const YELLOW: RGBColor = RGBColor(255, 215, 0);
const GREEN: RGBColor = RGBColor(44, 160, 44);

/// Files written and failures collected by [`render_all`].
#[derive(Debug, Default)]
pub struct RenderOutcome {
    pub written: Vec<PathBuf>,
    pub failures: Vec<PipelineError>,
}

impl RenderOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Render all three charts into `config.output_dir`, overwriting existing files.
pub fn render_all(samples: &[Sample], buckets: &[HourBucket], config: &RebateConfig) -> RenderOutcome {
    let mut outcome = RenderOutcome::default();

    let points = scatter_points(samples, config);
    let bars = hourly_bars(buckets, config);
    let grid = HeatmapGrid::from_buckets(buckets);

    render_one(&mut outcome, &config.output_dir, SCATTER_FILE, |path| {
        scatter::draw_scatter(path, &points, config)
    });
    render_one(&mut outcome, &config.output_dir, HOURLY_FILE, |path| {
        hourly::draw_hourly(path, &bars)
    });
    render_one(&mut outcome, &config.output_dir, HEATMAP_FILE, |path| {
        heatmap::draw_heatmap(path, &grid)
    });

    outcome
}

fn render_one(outcome: &mut RenderOutcome, dir: &Path, file: &str, draw: impl FnOnce(&Path) -> DrawResult) {
    let path = dir.join(file);

    // Font and backend setup live in third-party code; a panic there is
    // reported like any other render failure.
    let result = match catch_unwind(AssertUnwindSafe(|| draw(&path))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("chart backend panicked".to_string()),
    };

    match result {
        Ok(()) => {
            info!(path = %path.display(), "chart written");
            outcome.written.push(path);
        }
        Err(message) => {
            warn!(path = %path.display(), error = %message, "chart failed");
            outcome.failures.push(PipelineError::Render {
                file: file.to_string(),
                message,
            });
        }
    }
}

fn band_color(band: SpeedBand) -> RGBColor {
    match band {
        SpeedBand::Low => RED,
        SpeedBand::Degraded => YELLOW,
        SpeedBand::Good => GREEN,
    }
}

/// Hours elapsed since `origin`, used as the numeric x-axis for time charts.
fn hours_since(origin: NaiveDateTime, ts: NaiveDateTime) -> f64 {
    (ts - origin).num_seconds() as f64 / 3600.0
}

fn time_label(origin: NaiveDateTime, hours: f64) -> String {
    let ts = origin + Duration::seconds((hours * 3600.0).round() as i64);
    ts.format("%m-%d %H:%M").to_string()
}

/// Upper y bound: headroom above the data, never below the stability threshold.
fn y_upper(max_mbps: f64, config_threshold_mbps: f64) -> f64 {
    let top = max_mbps.max(config_threshold_mbps);
    if top.is_finite() && top > 0.0 { top * 1.1 } else { 1.0 }
}
