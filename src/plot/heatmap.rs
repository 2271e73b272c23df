//! Hour-of-day × date stability grid.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, Timelike};
use plotters::prelude::*;

use super::{DrawResult, GREEN, RED};
use crate::domain::HourBucket;

pub const HOURS_PER_DAY: usize = 24;

const CELL_BORDER: RGBColor = RGBColor(128, 128, 128);

/// Stability per (hour of day, date).
///
/// `cells[hour][col]` is `Some(unstable)` when a bucket exists for that slot,
/// `None` when the hour had no samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    /// Distinct bucket dates, ascending; one column each.
    pub dates: Vec<NaiveDate>,
    pub cells: Vec<Vec<Option<bool>>>,
}

impl HeatmapGrid {
    pub fn from_buckets(buckets: &[HourBucket]) -> Self {
        let dates: Vec<NaiveDate> = buckets
            .iter()
            .map(|b| b.hour_start.date())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![vec![None; dates.len()]; HOURS_PER_DAY];
        for b in buckets {
            let hour = b.hour_start.hour() as usize;
            if let Ok(col) = dates.binary_search(&b.hour_start.date()) {
                cells[hour][col] = Some(b.unstable);
            }
        }

        Self { dates, cells }
    }

    pub fn get(&self, hour: usize, date: NaiveDate) -> Option<bool> {
        let col = self.dates.binary_search(&date).ok()?;
        self.cells.get(hour)?.get(col).copied().flatten()
    }
}

/// Hour 0 is drawn on the top row.
fn row_of(hour: usize) -> f64 {
    (HOURS_PER_DAY - 1 - hour) as f64
}

pub(super) fn draw_heatmap(path: &Path, grid: &HeatmapGrid) -> DrawResult {
    if grid.dates.is_empty() {
        return Err("no hour buckets to plot".into());
    }
    let n_cols = grid.dates.len() as f64;
    let dates = &grid.dates;

    let root = BitMapBackend::new(path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Internet Stability Heatmap (Green = Stable, Red = Unstable)",
            ("sans-serif", 22),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5..n_cols - 0.5, -0.5..HOURS_PER_DAY as f64 - 0.5)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Date")
        .y_desc("Hour of Day")
        .x_labels(dates.len().min(31))
        .y_labels(HOURS_PER_DAY)
        .x_label_formatter(&|v| {
            let idx = v.round();
            if (v - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            dates
                .get(idx as usize)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|v| {
            let row = v.round();
            if (v - row).abs() > 1e-6 || !(0.0..HOURS_PER_DAY as f64).contains(&row) {
                return String::new();
            }
            format!("{}", HOURS_PER_DAY - 1 - row as usize)
        })
        .draw()?;

    let mut filled = Vec::new();
    for (hour, row) in grid.cells.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            if let Some(unstable) = cell {
                let x = col as f64;
                let y = row_of(hour);
                let color = if *unstable { RED } else { GREEN };
                filled.push(((x - 0.5, y - 0.5), (x + 0.5, y + 0.5), color));
            }
        }
    }

    chart.draw_series(
        filled
            .iter()
            .map(|&(a, b, color)| Rectangle::new([a, b], color.filled())),
    )?;
    chart.draw_series(
        filled
            .iter()
            .map(|&(a, b, _)| Rectangle::new([a, b], CELL_BORDER.stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}
