//! End-to-end computation on real CSV files, without rendering.

use std::fs;
use std::path::PathBuf;

use isp_rebate::app::pipeline::run_report;
use isp_rebate::domain::RebateConfig;
use isp_rebate::error::PipelineError;
use isp_rebate::report::format_summary;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("speedtest.csv");
    fs::write(&path, body).expect("write csv");
    path
}

const FOUR_HOURS: &str = "\
Created at,Download,Upload,Latency (ms),Status
2025-03-01 08:05:00,52000000,31000000,11,Completed
2025-03-01 08:35:00,48000000,29000000,12,Completed
2025-03-01 09:10:00,61000000,33000000,10,Completed
2025-03-01 10:00:00,7500000,30000000,45,Completed
2025-03-01 10:40:00,55000000,30000000,12,Completed
2025-03-01 14:20:00,44000000,27000000,15,Completed
";

#[test]
fn four_hours_one_unstable_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, FOUR_HOURS);
    let config = RebateConfig::default();

    let report = run_report(&path, &config).expect("report");
    let rebate = report.analysis.rebate;

    assert_eq!(report.samples.len(), 6);
    assert_eq!(rebate.total_slots, 4);
    assert_eq!(rebate.unstable_slots, 1);
    assert_eq!(
        format_summary(&rebate, &config),
        "Total Slots: 4\nUnstable Slots: 1\nRebate Amount: ₹145.00\nFinal Payable Amount: ₹435.00"
    );
}

#[test]
fn gap_hours_do_not_count_as_slots() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, FOUR_HOURS);

    let report = run_report(&path, &RebateConfig::default()).unwrap();
    let hours: Vec<String> = report
        .analysis
        .buckets
        .iter()
        .map(|b| b.hour_start.format("%H").to_string())
        .collect();
    // 11:00-13:59 has no samples and yields no bucket.
    assert_eq!(hours, vec!["08", "09", "10", "14"]);
}

#[test]
fn broken_sensor_reading_marks_hour_unstable() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "Created at,Download,Upload,Status\n\
         2025-03-01 08:05:00,52000000,31000000,Completed\n\
         2025-03-01 08:35:00,ERR,31000000,Completed\n",
    );

    let report = run_report(&path, &RebateConfig::default()).unwrap();
    assert_eq!(report.ingest_stats.coerced_speeds, 1);
    assert_eq!(report.analysis.buckets[0].min_download_bps, 0.0);
    assert!(report.analysis.buckets[0].unstable);
}

#[test]
fn thresholds_and_bill_come_from_config() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, FOUR_HOURS);
    let config = RebateConfig {
        monthly_bill: 1000.0,
        speed_threshold_bps: 5e6,
        ..RebateConfig::default()
    };

    let rebate = run_report(&path, &config).unwrap().analysis.rebate;
    assert_eq!(rebate.unstable_slots, 0);
    assert_eq!(rebate.rebate_amount, 0.0);
    assert_eq!(rebate.payable_amount, 1000.0);
}

#[test]
fn header_only_file_is_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "Created at,Download,Upload,Status\n");
    assert!(matches!(
        run_report(&path, &RebateConfig::default()),
        Err(PipelineError::EmptyDataset)
    ));
}

#[test]
fn unparseable_timestamp_aborts_run() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "Created at,Download,Upload,Status\n\
         2025-03-01 08:05:00,52000000,31000000,Completed\n\
         soon,52000000,31000000,Completed\n",
    );
    let err = run_report(&path, &RebateConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::UnparseableTimestamp { line: 3, .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = TempDir::new().unwrap();
    let err = run_report(&dir.path().join("absent.csv"), &RebateConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Open { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, FOUR_HOURS);
    let config = RebateConfig::default();

    let first = run_report(&path, &config).unwrap();
    let second = run_report(&path, &config).unwrap();
    assert_eq!(first.analysis, second.analysis);
    assert_eq!(
        format_summary(&first.analysis.rebate, &config),
        format_summary(&second.analysis.rebate, &config)
    );
}
