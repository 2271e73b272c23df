//! The computation half of a run, with no rendering or printing.
//!
//! load CSV -> aggregate hours -> classify -> rebate
//!
//! Front-ends decide what to do with the result (print, draw, assert in tests).

use std::path::Path;

use tracing::info;

use crate::domain::{HourBucket, RebateConfig, RebateResult, Sample};
use crate::error::PipelineError;
use crate::io::ingest::{IngestStats, load_samples};
use crate::stability::{aggregate_hourly, classify_buckets, compute_rebate};

/// Classified buckets and the rebate derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Chronological, classified hour buckets.
    pub buckets: Vec<HourBucket>,
    pub rebate: RebateResult,
}

/// Everything computed for one input file.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub samples: Vec<Sample>,
    pub ingest_stats: IngestStats,
    pub analysis: Analysis,
}

/// Aggregate, classify and price a set of samples.
///
/// Fails with `EmptyDataset` when there is no hour to classify.
pub fn analyze(samples: &[Sample], config: &RebateConfig) -> Result<Analysis, PipelineError> {
    let mut buckets = aggregate_hourly(samples);
    classify_buckets(&mut buckets, config);
    let rebate = compute_rebate(&buckets, config)?;

    info!(
        total_slots = rebate.total_slots,
        unstable_slots = rebate.unstable_slots,
        "classified hourly buckets"
    );
    Ok(Analysis { buckets, rebate })
}

/// Load `csv_path` and run the full computation.
pub fn run_report(csv_path: &Path, config: &RebateConfig) -> Result<ReportData, PipelineError> {
    let ingested = load_samples(csv_path)?;
    let analysis = analyze(&ingested.samples, config)?;
    Ok(ReportData {
        samples: ingested.samples,
        ingest_stats: ingested.stats,
        analysis,
    })
}
