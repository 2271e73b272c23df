//! CSV ingest and normalization.
//!
//! This module turns a speed-test export into an ordered list of `Sample`s.
//!
//! Rules:
//! - **Strict timestamps**: a row whose timestamp cannot be parsed aborts the
//!   whole run, since every downstream bucket depends on it
//! - **Lenient speeds**: empty, non-numeric or negative speeds become `0`
//! - **No dropped rows**: one CSV record is one `Sample`, in file order

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Sample, UNKNOWN_STATUS};
use crate::error::PipelineError;

const TIMESTAMP_COLUMNS: [&str; 3] = ["created at", "created_at", "timestamp"];
const DOWNLOAD_COLUMN: &str = "download";
const UPLOAD_COLUMN: &str = "upload";
const STATUS_COLUMN: &str = "status";

/// Counters describing what the loader had to repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    /// Speed cells (download or upload) replaced by `0`.
    pub coerced_speeds: usize,
    /// Rows whose status was empty and replaced by `"Unknown"`.
    pub unknown_status: usize,
}

/// Loader output: samples in input order + repair counters.
#[derive(Debug, Clone)]
pub struct IngestedSamples {
    pub samples: Vec<Sample>,
    pub stats: IngestStats,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    download: usize,
    upload: usize,
    status: usize,
}

/// Load a speed-test CSV from disk.
pub fn load_samples(path: &Path) -> Result<IngestedSamples, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let ingested = read_samples(file)?;
    info!(
        path = %path.display(),
        rows = ingested.stats.rows_read,
        coerced_speeds = ingested.stats.coerced_speeds,
        "loaded speed-test samples"
    );
    Ok(ingested)
}

/// Parse speed-test samples from any CSV reader.
///
/// The input is buffered whole so error messages can point at exact lines.
pub fn read_samples<R: Read>(mut input: R) -> Result<IngestedSamples, PipelineError> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(buf.as_slice());

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Csv {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    // A file with no header row at all carries no samples.
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Ok(IngestedSamples {
            samples: Vec::new(),
            stats: IngestStats::default(),
        });
    }

    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut samples = Vec::new();
    let mut stats = IngestStats::default();

    for (idx, result) in reader.records().enumerate() {
        // Blank lines and multi-line quoted fields make the record index drift
        // from the file line, so prefer the reader's own position.
        // Fallback +2: records() starts after the header, and lines are 1-based.
        let fallback = idx + 2;
        let record = result.map_err(|e| PipelineError::Csv {
            line: e.position().map_or(fallback, |p| record_line(&buf, p)),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(fallback, |p| record_line(&buf, p));
        stats.rows_read += 1;
        samples.push(parse_row(&record, columns, line, &mut stats)?);
    }

    Ok(IngestedSamples { samples, stats })
}

/// 1-based line on which a record's first field sits.
///
/// The reader may report a record as starting where it began skipping blank
/// lines, so step over any line breaks at that offset.
fn record_line(buf: &[u8], pos: &csv::Position) -> usize {
    let start = usize::try_from(pos.byte()).map_or(buf.len(), |b| b.min(buf.len()));
    let skipped = buf[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    pos.line() as usize + skipped
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim_start_matches('\u{feff}').trim();
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, PipelineError> {
    let timestamp = TIMESTAMP_COLUMNS
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .ok_or(PipelineError::MissingColumn("Created at"))?;
    let lookup = |name: &'static str, label: &'static str| {
        header_map
            .get(name)
            .copied()
            .ok_or(PipelineError::MissingColumn(label))
    };

    Ok(Columns {
        timestamp,
        download: lookup(DOWNLOAD_COLUMN, "Download")?,
        upload: lookup(UPLOAD_COLUMN, "Upload")?,
        status: lookup(STATUS_COLUMN, "Status")?,
    })
}

fn parse_row(
    record: &StringRecord,
    columns: Columns,
    line: usize,
    stats: &mut IngestStats,
) -> Result<Sample, PipelineError> {
    let raw_ts = cell(record, columns.timestamp);
    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| PipelineError::UnparseableTimestamp {
        line,
        value: raw_ts.to_string(),
    })?;

    let download_bps = coerce_speed(cell(record, columns.download), line, "download", stats);
    let upload_bps = coerce_speed(cell(record, columns.upload), line, "upload", stats);

    let status = match cell(record, columns.status) {
        "" => {
            stats.unknown_status += 1;
            UNKNOWN_STATUS.to_string()
        }
        s => s.to_string(),
    };

    Ok(Sample {
        timestamp,
        download_bps,
        upload_bps,
        status,
    })
}

/// Trimmed cell contents; short (flexible) records read as empty.
fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Parse a speed in bits/sec, falling back to `0` for anything unusable.
///
/// A zero minimum always marks its hour unstable, so a broken reading is
/// treated as a total outage.
fn coerce_speed(raw: &str, line: usize, field: &str, stats: &mut IngestStats) -> f64 {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            debug!(line, field, value = raw, "coercing invalid speed to 0");
            stats.coerced_speeds += 1;
            0.0
        }
    }
}

/// Parse a timestamp, keeping its wall-clock value.
///
/// Offsets are accepted but discarded: hours are bucketed on the time as
/// written, without conversion.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const NAIVE_FMTS: [&str; 8] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    const OFFSET_FMTS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f %:z",
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y-%m-%dT%H:%M:%S%.f %:z",
        "%Y-%m-%dT%H:%M:%S%.f %z",
    ];
    const DATE_FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FMTS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in NAIVE_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FMTS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
