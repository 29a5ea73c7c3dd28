//! CSV ingest for already-collected authentication attempt logs.
//!
//! Thin glue in front of the core: it only needs a timestamp and a source
//! identifier per row; any other columns are ignored. Malformed rows are
//! skipped with a warning rather than aborting a multi-hundred-thousand-row
//! load.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// One authentication attempt. Immutable, externally supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginEvent {
    pub timestamp: DateTime<Utc>,
    pub source_id: String,
}

/// How raw timestamp cells are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampUnit {
    Seconds,
    Millis,
    /// Epoch microseconds, the format of the reference dataset.
    #[default]
    Micros,
    Rfc3339,
}

impl FromStr for TimestampUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "s" | "secs" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" => Ok(Self::Millis),
            "us" | "micros" => Ok(Self::Micros),
            "rfc3339" | "iso8601" => Ok(Self::Rfc3339),
            other => bail!("unknown timestamp unit: {other} (expected s, ms, us, or rfc3339)"),
        }
    }
}

/// Column layout of the input CSV.
#[derive(Debug, Clone)]
pub struct CsvFormat {
    pub timestamp_column: String,
    pub source_column: String,
    pub timestamp_unit: TimestampUnit,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            timestamp_column: "timestamp".to_string(),
            source_column: "source_ip".to_string(),
            timestamp_unit: TimestampUnit::Micros,
        }
    }
}

fn parse_timestamp(raw: &str, unit: TimestampUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimestampUnit::Seconds => DateTime::from_timestamp(raw.trim().parse().ok()?, 0),
        TimestampUnit::Millis => DateTime::from_timestamp_millis(raw.trim().parse().ok()?),
        TimestampUnit::Micros => DateTime::from_timestamp_micros(raw.trim().parse().ok()?),
        TimestampUnit::Rfc3339 => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Load events from a headered CSV file, sorted by timestamp.
pub fn load_events(path: &Path, format: &CsvFormat) -> Result<Vec<LoginEvent>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV headers: {}", path.display()))?;
    let ts_idx = headers
        .iter()
        .position(|h| h == format.timestamp_column)
        .with_context(|| {
            format!(
                "timestamp column '{}' not found in {}",
                format.timestamp_column,
                path.display()
            )
        })?;
    let src_idx = headers
        .iter()
        .position(|h| h == format.source_column)
        .with_context(|| {
            format!(
                "source column '{}' not found in {}",
                format.source_column,
                path.display()
            )
        })?;

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV near row {}", line + 2))?;
        let raw_ts = record.get(ts_idx).unwrap_or("");
        let source = record.get(src_idx).unwrap_or("");
        match parse_timestamp(raw_ts, format.timestamp_unit) {
            Some(timestamp) if !source.is_empty() => events.push(LoginEvent {
                timestamp,
                source_id: source.to_string(),
            }),
            _ => {
                if skipped < 5 {
                    warn!(row = line + 2, raw_ts, "skipping unparseable row");
                }
                skipped += 1;
            }
        }
    }

    events.sort_by_key(|e| e.timestamp);
    info!(
        path = %path.display(),
        loaded = events.len(),
        skipped,
        "loaded authentication attempt log"
    );
    Ok(events)
}
