use std::collections::HashMap;
use std::thread;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::analysis::{binning, AnalysisError};
use crate::detect::SourceRateRecord;
use crate::ingest::LoginEvent;

/// Maximum one-window attempt count for every distinct source.
///
/// Events are partitioned by source id and each partition is binned over
/// that source's *own* first..last span, not the global one. A source seen
/// only briefly is not diluted by hours of global quiet, while zero-count
/// windows inside its own active span still pull its profile down.
///
/// Each partition is independent and side-effect-free, so the work is
/// fanned out over scoped worker threads and collected into one flat list.
/// `max_workers == 0` sizes the pool from available parallelism.
pub fn source_rate_records(
    events: &[LoginEvent],
    window: TimeDelta,
    max_workers: usize,
) -> Result<Vec<SourceRateRecord>, AnalysisError> {
    if events.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut by_source: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
    for event in events {
        by_source
            .entry(event.source_id.as_str())
            .or_default()
            .push(event.timestamp);
    }
    let groups: Vec<(&str, Vec<DateTime<Utc>>)> = by_source.into_iter().collect();

    let workers = if max_workers == 0 {
        thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        max_workers
    };
    let chunk_size = groups.len().div_ceil(workers).max(1);
    debug!(
        sources = groups.len(),
        workers,
        chunk_size,
        "fanning out per-source rate computation"
    );

    let mut records: Vec<SourceRateRecord> = Vec::with_capacity(groups.len());
    thread::scope(|scope| -> Result<(), AnalysisError> {
        let handles: Vec<_> = groups
            .chunks(chunk_size)
            .map(|part| {
                scope.spawn(move || -> Result<Vec<SourceRateRecord>, AnalysisError> {
                    let mut out = Vec::with_capacity(part.len());
                    for (source_id, timestamps) in part {
                        let buckets = binning::bin_events(timestamps, window)?;
                        let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
                        out.push(SourceRateRecord {
                            source_id: (*source_id).to_string(),
                            max_count_per_window: max,
                        });
                    }
                    Ok(out)
                })
            })
            .collect();

        for handle in handles {
            let part = handle.join().map_err(|_| AnalysisError::WorkerPanicked)??;
            records.extend(part);
        }
        Ok(())
    })?;

    // HashMap partitioning randomizes order; sort hottest-first for stable output.
    records.sort_by(|a, b| {
        b.max_count_per_window
            .cmp(&a.max_count_per_window)
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
    Ok(records)
}

/// Sources whose busiest window strictly exceeds the population threshold.
pub fn flag_sources(records: &[SourceRateRecord], threshold: f64) -> Vec<SourceRateRecord> {
    records
        .iter()
        .filter(|r| r.max_count_per_window as f64 > threshold)
        .cloned()
        .collect()
}
