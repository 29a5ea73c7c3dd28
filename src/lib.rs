//! LoginLens -- batch rate-anomaly analysis for authentication attempt logs.
//!
//! This crate analyzes an already-collected log of login attempts and
//! surfaces two kinds of rate anomalies: time periods where the global
//! attempt rate spikes far above normal, and individual sources whose
//! one-window attempt rate is an outlier against the population of sources.
//! It is a one-shot batch analysis, not a service: every run re-derives its
//! thresholds from the data by percentile calibration.

pub mod analysis;
pub mod config;
pub mod detect;
pub mod ingest;
pub mod report;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::analysis::AnalysisError;
use crate::config::AnalysisConfig;
use crate::ingest::LoginEvent;
use crate::report::AnalysisReport;

/// Run the full analysis over one event set:
/// bin -> calibrate -> flag -> merge, plus the per-source fan-out.
///
/// The two branches share only the read-only event set; each produces an
/// independent, immutable part of the report.
pub fn analyze(
    events: &[LoginEvent],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;
    if events.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let window = config.window_width();

    // Global branch: one bucket sequence over the whole log.
    let timestamps: Vec<_> = events.iter().map(|e| e.timestamp).collect();
    let buckets = analysis::binning::bin_events(&timestamps, window)?;
    let counts: Vec<u64> = buckets.iter().map(|b| b.count).collect();
    let global_threshold = analysis::stats::percentile(&counts, config.global_percentile)?;

    let flagged = detect::global::flag_buckets(&buckets, global_threshold);
    let midpoints: Vec<_> = flagged.iter().map(|b| b.midpoint()).collect();
    let anomaly_periods = detect::global::merge_midpoints(&midpoints, config.merge_tolerance());
    info!(
        windows = buckets.len(),
        global_threshold,
        flagged = flagged.len(),
        periods = anomaly_periods.len(),
        "global rate detection complete"
    );

    // Per-source branch: independent binning per source, then one
    // population-level calibration over the maxima.
    let source_table =
        detect::source::source_rate_records(events, window, config.max_workers)?;
    let maxima: Vec<u64> = source_table
        .iter()
        .map(|r| r.max_count_per_window)
        .collect();
    let source_threshold = analysis::stats::percentile(&maxima, config.source_percentile)?;
    let flagged_sources = detect::source::flag_sources(&source_table, source_threshold);
    info!(
        sources = source_table.len(),
        source_threshold,
        flagged = flagged_sources.len(),
        "per-source rate detection complete"
    );

    Ok(AnalysisReport {
        run_id: Uuid::new_v4(),
        created_at: Utc::now(),
        event_count: events.len(),
        source_count: source_table.len(),
        global_threshold,
        source_threshold,
        anomaly_periods,
        flagged_sources,
        source_table,
    })
}
