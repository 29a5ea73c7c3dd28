//! The output contract of one analysis run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::detect::{AnomalyPeriod, SourceRateRecord};

/// Everything one batch analysis produces. Both calibrated thresholds are
/// included alongside the results: they are data-dependent, and a reader
/// auditing the flags needs to know what cutoffs were in force.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub event_count: usize,
    pub source_count: usize,
    /// Global per-window cutoff derived from `global_percentile`.
    pub global_threshold: f64,
    /// Population cutoff over per-source maxima, derived from
    /// `source_percentile`.
    pub source_threshold: f64,
    pub anomaly_periods: Vec<AnomalyPeriod>,
    /// Sources strictly above `source_threshold`, hottest first.
    pub flagged_sources: Vec<SourceRateRecord>,
    /// Full per-source table for inspection, hottest first.
    pub source_table: Vec<SourceRateRecord>,
}
