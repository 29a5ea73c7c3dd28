use chrono::{DateTime, TimeDelta, Utc};

use crate::analysis::binning::TimeBucket;
use crate::detect::AnomalyPeriod;

/// Windows whose attempt count strictly exceeds the calibrated threshold,
/// in chronological order. Pure filter, no side effects.
pub fn flag_buckets(buckets: &[TimeBucket], threshold: f64) -> Vec<TimeBucket> {
    buckets
        .iter()
        .filter(|b| b.count as f64 > threshold)
        .cloned()
        .collect()
}

/// Collapse flagged-window midpoints into anomaly periods.
///
/// Midpoints are sorted, then cut wherever the gap to the previous one
/// exceeds `tolerance`; each remaining run becomes one period spanning its
/// first and last midpoint.
pub fn merge_midpoints(midpoints: &[DateTime<Utc>], tolerance: TimeDelta) -> Vec<AnomalyPeriod> {
    let mut times = midpoints.to_vec();
    times.sort_unstable();
    coalesce(
        times
            .into_iter()
            .map(|t| AnomalyPeriod { start: t, end: t })
            .collect(),
        tolerance,
    )
}

/// Merge chronologically adjacent periods whose gap is within `tolerance`.
///
/// Every gap in the output is strictly greater than `tolerance`, so running
/// the merge again over its own output changes nothing.
pub fn coalesce(mut periods: Vec<AnomalyPeriod>, tolerance: TimeDelta) -> Vec<AnomalyPeriod> {
    periods.sort_by_key(|p| p.start);
    let mut merged: Vec<AnomalyPeriod> = Vec::with_capacity(periods.len());
    for period in periods {
        match merged.last_mut() {
            Some(last) if period.start - last.end <= tolerance => {
                if period.end > last.end {
                    last.end = period.end;
                }
            }
            _ => merged.push(period),
        }
    }
    merged
}
