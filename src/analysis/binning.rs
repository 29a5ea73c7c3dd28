use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::analysis::AnalysisError;

/// One fixed-width counting window over the event timeline.
///
/// Windows are half-open `[window_start, window_end)`, contiguous, and
/// cover the full span of the binned events with no gaps, so a quiet
/// minute shows up as a zero-count bucket rather than a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub count: u64,
}

impl TimeBucket {
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.window_start + (self.window_end - self.window_start) / 2
    }
}

/// Bin instants into contiguous windows of width `window` spanning
/// `[min, max]` of the input, empty windows included.
///
/// The input does not need to be sorted. A zero-width span (a single
/// event, or every event at the same instant) still yields one full
/// window. The sum of all bucket counts equals the input length.
pub fn bin_events(
    timestamps: &[DateTime<Utc>],
    window: TimeDelta,
) -> Result<Vec<TimeBucket>, AnalysisError> {
    if timestamps.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let window_us = match window.num_microseconds() {
        Some(us) if us > 0 => us,
        _ => {
            return Err(AnalysisError::NonPositiveWindow {
                seconds: window.num_seconds(),
            })
        }
    };

    let min_us = timestamps.iter().map(|t| t.timestamp_micros()).min().unwrap_or(0);
    let max_us = timestamps.iter().map(|t| t.timestamp_micros()).max().unwrap_or(0);
    let origin = DateTime::from_timestamp_micros(min_us)
        .unwrap_or_else(|| timestamps[0]);

    // Enough windows to place max strictly before the last window's end.
    let n_buckets = ((max_us - min_us) / window_us) as usize + 1;

    let mut buckets: Vec<TimeBucket> = (0..n_buckets)
        .map(|i| {
            let start = origin + TimeDelta::microseconds(window_us * i as i64);
            TimeBucket {
                window_start: start,
                window_end: start + window,
                count: 0,
            }
        })
        .collect();

    for ts in timestamps {
        let idx = ((ts.timestamp_micros() - min_us) / window_us) as usize;
        buckets[idx].count += 1;
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = bin_events(&[], TimeDelta::seconds(60)).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn test_single_event_still_produces_one_window() {
        let buckets = bin_events(&[at(0)], TimeDelta::seconds(60)).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[0].window_end - buckets[0].window_start, TimeDelta::seconds(60));
    }

    #[test]
    fn test_counts_sum_and_gap_free_coverage() {
        // 3 events in minute 0, none in minute 1, 2 in minute 2.
        let ts = vec![at(0), at(10), at(59), at(120), at(130)];
        let buckets = bin_events(&ts, TimeDelta::seconds(60)).unwrap();
        assert_eq!(buckets.len(), 3);
        assert_eq!(
            buckets.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![3, 0, 2]
        );
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].window_end, pair[1].window_start);
        }
    }

    #[test]
    fn test_event_on_window_boundary_lands_in_next_window() {
        // max falls exactly on a window edge; half-open windows put it in
        // a new bucket rather than the previous one.
        let ts = vec![at(0), at(60)];
        let buckets = bin_events(&ts, TimeDelta::seconds(60)).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn test_unsorted_input_bins_identically() {
        let sorted = vec![at(5), at(65), at(125)];
        let shuffled = vec![at(125), at(5), at(65)];
        let a = bin_events(&sorted, TimeDelta::seconds(60)).unwrap();
        let b = bin_events(&shuffled, TimeDelta::seconds(60)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_width_window_rejected() {
        let err = bin_events(&[at(0)], TimeDelta::zero()).unwrap_err();
        assert!(matches!(err, AnalysisError::NonPositiveWindow { .. }));
    }

    #[test]
    fn test_midpoint_is_window_center() {
        let buckets = bin_events(&[at(0)], TimeDelta::seconds(60)).unwrap();
        assert_eq!(buckets[0].midpoint(), at(30));
    }
}
