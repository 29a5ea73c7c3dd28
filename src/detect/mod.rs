//! Rate-anomaly detection over binned authentication attempts.

pub mod global;
pub mod source;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A maximal run of time during which the global attempt rate stayed
/// above threshold, after merging temporally close flagged windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnomalyPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The busiest single window observed for one source, computed from that
/// source's own events only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRateRecord {
    pub source_id: String,
    pub max_count_per_window: u64,
}
