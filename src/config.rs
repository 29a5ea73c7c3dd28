//! Analysis configuration: an explicit parameter set threaded through the
//! pipeline instead of ambient state.
//!
//! Defaults match the reference calibration (1-minute windows, p99.3 global,
//! p99.97 per-source, 2-minute merge tolerance) and can be overridden from a
//! TOML file or CLI flags. The thresholds themselves are never configured;
//! they are always re-derived from the data.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Width of each counting window, in seconds.
    pub window_width_secs: u64,
    /// Percentile of the per-window count distribution used as the global
    /// rate cutoff.
    pub global_percentile: f64,
    /// Maximum gap between flagged windows that still merges them into one
    /// anomaly period, in seconds.
    pub merge_tolerance_secs: u64,
    /// Percentile of the per-source maxima population used as the source
    /// rate cutoff.
    pub source_percentile: f64,
    /// Worker threads for the per-source fan-out; 0 means size from
    /// available parallelism.
    pub max_workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_width_secs: 60,
            global_percentile: 99.3,
            merge_tolerance_secs: 120,
            source_percentile: 99.97,
            max_workers: 0,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded analysis configuration");
        Ok(config)
    }

    pub fn window_width(&self) -> TimeDelta {
        TimeDelta::seconds(self.window_width_secs as i64)
    }

    pub fn merge_tolerance(&self) -> TimeDelta {
        TimeDelta::seconds(self.merge_tolerance_secs as i64)
    }

    /// Reject parameter values the pipeline is undefined for.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_width_secs == 0 {
            return Err(AnalysisError::NonPositiveWindow { seconds: 0 });
        }
        if self.merge_tolerance_secs == 0 {
            return Err(AnalysisError::NonPositiveTolerance { seconds: 0 });
        }
        for p in [self.global_percentile, self.source_percentile] {
            if !(p > 0.0 && p < 100.0) {
                return Err(AnalysisError::PercentileOutOfRange(p));
            }
        }
        Ok(())
    }
}
