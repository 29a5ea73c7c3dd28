//! Statistical building blocks: time binning and percentile calibration.

pub mod binning;
pub mod stats;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no events to analyze")]
    EmptyInput,
    #[error("percentile must be inside the open interval (0, 100), got {0}")]
    PercentileOutOfRange(f64),
    #[error("window width must be positive, got {seconds}s")]
    NonPositiveWindow { seconds: i64 },
    #[error("merge tolerance must be positive, got {seconds}s")]
    NonPositiveTolerance { seconds: i64 },
    #[error("per-source worker thread panicked")]
    WorkerPanicked,
}
