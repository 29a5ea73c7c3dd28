use crate::analysis::AnalysisError;

/// Percentile of a count distribution with linear interpolation between
/// order statistics.
///
/// This is the calibration step that turns "99.3% of windows are below X"
/// into a concrete numeric cutoff. The cutoff is re-derived from the data
/// on every run; it is never a baked-in constant. For a fixed distribution
/// the result is monotonic non-decreasing in `p`.
///
/// A distribution where every count is equal yields that count, which
/// downstream means zero anomalies. That is a valid outcome, not an error.
pub fn percentile(counts: &[u64], p: f64) -> Result<f64, AnalysisError> {
    if !(p > 0.0 && p < 100.0) {
        return Err(AnalysisError::PercentileOutOfRange(p));
    }
    if counts.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    sorted.sort_by(f64::total_cmp);

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
