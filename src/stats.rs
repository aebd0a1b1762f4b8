//! Summary statistics over the cleaned sample set

use crate::error::{Result, ScoutError};
use crate::types::Report;
use chrono::Utc;

/// Arithmetic mean. `None` on an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    let count = data.len() as f64;
    if count > 0.0 {
        let sum: f64 = data.iter().sum();
        Some(sum / count)
    } else {
        None
    }
}

/// Population standard deviation. `None` on an empty slice.
///
/// Population (not sample) deviation keeps this consistent with the z-score
/// stage of the cleaner.
pub fn std_deviation(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;
                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Percentile by linear interpolation between closest ranks.
/// `pct` is in [0, 100]; data need not be sorted.
pub fn percentile(data: &[f64], pct: f64) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }

    let weight = rank - lo as f64;
    Some(sorted[lo] * (1.0 - weight) + sorted[hi] * weight)
}

/// Reduce the cleaned samples to the final report.
///
/// Never computes statistics over an empty set: an empty `cleaned` signals
/// the empty-result condition instead of producing NaN.
pub fn summarize(cleaned: &[f64], requested: usize) -> Result<Report> {
    let (Some(mean), Some(std_dev)) = (mean(cleaned), std_deviation(cleaned)) else {
        return Err(ScoutError::EmptyAfterCleaning { requested });
    };

    Ok(Report {
        mean,
        median: percentile(cleaned, 50.0).unwrap_or(mean),
        p25: percentile(cleaned, 25.0).unwrap_or(mean),
        p75: percentile(cleaned, 75.0).unwrap_or(mean),
        std_dev,
        requested,
        used: cleaned.len(),
        generated_at: Utc::now(),
    })
}
