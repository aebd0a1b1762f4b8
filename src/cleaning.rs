//! Sample cleaning pipeline
//!
//! Three stages in fixed order, each operating only on the survivors of the
//! previous one:
//! 1. drop failed extractions
//! 2. drop samples outside the expected-price band (when one is configured)
//! 3. drop statistical outliers by z-score
//!
//! The order is part of the contract: the z-stage mean and deviation are
//! computed after failures and band rejects are already gone, so reordering
//! the stages changes the result.

use crate::stats::{mean, std_deviation};
use crate::types::PriceSample;
use serde::Deserialize;
use tracing::debug;

/// Cleaning thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Prior expectation of the item price; unset disables stage 2
    pub expected_price: Option<f64>,
    /// Acceptable deviation from `expected_price`, as a fraction of it
    pub expected_price_band: f64,
    /// Z-score magnitude beyond which a sample counts as an outlier
    pub z_threshold: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            expected_price: None,
            expected_price_band: 0.25,
            z_threshold: 2.0,
        }
    }
}

/// Counts removed per stage plus the surviving samples
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOutcome {
    pub failures: usize,
    pub expected_price_rejects: usize,
    pub statistical_outliers: usize,
    pub cleaned: Vec<f64>,
}

impl CleaningOutcome {
    pub fn removed(&self) -> usize {
        self.failures + self.expected_price_rejects + self.statistical_outliers
    }
}

/// Run the three-stage pipeline over a raw sample collection.
///
/// Order-insensitive with respect to the input (it operates on the sample
/// multiset) and idempotent on its own output.
pub fn clean(samples: &[PriceSample], config: &CleaningConfig) -> CleaningOutcome {
    // Stage 1: failed extractions
    let prices: Vec<f64> = samples.iter().filter_map(PriceSample::price).collect();
    let failures = samples.len() - prices.len();

    // Stage 2: expected-price band
    let (banded, expected_price_rejects) = match config.expected_price {
        Some(expected) => {
            let allowed = expected * config.expected_price_band;
            let kept: Vec<f64> = prices
                .iter()
                .copied()
                .filter(|price| (price - expected).abs() <= allowed)
                .collect();
            let rejects = prices.len() - kept.len();
            (kept, rejects)
        }
        None => (prices, 0),
    };

    // Stage 3: z-score outliers. Skipped when the surviving set is empty or
    // has zero variance, which also keeps the division well-defined.
    let (cleaned, statistical_outliers) = match (mean(&banded), std_deviation(&banded)) {
        (Some(m), Some(sd)) if sd > 0.0 => {
            let kept: Vec<f64> = banded
                .iter()
                .copied()
                .filter(|price| ((price - m) / sd).abs() <= config.z_threshold)
                .collect();
            let outliers = banded.len() - kept.len();
            (kept, outliers)
        }
        _ => (banded, 0),
    };

    debug!(
        "[Clean] failures={} band_rejects={} outliers={} kept={}",
        failures,
        expected_price_rejects,
        statistical_outliers,
        cleaned.len()
    );

    CleaningOutcome {
        failures,
        expected_price_rejects,
        statistical_outliers,
        cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(prices: &[f64]) -> Vec<PriceSample> {
        prices.iter().map(|p| PriceSample::Price(*p)).collect()
    }

    #[test]
    fn test_empty_input_yields_zero_counts() {
        let outcome = clean(&[], &CleaningConfig::default());
        assert_eq!(outcome.failures, 0);
        assert_eq!(outcome.expected_price_rejects, 0);
        assert_eq!(outcome.statistical_outliers, 0);
        assert!(outcome.cleaned.is_empty());
    }

    #[test]
    fn test_failures_removed_before_any_statistic() {
        let samples = vec![
            PriceSample::Price(100.0),
            PriceSample::Failure,
            PriceSample::Price(102.0),
        ];
        let outcome = clean(&samples, &CleaningConfig::default());
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.expected_price_rejects, 0);
        assert_eq!(outcome.statistical_outliers, 0);
        assert_eq!(outcome.cleaned, vec![100.0, 102.0]);
    }

    #[test]
    fn test_unset_expected_price_removes_nothing() {
        let outcome = clean(&raw(&[10.0, 500.0, 20.0]), &CleaningConfig::default());
        assert_eq!(outcome.expected_price_rejects, 0);
    }

    #[test]
    fn test_band_rejects_counted_against_expected_price() {
        let config = CleaningConfig {
            expected_price: Some(100.0),
            expected_price_band: 0.1,
            ..CleaningConfig::default()
        };
        // 130.0 is rejected at the band stage, before the z-stage ever
        // sees it; the remaining pair survives untouched.
        let outcome = clean(&raw(&[95.0, 130.0, 105.0]), &config);
        assert_eq!(outcome.expected_price_rejects, 1);
        assert_eq!(outcome.statistical_outliers, 0);
        assert_eq!(outcome.cleaned, vec![95.0, 105.0]);
    }

    #[test]
    fn test_z_score_flags_far_sample() {
        let config = CleaningConfig {
            z_threshold: 1.0,
            ..CleaningConfig::default()
        };
        // mean 162.5, population std ≈ 194.9; 500.0 has z ≈ 1.73.
        let outcome = clean(&raw(&[50.0, 52.0, 48.0, 500.0]), &config);
        assert_eq!(outcome.statistical_outliers, 1);
        assert_eq!(outcome.cleaned, vec![50.0, 52.0, 48.0]);
    }

    #[test]
    fn test_stage_order_failures_then_band_then_z() {
        let config = CleaningConfig {
            expected_price: Some(100.0),
            expected_price_band: 0.25,
            z_threshold: 2.0,
        };
        let samples = vec![
            PriceSample::Price(90.0),
            PriceSample::Failure,
            PriceSample::Price(110.0),
            PriceSample::Price(400.0), // band reject, never reaches the z-stage
            PriceSample::Price(95.0),
        ];
        let outcome = clean(&samples, &config);
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.expected_price_rejects, 1);
        // Had 400.0 reached the z-stage it would have inflated the deviation
        // enough to keep everything; with the band applied first the three
        // survivors are tight and none is an outlier.
        assert_eq!(outcome.statistical_outliers, 0);
        assert_eq!(outcome.cleaned, vec![90.0, 110.0, 95.0]);
        assert_eq!(outcome.removed(), 2);
    }

    #[test]
    fn test_zero_variance_skips_z_stage() {
        let outcome = clean(&raw(&[42.0, 42.0, 42.0]), &CleaningConfig::default());
        assert_eq!(outcome.statistical_outliers, 0);
        assert_eq!(outcome.cleaned, vec![42.0, 42.0, 42.0]);
    }

    #[test]
    fn test_all_failures_leaves_later_stages_empty() {
        let samples = vec![PriceSample::Failure, PriceSample::Failure];
        let outcome = clean(&samples, &CleaningConfig::default());
        assert_eq!(outcome.failures, 2);
        assert_eq!(outcome.statistical_outliers, 0);
        assert!(outcome.cleaned.is_empty());
    }

    #[test]
    fn test_clean_is_idempotent_on_its_own_output() {
        let config = CleaningConfig {
            expected_price: Some(50.0),
            z_threshold: 1.5,
            ..CleaningConfig::default()
        };
        let first = clean(&raw(&[48.0, 50.0, 53.0, 47.0, 90.0, 12.0]), &config);

        let second = clean(&raw(&first.cleaned), &config);
        assert_eq!(second.failures, 0);
        assert_eq!(second.expected_price_rejects, 0);
        assert_eq!(second.statistical_outliers, 0);
        assert_eq!(second.cleaned, first.cleaned);
    }
}
