//! Core data types shared across the pipeline

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Canonical URL of a single marketplace listing.
///
/// Derived from an anchor href by the discoverer. Two anchors pointing at the
/// same listing collapse to one `ListingId` via set semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Primary listing page URL.
    pub fn url(&self) -> &str {
        &self.0
    }

    /// The "original listing" page variant, used for the second extraction
    /// attempt.
    pub fn fallback_url(&self, query_suffix: &str) -> String {
        format!("{}?{}", self.0, query_suffix)
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One completed-listing observation: an observed price, or the failure
/// sentinel. Never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceSample {
    Price(f64),
    Failure,
}

impl PriceSample {
    pub fn price(&self) -> Option<f64> {
        match self {
            PriceSample::Price(p) => Some(*p),
            PriceSample::Failure => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PriceSample::Failure)
    }
}

/// Summary statistics over the cleaned sample set.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub mean: f64,
    /// 50th percentile, linear interpolation between closest ranks.
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Sample count the caller asked for.
    pub requested: usize,
    /// Sample count the statistics are computed over.
    pub used: usize,
    pub generated_at: DateTime<Utc>,
}
