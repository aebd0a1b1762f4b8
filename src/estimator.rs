//! End-to-end estimation runs
//!
//! Wires discovery, orchestrated extraction, cleaning, and summarization
//! into the single entry point the CLI (or any other driver) calls.

use crate::cleaning::{clean, CleaningConfig};
use crate::client::{HttpSession, PageFetcher};
use crate::config::Config;
use crate::discover::LinkDiscoverer;
use crate::error::Result;
use crate::extract::PriceExtractor;
use crate::fetch::{FetchOrchestrator, ProgressSender};
use crate::stats::summarize;
use crate::types::Report;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// A finished run: the statistics report plus what cleaning removed.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub report: Report,
    pub failures: usize,
    pub expected_price_rejects: usize,
    pub statistical_outliers: usize,
}

pub struct Estimator {
    discoverer: LinkDiscoverer,
    orchestrator: FetchOrchestrator,
    fetcher: Arc<dyn PageFetcher>,
}

impl Estimator {
    /// Wire the pipeline against the production HTTP session.
    pub fn new(config: &Config) -> Result<Self> {
        let session = Arc::new(HttpSession::new(&config.scraper)?);
        Self::with_fetcher(config, session)
    }

    /// Wire the pipeline against any page fetcher. Tests substitute mocks
    /// here; the session/header state behind the fetcher is opaque to the
    /// pipeline and reused across the whole run.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let discoverer = LinkDiscoverer::new(config.marketplace.clone())?;
        let extractor = Arc::new(PriceExtractor::new(&config.marketplace)?);
        let orchestrator = FetchOrchestrator::new(
            Arc::clone(&fetcher),
            extractor,
            config.scraper.concurrency,
        );

        Ok(Self {
            discoverer,
            orchestrator,
            fetcher,
        })
    }

    /// Full pipeline: discover → fetch → clean → summarize.
    pub async fn run(
        &self,
        term: &str,
        desired_count: usize,
        thresholds: &CleaningConfig,
    ) -> Result<Report> {
        self.estimate_with_progress(term, desired_count, thresholds, None)
            .await
            .map(|estimate| estimate.report)
    }

    pub async fn estimate(
        &self,
        term: &str,
        desired_count: usize,
        thresholds: &CleaningConfig,
    ) -> Result<Estimate> {
        self.estimate_with_progress(term, desired_count, thresholds, None)
            .await
    }

    /// Like [`Estimator::estimate`], publishing one progress event per
    /// completed fetch.
    pub async fn estimate_with_progress(
        &self,
        term: &str,
        desired_count: usize,
        thresholds: &CleaningConfig,
        progress: Option<ProgressSender>,
    ) -> Result<Estimate> {
        let ids = self
            .discoverer
            .discover(self.fetcher.as_ref(), term, desired_count)
            .await?;

        let samples = self
            .orchestrator
            .fetch_all(ids.into_iter().collect(), progress)
            .await;

        let outcome = clean(&samples, thresholds);
        info!(
            "[Estimator] '{}': {} sampled, {} kept ({} failures, {} band rejects, {} outliers)",
            term,
            samples.len(),
            outcome.cleaned.len(),
            outcome.failures,
            outcome.expected_price_rejects,
            outcome.statistical_outliers
        );

        let report = summarize(&outcome.cleaned, desired_count)?;
        Ok(Estimate {
            report,
            failures: outcome.failures,
            expected_price_rejects: outcome.expected_price_rejects,
            statistical_outliers: outcome.statistical_outliers,
        })
    }
}
