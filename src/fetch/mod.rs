//! Bounded-concurrency fetch orchestration
//!
//! One task per listing, gated by a semaphore; samples land in completion
//! order through an mpsc channel drained by a single-owner collector. A
//! failing fetch never aborts its siblings, and every dispatched listing
//! yields exactly one sample.

#[cfg(test)]
mod tests;

use crate::client::PageFetcher;
use crate::extract::PriceExtractor;
use crate::types::{ListingId, PriceSample};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

/// Progress event, one per completed fetch. `completed` is monotonically
/// increasing and reaches `total` when the run finishes.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

pub type ProgressSender = mpsc::Sender<Progress>;

/// Cumulative counters across the orchestrator's lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchMetrics {
    pub fetched: u64,
    pub failures: u64,
}

pub struct FetchOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<PriceExtractor>,
    concurrency: usize,
    metrics: Arc<RwLock<FetchMetrics>>,
}

impl FetchOrchestrator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<PriceExtractor>,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            concurrency: concurrency.max(1),
            metrics: Arc::new(RwLock::new(FetchMetrics::default())),
        }
    }

    /// Run the extractor over every listing. Returns exactly one sample per
    /// input listing, in completion order.
    ///
    /// All listings are submitted up front; the semaphore's permits gate how
    /// many are in flight. There is no cancellation path: the collector
    /// waits for every dispatched task.
    pub async fn fetch_all(
        &self,
        ids: Vec<ListingId>,
        progress: Option<ProgressSender>,
    ) -> Vec<PriceSample> {
        let total = ids.len();
        if total == 0 {
            return Vec::new();
        }

        debug!("[Fetch] dispatching {} listings, {} concurrent", total, self.concurrency);

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<PriceSample>(total);

        for id in ids {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let tx = tx.clone();

            tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        // Semaphore closed mid-run; still account for the
                        // listing so the length invariant holds.
                        let _ = tx.send(PriceSample::Failure).await;
                        return;
                    }
                };
                let sample = extractor.extract_price(fetcher.as_ref(), &id).await;
                let _ = tx.send(sample).await;
            });
        }
        drop(tx);

        let mut samples = Vec::with_capacity(total);
        while let Some(sample) = rx.recv().await {
            {
                let mut metrics = self.metrics.write();
                metrics.fetched += 1;
                if sample.is_failure() {
                    metrics.failures += 1;
                }
            }
            samples.push(sample);

            if let Some(progress) = &progress {
                // Display only; a slow consumer must never stall collection.
                // Skipped events are harmless, `completed` is cumulative.
                let _ = progress.try_send(Progress {
                    completed: samples.len(),
                    total,
                });
            }
        }

        if samples.len() < total {
            // A panicked task never sent its sample; keep the length
            // invariant anyway.
            warn!(
                "[Fetch] {} of {} tasks returned nothing, recording failures",
                total - samples.len(),
                total
            );
            samples.resize(total, PriceSample::Failure);
        }

        samples
    }

    pub fn metrics(&self) -> FetchMetrics {
        *self.metrics.read()
    }
}
