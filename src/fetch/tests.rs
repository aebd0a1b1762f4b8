//! Orchestrator tests over an in-memory fetcher

use super::*;
use crate::client::PageFetcher;
use crate::config::MarketplaceConfig;
use crate::error::Result;
use crate::extract::PriceExtractor;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves a price page for URLs containing `itm/good`, an empty page
/// otherwise, while tracking how many fetches are in flight.
struct StubFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
}

impl StubFetcher {
    fn new(delay: Duration) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            delay,
        }
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if url.contains("itm/good") {
            Ok(r#"<html><body><span id="prcIsum">US $10.00</span></body></html>"#.to_string())
        } else {
            Ok("<html><body></body></html>".to_string())
        }
    }
}

fn orchestrator(fetcher: Arc<dyn PageFetcher>, concurrency: usize) -> FetchOrchestrator {
    let extractor = Arc::new(PriceExtractor::new(&MarketplaceConfig::default()).unwrap());
    FetchOrchestrator::new(fetcher, extractor, concurrency)
}

fn ids(good: usize, bad: usize) -> Vec<ListingId> {
    let mut out = Vec::new();
    for i in 0..good {
        out.push(ListingId::new(format!("https://www.ebay.com/itm/good/{i}")));
    }
    for i in 0..bad {
        out.push(ListingId::new(format!("https://www.ebay.com/itm/bad/{i}")));
    }
    out
}

#[tokio::test]
async fn test_output_length_equals_input_length() {
    let fetcher = Arc::new(StubFetcher::new(Duration::from_millis(1)));
    let orch = orchestrator(fetcher, 4);

    let samples = orch.fetch_all(ids(3, 2), None).await;
    assert_eq!(samples.len(), 5);
    assert_eq!(samples.iter().filter(|s| !s.is_failure()).count(), 3);
    assert_eq!(samples.iter().filter(|s| s.is_failure()).count(), 2);
}

#[tokio::test]
async fn test_empty_input_yields_empty_output() {
    let fetcher = Arc::new(StubFetcher::new(Duration::ZERO));
    let orch = orchestrator(fetcher, 4);

    let samples = orch.fetch_all(Vec::new(), None).await;
    assert!(samples.is_empty());
}

#[tokio::test]
async fn test_concurrency_cap_is_respected() {
    let fetcher = Arc::new(StubFetcher::new(Duration::from_millis(20)));
    let orch = orchestrator(Arc::clone(&fetcher) as Arc<dyn PageFetcher>, 3);

    let samples = orch.fetch_all(ids(0, 12), None).await;
    assert_eq!(samples.len(), 12);
    assert!(
        fetcher.peak.load(Ordering::SeqCst) <= 3,
        "peak in-flight {} exceeded cap",
        fetcher.peak.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_failures_never_abort_siblings() {
    // Half the listings miss every rule on both attempts; the other half
    // still come back as prices.
    let fetcher = Arc::new(StubFetcher::new(Duration::from_millis(1)));
    let orch = orchestrator(fetcher, 2);

    let samples = orch.fetch_all(ids(4, 4), None).await;
    assert_eq!(samples.len(), 8);
    assert_eq!(samples.iter().filter(|s| !s.is_failure()).count(), 4);
}

#[tokio::test]
async fn test_progress_is_monotonic_and_reaches_total() {
    let fetcher = Arc::new(StubFetcher::new(Duration::from_millis(1)));
    let orch = orchestrator(fetcher, 4);

    let (tx, mut rx) = mpsc::channel::<Progress>(16);
    let samples = orch.fetch_all(ids(5, 3), Some(tx)).await;
    assert_eq!(samples.len(), 8);

    let mut last = 0;
    while let Some(event) = rx.recv().await {
        assert!(event.completed > last, "progress went backwards");
        assert_eq!(event.total, 8);
        last = event.completed;
    }
    assert_eq!(last, 8);
}

#[tokio::test]
async fn test_metrics_accumulate() {
    let fetcher = Arc::new(StubFetcher::new(Duration::from_millis(1)));
    let orch = orchestrator(fetcher, 4);

    orch.fetch_all(ids(2, 1), None).await;
    let metrics = orch.metrics();
    assert_eq!(metrics.fetched, 3);
    assert_eq!(metrics.failures, 1);
}
