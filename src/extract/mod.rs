//! Per-listing price extraction
//!
//! Two fetch attempts per listing: the primary page, then the "original
//! listing" variant reached via a fixed query suffix. Each attempt runs the
//! same ordered selector catalog; the first rule yielding a parseable
//! non-negative price wins. There is no third attempt and no backoff.

mod parse;
mod rules;


pub use parse::parse_price_text;
pub use rules::SelectorCatalog;

use crate::client::PageFetcher;
use crate::config::MarketplaceConfig;
use crate::error::Result;
use crate::types::{ListingId, PriceSample};
use tracing::debug;

/// Extraction attempt state: `TryPrimary → TrySecondary → {Found, Failed}`.
/// `TrySecondary` is entered exactly once, after a primary-page miss of any
/// kind (parse miss and transport error are treated identically).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    TryPrimary,
    TrySecondary,
}

pub struct PriceExtractor {
    catalog: SelectorCatalog,
    fallback_query: String,
}

impl PriceExtractor {
    pub fn new(config: &MarketplaceConfig) -> Result<Self> {
        Ok(Self {
            catalog: SelectorCatalog::compile(&config.price_selectors)?,
            fallback_query: config.fallback_query.clone(),
        })
    }

    /// Extract one price. Transport errors and exhausted catalogs both end
    /// in `PriceSample::Failure` for this listing only; nothing here is
    /// fatal to the surrounding run.
    pub async fn extract_price(
        &self,
        fetcher: &dyn PageFetcher,
        id: &ListingId,
    ) -> PriceSample {
        let mut attempt = Attempt::TryPrimary;

        loop {
            let url = match attempt {
                Attempt::TryPrimary => id.url().to_string(),
                Attempt::TrySecondary => id.fallback_url(&self.fallback_query),
            };

            match fetcher.fetch(&url).await {
                Ok(html) => {
                    if let Some(price) = self.catalog.first_price(&html) {
                        return PriceSample::Price(price);
                    }
                    debug!("[Extract] no rule matched on {}", url);
                }
                Err(e) => {
                    debug!("[Extract] fetch failed for {}: {}", url, e);
                }
            }

            match attempt {
                Attempt::TryPrimary => attempt = Attempt::TrySecondary,
                Attempt::TrySecondary => return PriceSample::Failure,
            }
        }
    }
}
