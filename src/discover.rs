//! Completed-listing discovery
//!
//! Turns a search term into a deduplicated set of listing URLs by fetching
//! one marketplace search page constrained to sold/completed results and
//! scanning every anchor against the configured listing-URL pattern.

use crate::client::PageFetcher;
use crate::config::MarketplaceConfig;
use crate::error::Result;
use crate::types::ListingId;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

pub struct LinkDiscoverer {
    config: MarketplaceConfig,
    listing_re: Regex,
}

impl LinkDiscoverer {
    pub fn new(config: MarketplaceConfig) -> Result<Self> {
        let listing_re = Regex::new(&config.listing_url_pattern)?;
        Ok(Self { config, listing_re })
    }

    /// Fetch one search results page and collect every listing link on it.
    ///
    /// An empty set means the search matched nothing; that is a normal
    /// result, not an error. Only the search fetch itself can fail.
    pub async fn discover(
        &self,
        fetcher: &dyn PageFetcher,
        term: &str,
        desired_count: usize,
    ) -> Result<HashSet<ListingId>> {
        let url = self.search_url(term, desired_count)?;
        info!("[Discover] Searching {}", url);

        let html = fetcher.fetch(url.as_str()).await?;
        let ids = self.scan_links(&html);

        info!("[Discover] {} unique listings for '{}'", ids.len(), term);
        Ok(ids)
    }

    /// Search URL constrained to sold/completed listings, `count` results
    /// per page. The marketplace accepts 25/50/100/200 and rounds anything
    /// else as it pleases; the value is passed through.
    fn search_url(&self, term: &str, count: usize) -> Result<Url> {
        let base = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.search_path
        );
        let url = Url::parse_with_params(
            &base,
            &[
                ("_nkw", term),
                ("LH_Sold", "1"),
                ("LH_Complete", "1"),
                ("_ipg", &count.to_string()),
            ],
        )?;
        Ok(url)
    }

    /// Anchor scan over a fetched search page. Duplicates collapse via set
    /// semantics so no listing is fetched twice downstream.
    fn scan_links(&self, html: &str) -> HashSet<ListingId> {
        let document = Html::parse_document(html);
        let anchors = Selector::parse("a").unwrap();

        let mut ids = HashSet::new();
        for anchor in document.select(&anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if let Some(m) = self.listing_re.find(href) {
                ids.insert(ListingId::new(m.as_str()));
            }
        }

        debug!("[Discover] scanned page, {} listing links", ids.len());
        ids
    }
}
