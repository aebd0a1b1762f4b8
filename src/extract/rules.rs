//! Ordered selector catalog
//!
//! A priority-ordered strategy list: rules are tried in catalog order and
//! the first one yielding a parseable price wins. The catalog is plain
//! configuration; swapping marketplaces never touches extractor control
//! flow.

use super::parse::parse_price_text;
use crate::error::{Result, ScoutError};
use scraper::{Html, Selector};
use tracing::trace;

#[derive(Debug)]
pub struct SelectorCatalog {
    rules: Vec<(String, Selector)>,
}

impl SelectorCatalog {
    /// Compile the configured selector list. An invalid or empty catalog is
    /// a configuration error at startup, never a per-item failure.
    pub fn compile(selectors: &[String]) -> Result<Self> {
        if selectors.is_empty() {
            return Err(ScoutError::Config(
                "price selector catalog is empty".to_string(),
            ));
        }

        let mut rules = Vec::with_capacity(selectors.len());
        for raw in selectors {
            let selector = Selector::parse(raw)
                .map_err(|_| ScoutError::InvalidSelector(raw.clone()))?;
            rules.push((raw.clone(), selector));
        }
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule, in catalog order, that yields a parseable non-negative
    /// price on this document.
    pub fn first_price(&self, html: &str) -> Option<f64> {
        let document = Html::parse_document(html);

        for (raw, selector) in &self.rules {
            let Some(element) = document.select(selector).next() else {
                continue;
            };
            let text = element.text().collect::<String>();
            if let Some(price) = parse_price_text(text.trim()) {
                trace!("[Extract] rule `{}` matched: {}", raw, price);
                return Some(price);
            }
        }

        None
    }
}
