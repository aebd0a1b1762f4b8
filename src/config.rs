//! Configuration management

use crate::cleaning::CleaningConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub marketplace: MarketplaceConfig,
    pub scraper: ScraperConfig,
    pub cleaning: CleaningConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Marketplace root, no trailing slash
    pub base_url: String,
    /// Search results path under `base_url`
    pub search_path: String,
    /// Pattern a listing URL must match inside an anchor href
    pub listing_url_pattern: String,
    /// Query suffix selecting the "original listing" page variant
    pub fallback_query: String,
    /// Ordered CSS selector catalog for the price block, first match wins
    pub price_selectors: Vec<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ebay.com".to_string(),
            search_path: "/sch/i.html".to_string(),
            listing_url_pattern: r"https://www\.ebay\.com/itm/.+/\d+".to_string(),
            fallback_query: "nordt=true&orig_cvip=true".to_string(),
            price_selectors: vec![
                "#convbidPrice".to_string(),
                "#convbinPrice".to_string(),
                "#w3 > div > div.nodestar-item-card-details__table-row1 > \
                 div.nodestar-item-card-details > \
                 div.nodestar-item-card-details__content-wrapper > \
                 div.nodestar-item-card-details__condition-wrapper > div > \
                 div:nth-child(3) > div:nth-child(2) > span > span > span"
                    .to_string(),
                "#prcIsum".to_string(),
                "#mm-saleDscPrc".to_string(),
                "#prcIsum_bidPrice".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum concurrent listing fetches
    pub concurrency: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency: 50,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from file, layered with PRICESCOUT_* env vars
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_str().ok_or_else(|| {
            anyhow::anyhow!("config path is not valid UTF-8")
        })?;
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("PRICESCOUT"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// Load from default locations, falling back to built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        let paths = ["pricescout.toml", "~/.config/pricescout/config.toml"];

        for path in paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::load(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }
}
