//! HTTP session shared by the pipeline
//!
//! One `reqwest::Client` with a spoofed browser identity serves every fetch
//! in a run. `PageFetcher` is the transport seam: production code goes
//! through [`HttpSession`], tests substitute a mock.

mod session;


pub use session::HttpSession;

use crate::error::Result;
use async_trait::async_trait;

/// Page-fetch boundary. Implementors return the raw HTML body of `url`.
///
/// A transport error here is per-item: the extractor absorbs it into the
/// `Failure` sample, it never aborts a run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
