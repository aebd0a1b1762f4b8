//! pricescout
//!
//! Estimates the typical recent sale price of an item category on an online
//! auction marketplace by sampling completed listings, extracting a price
//! from each, and reducing the samples to a robust point estimate.

pub mod cleaning;
pub mod client;
pub mod config;
pub mod discover;
pub mod error;
pub mod estimator;
pub mod extract;
pub mod fetch;
pub mod stats;
pub mod types;
