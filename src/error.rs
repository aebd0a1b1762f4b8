//! Error types for pricescout

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid selector in catalog: `{0}`")]
    InvalidSelector(String),

    #[error("invalid listing pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("no usable samples remain after cleaning ({requested} requested)")]
    EmptyAfterCleaning { requested: usize },
}

pub type Result<T> = std::result::Result<T, ScoutError>;
