use thiserror::Error;

use crate::types::ArticleId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Failed to fetch reference {url}: {reason}")]
    ReferenceFetch { url: String, reason: String },

    #[error("Generative service error: {0}")]
    Generative(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Article not found: {0}")]
    NotFound(ArticleId),

    #[error("Article {0} is already enhanced")]
    AlreadyEnhanced(ArticleId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
