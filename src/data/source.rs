use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A news row exactly as the backing store delivered it.
///
/// Cells are kept untyped so that the normalizer, not the adapter, decides
/// what counts as a usable date or number. Extra columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNewsRecord {
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub url: Value,
}

/// A price row exactly as the backing store delivered it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPricePoint {
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub open: Value,
    #[serde(default)]
    pub close: Value,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Supplies the two raw record sets the pipeline joins.
///
/// Implementations own whatever handle they need (HTTP client, file paths);
/// the caller creates the source, passes it to [`crate::pipeline::run`] and
/// drops it afterwards.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_news(&self) -> Result<Vec<RawNewsRecord>, SourceError>;

    async fn fetch_prices(&self) -> Result<Vec<RawPricePoint>, SourceError>;
}

#[async_trait]
impl<S: DataSource + ?Sized> DataSource for Box<S> {
    async fn fetch_news(&self) -> Result<Vec<RawNewsRecord>, SourceError> {
        (**self).fetch_news().await
    }

    async fn fetch_prices(&self) -> Result<Vec<RawPricePoint>, SourceError> {
        (**self).fetch_prices().await
    }
}
