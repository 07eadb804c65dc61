use super::source::{DataSource, RawNewsRecord, RawPricePoint, SourceError};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Reads the news and price record sets from two local CSV exports.
pub struct CsvSource {
    news_path: PathBuf,
    price_path: PathBuf,
}

impl CsvSource {
    pub fn new(news_path: impl Into<PathBuf>, price_path: impl Into<PathBuf>) -> Self {
        Self {
            news_path: news_path.into(),
            price_path: price_path.into(),
        }
    }
}

#[async_trait]
impl DataSource for CsvSource {
    async fn fetch_news(&self) -> Result<Vec<RawNewsRecord>, SourceError> {
        let bytes = tokio::fs::read(&self.news_path).await?;
        let rows = read_news(bytes.as_slice())?;
        info!(path = %self.news_path.display(), rows = rows.len(), "loaded news CSV");
        Ok(rows)
    }

    async fn fetch_prices(&self) -> Result<Vec<RawPricePoint>, SourceError> {
        let bytes = tokio::fs::read(&self.price_path).await?;
        let rows = read_prices(bytes.as_slice())?;
        info!(path = %self.price_path.display(), rows = rows.len(), "loaded price CSV");
        Ok(rows)
    }
}

/// Parses headline rows; `date`, `title` and `url` columns are required.
pub fn read_news<R: Read>(reader: R) -> Result<Vec<RawNewsRecord>, SourceError> {
    read_columns(reader, ["date", "title", "url"]).map(|rows| {
        rows.into_iter()
            .map(|[date, title, url]| RawNewsRecord { date, title, url })
            .collect()
    })
}

/// Parses price rows; `date`, `open` and `close` columns are required.
pub fn read_prices<R: Read>(reader: R) -> Result<Vec<RawPricePoint>, SourceError> {
    read_columns(reader, ["date", "open", "close"]).map(|rows| {
        rows.into_iter()
            .map(|[date, open, close]| RawPricePoint { date, open, close })
            .collect()
    })
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize, SourceError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(column))
        .ok_or_else(|| SourceError::MissingColumn(column.to_string()))
}

fn read_columns<R: Read, const N: usize>(
    reader: R,
    columns: [&str; N],
) -> Result<Vec<[Value; N]>, SourceError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = column_index(&headers, column)?;
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // Short rows and empty cells both read as null.
        rows.push(indices.map(|i| match record.get(i) {
            Some(cell) if !cell.is_empty() => Value::String(cell.to_string()),
            _ => Value::Null,
        }));
    }

    Ok(rows)
}
