use super::source::{DataSource, RawNewsRecord, RawPricePoint, SourceError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Fetches the news and price tables from a Supabase (PostgREST) project.
///
/// This struct owns the HTTP client used for every request, so the connection
/// pool lives exactly as long as the source does. Both tables are read in full
/// with `select=*`; the pipeline only looks at the columns it needs.
///
/// # Key Features
/// * Reads any table exposed under `/rest/v1/`
/// * Authenticates with the project key in both `apikey` and bearer headers
/// * Surfaces non-success responses as [`SourceError::Status`]
pub struct RestSource {
    base_url: String,
    api_key: String,
    news_table: String,
    price_table: String,
    client: reqwest::Client,
}

impl RestSource {
    /// Creates a new `RestSource` for the given project.
    ///
    /// # Arguments
    /// * `base_url`: Project URL, e.g. `https://xyz.supabase.co` (a trailing slash is ignored)
    /// * `api_key`: Project key sent with every request
    /// * `news_table`: Table holding scraped headlines
    /// * `price_table`: Table holding price points
    ///
    /// # Returns
    /// A new `RestSource` with its own HTTP client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        news_table: impl Into<String>,
        price_table: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            news_table: news_table.into(),
            price_table: price_table.into(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}?select=*", self.base_url, table)
    }

    /// Reads every row of `table` and deserializes it into `T`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The request cannot be sent
    /// - The store answers with a non-success status
    /// - The body is not a JSON array of rows
    async fn fetch_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, SourceError> {
        let url = self.table_url(table);
        debug!(%url, "requesting table");

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(table, status, "store rejected table request");
            return Err(SourceError::Status { status, body });
        }

        let rows = response.json::<Vec<T>>().await?;
        info!(table, rows = rows.len(), "fetched table");

        Ok(rows)
    }
}

#[async_trait]
impl DataSource for RestSource {
    async fn fetch_news(&self) -> Result<Vec<RawNewsRecord>, SourceError> {
        self.fetch_table(&self.news_table).await
    }

    async fn fetch_prices(&self) -> Result<Vec<RawPricePoint>, SourceError> {
        self.fetch_table(&self.price_table).await
    }
}
