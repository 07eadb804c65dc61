use super::source::{DataSource, RawNewsRecord, RawPricePoint, SourceError};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// A fetched record set and the moment it was fetched.
struct Entry<T> {
    fetched_at: Instant,
    rows: Vec<T>,
}

/// Memoizes a [`DataSource`] for a fixed time window.
///
/// News and prices are cached independently. A cached set is served while it
/// is younger than `ttl`; after that the next call goes back to the inner
/// source. Failed fetches are never cached, and a `ttl` of zero disables
/// caching entirely.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    news: Mutex<Option<Entry<RawNewsRecord>>>,
    prices: Mutex<Option<Entry<RawPricePoint>>>,
}

impl<S: DataSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            news: Mutex::new(None),
            prices: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> S {
        self.inner
    }
}

fn fresh<T: Clone>(slot: &Option<Entry<T>>, ttl: Duration) -> Option<Vec<T>> {
    slot.as_ref()
        .filter(|entry| entry.fetched_at.elapsed() < ttl)
        .map(|entry| entry.rows.clone())
}

#[async_trait]
impl<S: DataSource> DataSource for CachedSource<S> {
    async fn fetch_news(&self) -> Result<Vec<RawNewsRecord>, SourceError> {
        let mut slot = self.news.lock().await;
        if let Some(rows) = fresh(&*slot, self.ttl) {
            debug!(rows = rows.len(), "serving news from cache");
            return Ok(rows);
        }

        let rows = self.inner.fetch_news().await?;
        *slot = Some(Entry {
            fetched_at: Instant::now(),
            rows: rows.clone(),
        });
        Ok(rows)
    }

    async fn fetch_prices(&self) -> Result<Vec<RawPricePoint>, SourceError> {
        let mut slot = self.prices.lock().await;
        if let Some(rows) = fresh(&*slot, self.ttl) {
            debug!(rows = rows.len(), "serving prices from cache");
            return Ok(rows);
        }

        let rows = self.inner.fetch_prices().await?;
        *slot = Some(Entry {
            fetched_at: Instant::now(),
            rows: rows.clone(),
        });
        Ok(rows)
    }
}
