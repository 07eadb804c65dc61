pub mod aggregate;
pub mod derive;
pub mod join;
pub mod normalize;

use crate::data::{DataSource, RawNewsRecord, RawPricePoint, SourceError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// A scraped headline after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// A single price observation after normalization; several may share a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

/// Mean open/close for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

/// A headline paired with its day's prices and the derived display fields.
///
/// # Fields
/// * `open`, `close`: Daily means, missing when no price exists for the date
/// * `price_change`: `close - open`, missing if either side is missing
/// * `link`: Escaped HTML anchor, or escaped plain text when no web url is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub price_change: Option<f64>,
    pub link: String,
}

/// Everything the presentation layer needs: the joined headlines and the
/// standalone daily price history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub joined: Vec<JoinedRow>,
    pub daily_prices: Vec<DailyPrice>,
}

impl PipelineOutput {
    /// Joined rows that matched a day with an `open` price.
    pub fn with_price_data(&self) -> impl Iterator<Item = &JoinedRow> {
        self.joined.iter().filter(|row| row.open.is_some())
    }

    /// Earliest and latest headline date, ignoring undated rows.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.joined.iter().filter_map(|row| row.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    pub fn price_change_count(&self) -> usize {
        self.joined
            .iter()
            .filter(|row| row.price_change.is_some())
            .count()
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data source unavailable while fetching {dataset}: {source}")]
    SourceUnavailable {
        dataset: &'static str,
        #[source]
        source: SourceError,
    },
}

/// Runs normalize, aggregate, join and derive over already-fetched rows.
///
/// The inputs are only borrowed, and the same inputs always produce the same
/// output. Daily prices are computed from the price rows alone, so they are
/// unaffected by an empty news set.
///
/// # Arguments
/// * `raw_news`: Headline rows as delivered by the data source
/// * `raw_prices`: Price rows as delivered by the data source
///
/// # Returns
/// The joined rows (one per headline) and the daily price history
pub fn transform(raw_news: &[RawNewsRecord], raw_prices: &[RawPricePoint]) -> PipelineOutput {
    let news = normalize::normalize_news(raw_news);
    let prices = normalize::normalize_prices(raw_prices);

    let daily_prices = aggregate::daily_average(&prices);
    let joined: Vec<JoinedRow> = join::left_join(news, &daily_prices)
        .into_iter()
        .map(derive::derive)
        .collect();

    info!(
        headlines = joined.len(),
        price_points = prices.len(),
        days = daily_prices.len(),
        "pipeline complete"
    );

    PipelineOutput {
        joined,
        daily_prices,
    }
}

/// Fetches both record sets from `source` and transforms them.
///
/// # Errors
/// Returns [`PipelineError::SourceUnavailable`] if either fetch fails; no
/// partial output is produced in that case.
pub async fn run<S: DataSource + ?Sized>(source: &S) -> Result<PipelineOutput, PipelineError> {
    let raw_news = source
        .fetch_news()
        .await
        .map_err(|err| PipelineError::SourceUnavailable {
            dataset: "news",
            source: err,
        })?;
    let raw_prices = source
        .fetch_prices()
        .await
        .map_err(|err| PipelineError::SourceUnavailable {
            dataset: "prices",
            source: err,
        })?;

    Ok(transform(&raw_news, &raw_prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw_news(date: &str, title: &str) -> RawNewsRecord {
        RawNewsRecord {
            date: json!(date),
            title: json!(title),
            url: json!("http://x"),
        }
    }

    fn raw_price(date: &str, open: serde_json::Value, close: serde_json::Value) -> RawPricePoint {
        RawPricePoint {
            date: json!(date),
            open,
            close,
        }
    }

    #[test]
    fn test_transform_joins_and_derives() {
        let news = vec![
            raw_news("2024-01-01T09:00:00Z", "Morning"),
            raw_news("2024-01-01 18:00:00", "Evening"),
            raw_news("2024-01-02", "Title"),
        ];
        let prices = vec![
            raw_price("2024-01-01", json!(100), json!("110")),
            raw_price("2024-01-01T12:00:00Z", json!("200"), json!(220)),
        ];

        let output = transform(&news, &prices);

        assert_eq!(output.joined.len(), 3);
        assert_eq!(output.daily_prices.len(), 1);
        assert_eq!(output.joined[0].open, Some(150.0));
        assert_eq!(output.joined[1].price_change, Some(15.0));
        assert_eq!(output.joined[2].date, Some(ymd(2024, 1, 2)));
        assert_eq!(output.joined[2].open, None);
        assert_eq!(output.joined[2].price_change, None);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let news = vec![raw_news("2024-01-01", "a"), raw_news("bad", "b")];
        let prices = vec![raw_price("2024-01-01", json!("abc"), json!(3))];

        assert_eq!(transform(&news, &prices), transform(&news, &prices));
    }

    #[test]
    fn test_infinite_cells_become_missing_not_nan() {
        let news = vec![raw_news("2024-01-01", "a")];
        let prices = vec![
            raw_price("2024-01-01", json!("inf"), json!("inf")),
            raw_price("2024-01-01", json!("-inf"), json!(null)),
        ];

        let output = transform(&news, &prices);

        assert_eq!(output.daily_prices[0].open, None);
        assert_eq!(output.daily_prices[0].close, None);
        assert_eq!(output.joined[0].price_change, None);
        assert_eq!(output, transform(&news, &prices));
    }

    #[test]
    fn test_empty_news_still_yields_daily_prices() {
        let prices = vec![raw_price("2024-01-01", json!(1), json!(2))];

        let output = transform(&[], &prices);

        assert!(output.joined.is_empty());
        assert_eq!(output.daily_prices.len(), 1);
        assert_eq!(output.date_range(), None);
    }

    #[test]
    fn test_output_helpers() {
        let news = vec![
            raw_news("2024-01-03", "c"),
            raw_news("2024-01-01", "a"),
            raw_news("garbage", "x"),
            raw_news("2024-01-02", "b"),
        ];
        let prices = vec![
            raw_price("2024-01-01", json!(1), json!(2)),
            raw_price("2024-01-02", json!(5), json!(null)),
        ];

        let output = transform(&news, &prices);

        assert_eq!(output.with_price_data().count(), 2);
        assert_eq!(output.price_change_count(), 1);
        assert_eq!(
            output.date_range(),
            Some((ymd(2024, 1, 1), ymd(2024, 1, 3)))
        );
    }
}
