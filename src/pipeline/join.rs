use super::{DailyPrice, NewsRecord};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A news row with the day's prices attached, before metrics are derived.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedNews {
    pub news: NewsRecord,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

/// Left-joins news onto daily prices by exact calendar date.
///
/// Every news row comes out exactly once and in its original order. Rows with
/// no matching day, or with no date at all, get missing prices.
///
/// # Arguments
/// * `news`: Normalized headlines (the driving side)
/// * `daily`: Aggregated prices, at most one per date
///
/// # Returns
/// One `JoinedNews` per input headline
pub fn left_join(news: Vec<NewsRecord>, daily: &[DailyPrice]) -> Vec<JoinedNews> {
    let by_date: HashMap<NaiveDate, &DailyPrice> = daily.iter().map(|d| (d.date, d)).collect();

    news.into_iter()
        .map(|news| {
            let price = news.date.and_then(|date| by_date.get(&date).copied());
            JoinedNews {
                open: price.and_then(|p| p.open),
                close: price.and_then(|p| p.close),
                news,
            }
        })
        .collect()
}
