use super::{NewsRecord, PricePoint};
use crate::data::{RawNewsRecord, RawPricePoint};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];
const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Reduces a raw date cell to its calendar date.
///
/// Accepts plain dates (dash or slash separated), RFC 3339 and RFC 2822
/// timestamps, and the space-separated text form Postgres uses for
/// `timestamp`/`timestamptz`. The time of day is discarded
/// in the value's own offset. Anything else is missing.
pub fn normalize_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    let stamped = DateTime::parse_from_rfc3339(raw).or_else(|_| DateTime::parse_from_rfc2822(raw));
    if let Ok(ts) = stamped {
        return Some(ts.date_naive());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.date_naive());
        }
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|ts| ts.date())
}

/// Coerces a raw numeric cell to `f64`, treating anything unparsable or
/// non-finite as missing.
pub fn normalize_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

pub fn normalize_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Builds typed news rows from raw ones without touching the input.
pub fn normalize_news(raw: &[RawNewsRecord]) -> Vec<NewsRecord> {
    let news: Vec<NewsRecord> = raw
        .iter()
        .map(|row| NewsRecord {
            date: normalize_date(&row.date),
            title: normalize_text(&row.title),
            url: normalize_text(&row.url),
        })
        .collect();

    let undated = news.iter().filter(|n| n.date.is_none()).count();
    if undated > 0 {
        warn!(undated, "news rows with unparsable date");
    }

    news
}

/// Builds typed price rows from raw ones without touching the input.
pub fn normalize_prices(raw: &[RawPricePoint]) -> Vec<PricePoint> {
    let mut coerced = 0usize;
    let prices: Vec<PricePoint> = raw
        .iter()
        .map(|row| {
            let point = PricePoint {
                date: normalize_date(&row.date),
                open: normalize_number(&row.open),
                close: normalize_number(&row.close),
            };
            coerced += [
                point.date.is_none() && !row.date.is_null(),
                point.open.is_none() && !row.open.is_null(),
                point.close.is_none() && !row.close.is_null(),
            ]
            .into_iter()
            .filter(|&bad| bad)
            .count();
            point
        })
        .collect();

    if coerced > 0 {
        warn!(cells = coerced, "price cells coerced to missing");
    }

    prices
}
