use super::{DailyPrice, PricePoint};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Running sum and count of the present values in one column of one day.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0)
            .then(|| self.sum / self.count as f64)
            .filter(|mean| mean.is_finite())
    }
}

/// Collapses price points to one row per calendar date.
///
/// `open` and `close` are averaged independently over the values present for
/// that day; a day where every value of a column is missing keeps that column
/// missing. Points without a usable date have no key and are skipped.
///
/// # Arguments
/// * `prices`: Normalized price points, possibly several per date
///
/// # Returns
/// One `DailyPrice` per distinct date, ascending by date
pub fn daily_average(prices: &[PricePoint]) -> Vec<DailyPrice> {
    let mut days: BTreeMap<NaiveDate, (Mean, Mean)> = BTreeMap::new();

    for point in prices {
        let Some(date) = point.date else { continue };
        let (open, close) = days.entry(date).or_default();
        open.push(point.open);
        close.push(point.close);
    }

    days.into_iter()
        .map(|(date, (open, close))| DailyPrice {
            date,
            open: open.value(),
            close: close.value(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn point(date: NaiveDate, open: Option<f64>, close: Option<f64>) -> PricePoint {
        PricePoint {
            date: Some(date),
            open,
            close,
        }
    }

    #[test]
    fn test_same_day_points_are_averaged() {
        let day = ymd(2024, 1, 1);
        let prices = vec![
            point(day, Some(100.0), Some(110.0)),
            point(day, Some(200.0), Some(220.0)),
        ];

        let daily = daily_average(&prices);

        assert_eq!(
            daily,
            vec![DailyPrice {
                date: day,
                open: Some(150.0),
                close: Some(165.0),
            }]
        );
    }

    #[test]
    fn test_missing_values_are_ignored_per_column() {
        let day = ymd(2024, 1, 1);
        let prices = vec![
            point(day, Some(100.0), None),
            point(day, None, Some(90.0)),
            point(day, Some(300.0), None),
        ];

        let daily = daily_average(&prices);

        assert_eq!(daily[0].open, Some(200.0));
        assert_eq!(daily[0].close, Some(90.0));
    }

    #[test]
    fn test_all_missing_column_stays_missing() {
        let day = ymd(2024, 1, 1);
        let prices = vec![point(day, None, Some(5.0)), point(day, None, Some(7.0))];

        let daily = daily_average(&prices);

        assert_eq!(daily[0].open, None);
        assert_eq!(daily[0].close, Some(6.0));
    }

    #[test]
    fn test_one_row_per_date_sorted() {
        let prices = vec![
            point(ymd(2024, 1, 3), Some(3.0), Some(3.0)),
            point(ymd(2024, 1, 1), Some(1.0), Some(1.0)),
            point(ymd(2024, 1, 3), Some(5.0), Some(5.0)),
            PricePoint {
                date: None,
                open: Some(9.0),
                close: Some(9.0),
            },
        ];

        let daily = daily_average(&prices);

        let dates: Vec<_> = daily.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 3)]);
        assert_eq!(daily[1].open, Some(4.0));
    }

    #[test]
    fn test_overflowing_mean_is_missing() {
        let day = ymd(2024, 1, 1);
        let prices = vec![
            point(day, Some(f64::MAX), Some(1.0)),
            point(day, Some(f64::MAX), Some(3.0)),
        ];

        let daily = daily_average(&prices);

        assert_eq!(daily[0].open, None);
        assert_eq!(daily[0].close, Some(2.0));
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(daily_average(&[]).is_empty());
    }
}
