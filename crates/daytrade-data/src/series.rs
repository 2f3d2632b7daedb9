//! Normalized daily price series

use crate::error::{FetchError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily price/volume observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered sequence of daily observations for one ticker.
///
/// Bars are sorted ascending by date with unique dates. A series is never
/// empty: providers report an empty result as an error instead of handing
/// back an empty table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// Build a series from raw bars, enforcing the ordering invariant.
    ///
    /// Bars are sorted ascending by date; when a date appears more than once
    /// the last observation wins. An empty input is a `NotFound` error.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<DailyBar>) -> Result<Self> {
        let symbol = symbol.into();

        if bars.is_empty() {
            return Err(FetchError::NotFound { symbol });
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by(|next, prev| {
            if next.date == prev.date {
                // keep the later observation
                *prev = next.clone();
                true
            } else {
                false
            }
        });

        Ok(Self { symbol, bars })
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Most recent observation
    pub fn latest(&self) -> &DailyBar {
        // invariant: a series is never empty
        &self.bars[self.bars.len() - 1]
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.latest().date
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> DailyBar {
        DailyBar {
            date: date.parse().unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn test_empty_series_is_not_found() {
        let err = PriceSeries::new("MSFT", vec![]).unwrap_err();
        match err {
            FetchError::NotFound { symbol } => assert_eq!(symbol, "MSFT"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_bars_sorted_ascending() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                bar("2025-03-03", 12.0),
                bar("2025-03-01", 10.0),
                bar("2025-03-02", 11.0),
            ],
        )
        .unwrap();

        let dates: Vec<_> = series.bars().iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(series.first_date().to_string(), "2025-03-01");
        assert_eq!(series.last_date().to_string(), "2025-03-03");
    }

    #[test]
    fn test_duplicate_dates_keep_last() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2025-03-01", 10.0), bar("2025-03-01", 99.0)],
        )
        .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.latest().close, 99.0);
    }

    #[test]
    fn test_closes_in_order() {
        let series = PriceSeries::new(
            "AAPL",
            vec![bar("2025-03-02", 11.0), bar("2025-03-01", 10.0)],
        )
        .unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }
}
