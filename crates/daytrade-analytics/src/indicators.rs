//! Moving averages derived from a price series

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use daytrade_data::PriceSeries;
use serde::{Deserialize, Serialize};
use ta::Next;
use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};

/// One row of the moving-averages overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    pub close: f64,
    /// Simple moving average; None until the window has filled
    pub sma: Option<f64>,
    /// Exponential moving average, seeded from the first close
    pub ema: f64,
}

/// Compute SMA and EMA columns over the closing prices.
///
/// The SMA is only reported once `window` observations have accumulated;
/// the EMA is emitted from the first bar onward.
pub fn moving_averages(series: &PriceSeries, window: usize) -> Result<Vec<MovingAveragePoint>> {
    let mut sma = SimpleMovingAverage::new(window)
        .map_err(|e| AnalyticsError::Indicator(e.to_string()))?;
    let mut ema = ExponentialMovingAverage::new(window)
        .map_err(|e| AnalyticsError::Indicator(e.to_string()))?;

    Ok(series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let sma_value = sma.next(bar.close);
            MovingAveragePoint {
                date: bar.date,
                close: bar.close,
                sma: (i + 1 >= window).then_some(sma_value),
                ema: ema.next(bar.close),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use daytrade_data::DailyBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 100,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_sma_none_until_window_fills() {
        let points = moving_averages(&series(&[1.0, 2.0, 3.0, 4.0]), 3).unwrap();
        assert_eq!(points[0].sma, None);
        assert_eq!(points[1].sma, None);
        assert_eq!(points[2].sma, Some(2.0));
        assert_eq!(points[3].sma, Some(3.0));
    }

    #[test]
    fn test_ema_present_from_first_bar() {
        let points = moving_averages(&series(&[10.0, 10.0, 10.0]), 2).unwrap();
        for p in &points {
            assert!((p.ema - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_one_point_per_bar() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let points = moving_averages(&s, 20).unwrap();
        assert_eq!(points.len(), s.len());
        assert!(points.iter().all(|p| p.sma.is_none()));
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(moving_averages(&series(&[1.0]), 0).is_err());
    }
}
