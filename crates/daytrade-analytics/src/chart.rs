//! Serializable view models for the dashboard's four chart views
//!
//! Rendering is the UI layer's job; these types only shape a price series
//! into the point lists each chart consumes.

use crate::error::Result;
use crate::indicators::{MovingAveragePoint, moving_averages};
use chrono::NaiveDate;
use daytrade_data::PriceSeries;
use serde::{Deserialize, Serialize};

/// Default moving-average window for the overlay chart
pub const DEFAULT_MA_WINDOW: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Close-price line chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLineChart {
    pub title: String,
    pub points: Vec<LinePoint>,
}

impl PriceLineChart {
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            title: format!("{} Stock Prices", series.symbol),
            points: series
                .bars()
                .iter()
                .map(|b| LinePoint {
                    date: b.date,
                    value: b.close,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandlePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Candlestick chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandlestickChart {
    pub title: String,
    pub candles: Vec<CandlePoint>,
}

impl CandlestickChart {
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            title: format!("{} Candlestick Chart", series.symbol),
            candles: series
                .bars()
                .iter()
                .map(|b| CandlePoint {
                    date: b.date,
                    open: b.open,
                    high: b.high,
                    low: b.low,
                    close: b.close,
                })
                .collect(),
        }
    }
}

/// Moving-averages overlay (close, SMA, EMA)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingAverageChart {
    pub title: String,
    pub window: usize,
    pub points: Vec<MovingAveragePoint>,
}

impl MovingAverageChart {
    pub fn from_series(series: &PriceSeries, window: usize) -> Result<Self> {
        Ok(Self {
            title: format!("{} Moving Averages", series.symbol),
            window,
            points: moving_averages(series, window)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub volume: u64,
}

/// Trading-volume bar chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeChart {
    pub title: String,
    pub bars: Vec<VolumePoint>,
}

impl VolumeChart {
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            title: format!("{} Trading Volume", series.symbol),
            bars: series
                .bars()
                .iter()
                .map(|b| VolumePoint {
                    date: b.date,
                    volume: b.volume,
                })
                .collect(),
        }
    }
}

/// All four dashboard charts for one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSet {
    pub price_line: PriceLineChart,
    pub candlestick: CandlestickChart,
    pub moving_averages: MovingAverageChart,
    pub volume: VolumeChart,
}

impl ChartSet {
    pub fn from_series(series: &PriceSeries) -> Result<Self> {
        Ok(Self {
            price_line: PriceLineChart::from_series(series),
            candlestick: CandlestickChart::from_series(series),
            moving_averages: MovingAverageChart::from_series(series, DEFAULT_MA_WINDOW)?,
            volume: VolumeChart::from_series(series),
        })
    }
}
