//! Derived series and chart view models for the dashboard
//!
//! Takes a normalized [`daytrade_data::PriceSeries`] and produces the
//! moving-average columns and the serializable point lists behind the
//! four chart views (price line, candlestick, moving averages, volume).

pub mod chart;
pub mod error;
pub mod indicators;

pub use chart::{CandlestickChart, ChartSet, MovingAverageChart, PriceLineChart, VolumeChart};
pub use error::{AnalyticsError, Result};
pub use indicators::{MovingAveragePoint, moving_averages};
