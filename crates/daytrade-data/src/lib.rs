//! Market-data fetching for the day-trade analytics dashboard
//!
//! Given a ticker symbol and a lookback period, returns a normalized
//! table of daily price/volume observations. Two sources are supported:
//!
//! - Yahoo Finance (default, rate limited, retried with linear backoff)
//! - Alpha Vantage (keyed, free-tier compact window of ~100 trading days)
//!
//! The fetcher selects the configured provider, falls back from Alpha
//! Vantage to Yahoo on failure, and caches fully-formed results for five
//! minutes keyed by (ticker, period, provider).
//!
//! # Example
//!
//! ```rust,ignore
//! use daytrade_data::{FetchConfig, MarketDataFetcher, Period};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = MarketDataFetcher::new(FetchConfig::from_env())?;
//!     let series = fetcher.fetch("MSFT", Period::SixMonths).await?;
//!     println!("{} rows for {}", series.len(), series.symbol);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod period;
pub mod providers;
pub mod series;

// Re-export main types for convenience
pub use cache::{SeriesCache, SeriesKey};
pub use config::{FetchConfig, ProviderKind, SecretStore};
pub use error::{FetchError, Result};
pub use fetcher::MarketDataFetcher;
pub use period::Period;
pub use series::{DailyBar, PriceSeries};
