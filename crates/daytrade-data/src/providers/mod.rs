//! Market-data providers
//!
//! Each provider is a named strategy from (ticker, period) to a price
//! series or a typed error. The fetcher tries providers in a fixed order
//! decided once per request; see [`crate::fetcher::MarketDataFetcher`].

mod alpha_vantage;
mod yahoo;

pub use alpha_vantage::AlphaVantageProvider;
pub use yahoo::YahooProvider;

use crate::config::ProviderKind;
use crate::error::{FetchError, Result};
use crate::period::Period;
use crate::series::PriceSeries;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// A single market-data source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Which provider this is, for cache keys and log lines
    fn kind(&self) -> ProviderKind;

    /// Daily OHLCV history for `symbol` over `period`
    async fn daily_history(&self, symbol: &str, period: Period) -> Result<PriceSeries>;
}

/// Run `op` until it succeeds or rate-limit retries are exhausted.
///
/// `op` receives the 1-based attempt number. Only `RateLimited` failures
/// are retried; attempt n waits `base_delay * n` before the next try, so
/// delays grow linearly. After `max_retries` attempts the last
/// `RateLimited` error is returned; any other error returns immediately.
pub(crate) async fn retry_rate_limited<T, F, Fut>(
    max_retries: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Err(FetchError::RateLimited { provider }) if attempt < max_retries => {
                let wait = base_delay * attempt;
                tracing::warn!(
                    %provider,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Rate limited, backing off before retry"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
