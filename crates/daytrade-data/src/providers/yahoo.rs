//! Yahoo Finance provider (primary path)
//!
//! Public source without credentials, but aggressively rate limited; the
//! provider retries throttled requests with a linearly growing delay.

use crate::config::{FetchConfig, ProviderKind};
use crate::error::{FetchError, Result};
use crate::period::Period;
use crate::series::{DailyBar, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use super::{PriceProvider, retry_rate_limited};

/// Yahoo Finance daily-history provider
pub struct YahooProvider {
    max_retries: u32,
    retry_delay: Duration,
}

impl YahooProvider {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay,
        }
    }

    /// Map a Yahoo client error to a typed failure.
    ///
    /// The client reports throttling as a failed fetch with an HTTP 429 in
    /// the message, so rate limiting is detected from the error text.
    fn classify(err: &yahoo::YahooError) -> FetchError {
        let msg = err.to_string();
        let lower = msg.to_ascii_lowercase();
        if lower.contains("429") || lower.contains("too many requests") {
            FetchError::RateLimited {
                provider: ProviderKind::Yahoo.to_string(),
            }
        } else {
            FetchError::Provider(msg)
        }
    }

    /// One request for daily history, no retries
    async fn request_history(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        let connector = yahoo::YahooConnector::new().map_err(|e| Self::classify(&e))?;

        let end = Utc::now();
        let start = period.window_start(end);

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| FetchError::Provider(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| FetchError::Provider(format!("Invalid end timestamp: {e}")))?;

        let response = connector
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| Self::classify(&e))?;

        let quotes = response.quotes().map_err(|e| Self::classify(&e))?;

        let bars: Vec<DailyBar> = quotes
            .iter()
            .map(|q| DailyBar {
                date: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now)
                    .date_naive(),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect();

        // PriceSeries::new reports an empty result as NotFound
        PriceSeries::new(symbol, bars)
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Yahoo
    }

    async fn daily_history(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        retry_rate_limited(self.max_retries, self.retry_delay, |attempt| {
            tracing::debug!(symbol, %period, attempt, "Requesting Yahoo daily history");
            self.request_history(symbol, period)
        })
        .await
    }
}
