//! Alpha Vantage provider (secondary path)
//!
//! Uses the free-tier `TIME_SERIES_DAILY` endpoint with `outputsize=compact`,
//! which returns only the ~100 most recent trading days. This is a hard
//! ceiling of the service's free tier: periods asking for more history than
//! that silently yield fewer observations than requested.

use crate::config::{FetchConfig, ProviderKind};
use crate::error::{FetchError, Result};
use crate::period::Period;
use crate::series::{DailyBar, PriceSeries};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use super::PriceProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";

// The provider labels fields "1. open" .. "5. volume"; these map to the
// canonical open/high/low/close/volume names.
const LABEL_OPEN: &str = "1. open";
const LABEL_HIGH: &str = "2. high";
const LABEL_LOW: &str = "3. low";
const LABEL_CLOSE: &str = "4. close";
const LABEL_VOLUME: &str = "5. volume";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage daily-history provider
pub struct AlphaVantageProvider {
    client: Client,
    api_key: Option<String>,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageProvider {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let quota = Quota::per_minute(
            NonZeroU32::new(config.alpha_vantage_rate_limit)
                .unwrap_or(NonZeroU32::new(5).expect("5 is non-zero")),
        );

        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            api_key: config
                .alpha_vantage_api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AlphaVantage
    }

    async fn daily_history(&self, symbol: &str, period: Period) -> Result<PriceSeries> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(FetchError::MissingCredential);
        };

        // Free tier allows a handful of calls per minute
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("function", "TIME_SERIES_DAILY");
        params.insert("symbol", symbol);
        params.insert("outputsize", "compact");
        params.insert("apikey", api_key);

        tracing::debug!(symbol, %period, "Requesting Alpha Vantage daily series");

        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Provider(format!(
                "Alpha Vantage HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;

        let cutoff = (Utc::now() - Duration::days(period.approx_days())).date_naive();
        parse_daily(symbol, &data, cutoff)
    }
}

/// Translate the provider's embedded error markers into typed failures.
///
/// The API reports problems inside an HTTP 200 body: an "Error Message"
/// for invalid calls, a "Note" when the call frequency limit is hit, and
/// an "Information" blurb (the thank-you message) when the daily quota is
/// spent or the key is invalid.
fn check_error_markers(data: &Value) -> Result<()> {
    if let Some(msg) = data.get("Error Message").and_then(Value::as_str) {
        if msg.contains("API call frequency") {
            return Err(FetchError::RateLimited {
                provider: ProviderKind::AlphaVantage.to_string(),
            });
        }
        if msg.contains("Thank you for using Alpha Vantage") {
            return Err(FetchError::Provider(
                "Alpha Vantage call limit exceeded or invalid API key".to_string(),
            ));
        }
        return Err(FetchError::Provider(format!("Alpha Vantage: {msg}")));
    }

    if data.get("Note").is_some() {
        return Err(FetchError::RateLimited {
            provider: ProviderKind::AlphaVantage.to_string(),
        });
    }

    if data.get("Information").is_some() {
        return Err(FetchError::Provider(
            "Alpha Vantage call limit exceeded or invalid API key".to_string(),
        ));
    }

    Ok(())
}

/// Locate the date-keyed series object in the response.
///
/// Exact key first, then a case-insensitive fallback on any member whose
/// name mentions a time series, mirroring how loosely the API names its
/// payload sections across endpoints.
fn locate_series(data: &Value) -> Result<&serde_json::Map<String, Value>> {
    if let Some(series) = data.get("Time Series (Daily)").and_then(Value::as_object) {
        return Ok(series);
    }

    let obj = data
        .as_object()
        .ok_or_else(|| FetchError::Parse("Alpha Vantage response is not an object".to_string()))?;

    obj.iter()
        .find(|(key, value)| {
            let key = key.to_ascii_lowercase();
            (key.contains("time series") || key.contains("date")) && value.is_object()
        })
        .and_then(|(_, value)| value.as_object())
        .ok_or_else(|| {
            FetchError::Parse(format!(
                "No time series found in Alpha Vantage response; members: {:?}",
                obj.keys().collect::<Vec<_>>()
            ))
        })
}

fn num_field(values: &Value, label: &str) -> Option<f64> {
    values.get(label)?.as_str()?.parse().ok()
}

/// Parse and normalize a daily-series response.
///
/// Rows are filtered to `date >= cutoff`, the numbered field labels are
/// mapped to canonical open/high/low/close/volume, and the result is
/// returned sorted ascending by date.
fn parse_daily(symbol: &str, data: &Value, cutoff: NaiveDate) -> Result<PriceSeries> {
    check_error_markers(data)?;

    let series = locate_series(data)?;

    let mut bars = Vec::new();
    let mut rows_in_window = 0usize;
    let mut saw_price = false;
    let mut sample_labels: Vec<String> = Vec::new();

    for (date_str, values) in series {
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| FetchError::Parse(format!("Unparseable date {date_str}: {e}")))?;

        if date < cutoff {
            continue;
        }
        rows_in_window += 1;

        if sample_labels.is_empty() {
            if let Some(obj) = values.as_object() {
                sample_labels = obj.keys().cloned().collect();
            }
        }

        let open = num_field(values, LABEL_OPEN);
        let high = num_field(values, LABEL_HIGH);
        let low = num_field(values, LABEL_LOW);
        let close = num_field(values, LABEL_CLOSE);
        let volume = values
            .get(LABEL_VOLUME)
            .and_then(Value::as_str)
            .and_then(|v| v.parse::<u64>().ok());

        // A row needs at least one recognized price field
        let Some(anchor) = close.or(open).or(high).or(low) else {
            continue;
        };
        saw_price = true;

        bars.push(DailyBar {
            date,
            open: open.unwrap_or(anchor),
            high: high.unwrap_or(anchor),
            low: low.unwrap_or(anchor),
            close: anchor,
            volume: volume.unwrap_or(0),
        });
    }

    if rows_in_window == 0 {
        return Err(FetchError::NotFound {
            symbol: symbol.to_string(),
        });
    }

    if !saw_price {
        return Err(FetchError::Parse(format!(
            "No recognized price fields in Alpha Vantage rows; found: {sample_labels:?}"
        )));
    }

    PriceSeries::new(symbol, bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn daily_row(open: f64, high: f64, low: f64, close: f64, volume: u64) -> Value {
        json!({
            "1. open": open.to_string(),
            "2. high": high.to_string(),
            "3. low": low.to_string(),
            "4. close": close.to_string(),
            "5. volume": volume.to_string(),
        })
    }

    #[test]
    fn test_column_mapping_round_trip() {
        let data = json!({
            "Meta Data": { "2. Symbol": "AAPL" },
            "Time Series (Daily)": {
                "2025-03-03": daily_row(101.0, 103.5, 100.25, 102.75, 5_000_000u64),
            }
        });

        let series = parse_daily("AAPL", &data, cutoff()).unwrap();
        assert_eq!(series.len(), 1);

        let bar = &series.bars()[0];
        assert_eq!(bar.date.to_string(), "2025-03-03");
        assert_eq!(bar.open, 101.0);
        assert_eq!(bar.high, 103.5);
        assert_eq!(bar.low, 100.25);
        assert_eq!(bar.close, 102.75);
        assert_eq!(bar.volume, 5_000_000);
    }

    #[test]
    fn test_rows_sorted_ascending() {
        let data = json!({
            "Time Series (Daily)": {
                "2025-03-05": daily_row(1.0, 1.0, 1.0, 1.0, 1),
                "2025-03-03": daily_row(2.0, 2.0, 2.0, 2.0, 2),
                "2025-03-04": daily_row(3.0, 3.0, 3.0, 3.0, 3),
            }
        });

        let series = parse_daily("AAPL", &data, cutoff()).unwrap();
        let dates: Vec<String> = series.bars().iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-03-03", "2025-03-04", "2025-03-05"]);
    }

    #[test]
    fn test_invalid_call_marker() {
        let data = json!({
            "Error Message": "Invalid API call. Please retry or visit the documentation."
        });

        match parse_daily("AAPL", &data, cutoff()) {
            Err(FetchError::Provider(msg)) => assert!(msg.contains("Invalid API call")),
            other => panic!("Expected Provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_frequency_limit_marker() {
        let data = json!({
            "Error Message": "Our standard API call frequency is 5 calls per minute."
        });

        assert!(matches!(
            parse_daily("AAPL", &data, cutoff()),
            Err(FetchError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_note_marker_is_rate_limit() {
        let data = json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."
        });

        assert!(matches!(
            parse_daily("AAPL", &data, cutoff()),
            Err(FetchError::RateLimited { .. })
        ));
    }

    #[test]
    fn test_information_marker_is_expected_fallback() {
        let data = json!({
            "Information": "Thank you for using Alpha Vantage! Please subscribe to a premium plan."
        });

        let err = parse_daily("AAPL", &data, cutoff()).unwrap_err();
        assert!(err.is_expected_fallback());
    }

    #[test]
    fn test_missing_series_is_parse_error() {
        let data = json!({ "Meta Data": { "2. Symbol": "AAPL" } });

        assert!(matches!(
            parse_daily("AAPL", &data, cutoff()),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_series_located_by_loose_key_match() {
        let data = json!({
            "Daily Time Series": {
                "2025-03-03": daily_row(1.0, 2.0, 0.5, 1.5, 100u64),
            }
        });

        let series = parse_daily("AAPL", &data, cutoff()).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_cutoff_filters_old_rows() {
        let data = json!({
            "Time Series (Daily)": {
                "2024-06-01": daily_row(1.0, 1.0, 1.0, 1.0, 1),
                "2025-03-03": daily_row(2.0, 2.0, 2.0, 2.0, 2),
            }
        });

        let series = parse_daily("AAPL", &data, cutoff()).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first_date().to_string(), "2025-03-03");
    }

    #[test]
    fn test_all_rows_outside_window_is_not_found() {
        let data = json!({
            "Time Series (Daily)": {
                "2024-06-01": daily_row(1.0, 1.0, 1.0, 1.0, 1),
            }
        });

        assert!(matches!(
            parse_daily("AAPL", &data, cutoff()),
            Err(FetchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unrecognized_fields_is_parse_error() {
        let data = json!({
            "Time Series (Daily)": {
                "2025-03-03": { "preco": "10.0", "quantidade": "5" },
            }
        });

        match parse_daily("AAPL", &data, cutoff()) {
            Err(FetchError::Parse(msg)) => assert!(msg.contains("preco")),
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_price_fields_fall_back_to_close() {
        let data = json!({
            "Time Series (Daily)": {
                "2025-03-03": { "4. close": "50.0", "5. volume": "123" },
            }
        });

        let series = parse_daily("AAPL", &data, cutoff()).unwrap();
        let bar = &series.bars()[0];
        assert_eq!(bar.close, 50.0);
        assert_eq!(bar.open, 50.0);
        assert_eq!(bar.volume, 123);
    }

    #[test]
    fn test_missing_credential() {
        let config = FetchConfig::default();
        let provider = AlphaVantageProvider::new(&config).unwrap();
        let err = tokio_test::block_on(provider.daily_history("AAPL", Period::SixMonths))
            .unwrap_err();
        assert!(matches!(err, FetchError::MissingCredential));
    }

    #[tokio::test]
    #[ignore] // Requires API key and network access
    async fn test_daily_history_live() {
        let config = FetchConfig::from_env();
        let provider = AlphaVantageProvider::new(&config).unwrap();
        let series = provider.daily_history("AAPL", Period::OneMonth).await.unwrap();
        assert!(!series.is_empty());
    }
}
