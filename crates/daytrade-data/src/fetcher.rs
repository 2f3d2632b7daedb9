//! Market-data fetcher with provider fallback
//!
//! The fetcher holds an ordered list of provider strategies decided once
//! from the configuration: Alpha Vantage first when it is selected and a
//! key is present, always ending with Yahoo Finance. Each strategy is
//! tried in turn; a non-final strategy's failure is logged and the next
//! one takes over, while the final strategy's outcome (data or error) is
//! the fetch's outcome.

use crate::cache::{SeriesCache, SeriesKey};
use crate::config::{FetchConfig, ProviderKind};
use crate::error::{FetchError, Result};
use crate::period::Period;
use crate::providers::{AlphaVantageProvider, PriceProvider, YahooProvider};
use crate::series::PriceSeries;
use std::sync::Arc;

/// Fetches daily price history with provider fallback and caching
pub struct MarketDataFetcher {
    providers: Vec<Arc<dyn PriceProvider>>,
    cache: SeriesCache,
    config: FetchConfig,
}

impl std::fmt::Debug for MarketDataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataFetcher")
            .field("providers", &self.providers.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MarketDataFetcher {
    /// Build a fetcher from a configuration snapshot.
    ///
    /// Selecting Alpha Vantage without a key quietly degrades to the
    /// Yahoo-only chain instead of failing later with `MissingCredential`.
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;

        let yahoo: Arc<dyn PriceProvider> = Arc::new(YahooProvider::new(&config));

        let providers: Vec<Arc<dyn PriceProvider>> = match config.provider {
            ProviderKind::AlphaVantage if config.has_alpha_vantage_key() => {
                vec![Arc::new(AlphaVantageProvider::new(&config)?), yahoo]
            }
            ProviderKind::AlphaVantage => {
                tracing::info!("Alpha Vantage selected but not configured, using Yahoo Finance");
                vec![yahoo]
            }
            ProviderKind::Yahoo => vec![yahoo],
        };

        let cache = SeriesCache::new(config.cache_ttl);

        Ok(Self {
            providers,
            cache,
            config,
        })
    }

    /// Build a fetcher with an explicit provider chain.
    ///
    /// The chain must be non-empty; the final provider's outcome is what
    /// callers see, so there has to be one.
    pub fn with_providers(
        config: FetchConfig,
        providers: Vec<Arc<dyn PriceProvider>>,
    ) -> Result<Self> {
        config.validate()?;
        if providers.is_empty() {
            return Err(FetchError::Config(
                "provider chain must not be empty".to_string(),
            ));
        }

        let cache = SeriesCache::new(config.cache_ttl);
        Ok(Self {
            providers,
            cache,
            config,
        })
    }

    /// Fetch daily history for `ticker` over `period`.
    ///
    /// The ticker is uppercased before use. Results are served from the
    /// read-through cache when a fresh entry exists for the same
    /// (ticker, period, provider) key.
    pub async fn fetch(&self, ticker: &str, period: Period) -> Result<PriceSeries> {
        let symbol = ticker.trim().to_uppercase();
        let key = SeriesKey::new(&symbol, period, self.config.provider);

        self.cache
            .get_or_fetch(key, || self.fetch_uncached(symbol.clone(), period))
            .await
    }

    async fn fetch_uncached(&self, symbol: String, period: Period) -> Result<PriceSeries> {
        let last = self.providers.len() - 1;
        let mut outcome = None;

        for (index, provider) in self.providers.iter().enumerate() {
            match provider.daily_history(&symbol, period).await {
                Ok(series) => {
                    tracing::debug!(
                        %symbol,
                        %period,
                        provider = %provider.kind(),
                        rows = series.len(),
                        "Fetched daily history"
                    );
                    return Ok(series);
                }
                Err(err) if index < last => {
                    // Fall back to the next provider. Expected causes stay
                    // quiet; anything else is worth a warning.
                    if err.is_expected_fallback() {
                        tracing::info!(
                            provider = %provider.kind(),
                            %err,
                            "Provider unavailable, falling back"
                        );
                    } else {
                        tracing::warn!(
                            provider = %provider.kind(),
                            %err,
                            "Provider failed, falling back"
                        );
                    }
                }
                Err(err) => outcome = Some(err),
            }
        }

        // the final provider's error is the fetch's error
        Err(outcome.expect("provider chain is never empty"))
    }

    /// Access the read-through cache (e.g. to clear it between sessions)
    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Provider kinds in the order they will be tried
    pub fn provider_chain(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }
}
