//! Configuration for the market-data fetcher
//!
//! Settings are resolved lazily, once per request: the process environment
//! is consulted first, then an optional [`SecretStore`] (e.g. a deployment
//! secrets file). The result is an explicit snapshot passed down to the
//! fetcher rather than a global lookup.

use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable selecting the data provider
pub const DATA_PROVIDER_VAR: &str = "DATA_PROVIDER";
/// Environment variable holding the Alpha Vantage API key
pub const ALPHA_VANTAGE_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";

/// Data provider for price history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Yahoo Finance (default, no API key required)
    #[default]
    #[serde(rename = "yfinance")]
    Yahoo,
    /// Alpha Vantage (requires API key, free-tier compact window)
    AlphaVantage,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yfinance",
            Self::AlphaVantage => "alpha_vantage",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yfinance" | "yahoo" => Ok(Self::Yahoo),
            "alpha_vantage" | "alphavantage" => Ok(Self::AlphaVantage),
            other => Err(FetchError::Config(format!("Unknown data provider: {other}"))),
        }
    }
}

/// Read-only lookup for secrets supplied outside the process environment
pub trait SecretStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl SecretStore for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        Self::get(self, key).cloned()
    }
}

/// Resolve a setting: environment first, then the secret store.
/// Empty values count as absent in both places.
fn resolve_setting(key: &str, secrets: Option<&dyn SecretStore>) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            secrets
                .and_then(|s| s.get(key))
                .filter(|v| !v.trim().is_empty())
        })
}

/// Configuration snapshot for one fetch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Selected data provider
    pub provider: ProviderKind,

    /// Alpha Vantage API key; absence forces the Yahoo path
    pub alpha_vantage_api_key: Option<String>,

    /// Maximum number of attempts against the rate-limited Yahoo path
    pub max_retries: u32,

    /// Base delay between retries; attempt n waits `retry_delay * n`
    pub retry_delay: Duration,

    /// TTL for the read-through result cache
    pub cache_ttl: Duration,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Alpha Vantage requests per minute (free tier allows 5)
    pub alpha_vantage_rate_limit: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            alpha_vantage_api_key: None,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300), // 5 minutes
            request_timeout: Duration::from_secs(30),
            alpha_vantage_rate_limit: 5,
        }
    }
}

impl FetchConfig {
    /// Create a new configuration builder
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }

    /// Resolve configuration from the process environment only
    pub fn from_env() -> Self {
        Self::resolve(None)
    }

    /// Resolve configuration from the environment, then `secrets`.
    ///
    /// An unrecognized `DATA_PROVIDER` value logs a warning and falls back
    /// to the default rather than failing the whole request.
    pub fn resolve(secrets: Option<&dyn SecretStore>) -> Self {
        let provider = resolve_setting(DATA_PROVIDER_VAR, secrets)
            .map(|raw| match raw.parse::<ProviderKind>() {
                Ok(kind) => kind,
                Err(_) => {
                    tracing::warn!(value = %raw, "Unknown DATA_PROVIDER value, using yfinance");
                    ProviderKind::Yahoo
                }
            })
            .unwrap_or_default();

        let alpha_vantage_api_key = resolve_setting(ALPHA_VANTAGE_KEY_VAR, secrets);

        Self {
            provider,
            alpha_vantage_api_key,
            ..Self::default()
        }
    }

    /// Whether a usable Alpha Vantage credential is present
    pub fn has_alpha_vantage_key(&self) -> bool {
        self.alpha_vantage_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(FetchError::Config(
                "max_retries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay before retry attempt `attempt` (1-based), growing linearly
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

/// Builder for FetchConfig
#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    provider: Option<ProviderKind>,
    alpha_vantage_api_key: Option<String>,
    max_retries: Option<u32>,
    retry_delay: Option<Duration>,
    cache_ttl: Option<Duration>,
    request_timeout: Option<Duration>,
    alpha_vantage_rate_limit: Option<u32>,
}

impl FetchConfigBuilder {
    /// Set the data provider
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set maximum retries for the Yahoo path
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the base retry delay
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Set the result cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the HTTP request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the Alpha Vantage per-minute quota
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FetchConfig> {
        let defaults = FetchConfig::default();

        let config = FetchConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_delay: self.retry_delay.unwrap_or(defaults.retry_delay),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.provider, ProviderKind::Yahoo);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FetchConfig::builder()
            .provider(ProviderKind::AlphaVantage)
            .alpha_vantage_api_key("demo")
            .max_retries(5)
            .retry_delay(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(config.provider, ProviderKind::AlphaVantage);
        assert_eq!(config.max_retries, 5);
        assert!(config.has_alpha_vantage_key());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let result = FetchConfig::builder().max_retries(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("yfinance".parse::<ProviderKind>().unwrap(), ProviderKind::Yahoo);
        assert_eq!(
            "alpha_vantage".parse::<ProviderKind>().unwrap(),
            ProviderKind::AlphaVantage
        );
        assert_eq!(
            "ALPHA_VANTAGE".parse::<ProviderKind>().unwrap(),
            ProviderKind::AlphaVantage
        );
        assert!("bloomberg".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_linear_retry_backoff() {
        let config = FetchConfig {
            retry_delay: Duration::from_secs(5),
            ..Default::default()
        };
        assert_eq!(config.retry_backoff(1), Duration::from_secs(5));
        assert_eq!(config.retry_backoff(2), Duration::from_secs(10));
        assert_eq!(config.retry_backoff(3), Duration::from_secs(15));
    }

    #[test]
    fn test_blank_key_counts_as_absent() {
        let config = FetchConfig {
            alpha_vantage_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.has_alpha_vantage_key());
    }

    #[test]
    fn test_secret_store_fallback() {
        let mut secrets = HashMap::new();
        secrets.insert(ALPHA_VANTAGE_KEY_VAR.to_string(), "from-secrets".to_string());

        // Not present in the environment for this key name, so the store wins
        let value = resolve_setting(ALPHA_VANTAGE_KEY_VAR, Some(&secrets));
        if std::env::var(ALPHA_VANTAGE_KEY_VAR).is_err() {
            assert_eq!(value.as_deref(), Some("from-secrets"));
        }
    }
}
