//! Error types for market-data operations

use thiserror::Error;

/// Market-data fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// No data available for the requested ticker/period
    #[error("No data found for ticker {symbol}")]
    NotFound {
        symbol: String,
    },

    /// Rate limit exceeded and retries exhausted
    #[error("Rate limit exceeded for {provider}")]
    RateLimited {
        provider: String,
    },

    /// Secondary provider selected without an API key
    #[error("Alpha Vantage API key not configured")]
    MissingCredential,

    /// Provider response shape was not recognized
    #[error("Could not parse provider response: {0}")]
    Parse(String),

    /// Any other provider-reported failure, message preserved verbatim
    #[error("{0}")]
    Provider(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// Whether this failure is an expected fallback cause.
    ///
    /// Expected causes (missing or invalid credential, call limit exceeded,
    /// throttling) are logged quietly when the fetcher falls back to the
    /// next provider; anything else is surfaced as a warning.
    pub fn is_expected_fallback(&self) -> bool {
        match self {
            Self::MissingCredential | Self::RateLimited { .. } => true,
            Self::Provider(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("limit") || msg.contains("invalid")
            }
            _ => false,
        }
    }
}

/// Result type alias for market-data operations
pub type Result<T> = std::result::Result<T, FetchError>;
