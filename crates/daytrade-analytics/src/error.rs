//! Error types for analytics operations

use thiserror::Error;

/// Analytics-specific errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Indicator calculation failed (e.g. zero-length window)
    #[error("Indicator error: {0}")]
    Indicator(String),
}

/// Result type alias for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
