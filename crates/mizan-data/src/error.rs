//! Error types for registry operations.

use thiserror::Error;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while talking to the filings registry.
#[derive(Debug, Error)]
pub enum DataError {
    /// The request targeted a host outside the allow-list
    #[error("Host not allowed: {0}")]
    DisallowedHost(String),

    /// Every attempt failed (network error or non-2xx status)
    #[error("Upstream unavailable after {attempts} attempt(s): {reason}")]
    UpstreamUnavailable {
        /// Number of attempts made
        attempts: u32,
        /// Failure message of the last attempt
        reason: String,
    },

    /// No resolution strategy produced a filer identifier
    #[error("Ticker not found via SEC maps: {ticker}")]
    TickerNotFound {
        /// Ticker that was queried
        ticker: String,
        /// Failure of the last strategy, when it failed rather than missed
        #[source]
        source: Option<Box<DataError>>,
    },

    /// Ticker was empty after trimming
    #[error("{0}")]
    InvalidTicker(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
