//! Error types for screening.

use mizan_data::DataError;
use thiserror::Error;

/// Result type for screening operations.
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors that can abort a screening.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// Registry, resolution or decoding failure
    #[error(transparent)]
    Data(#[from] DataError),

    /// Assets or revenue could not be extracted
    #[error("Insufficient SEC data for {ticker} (Assets or Revenue).")]
    InsufficientData {
        /// Ticker that was screened
        ticker: String,
        /// Extracted total assets
        assets: f64,
        /// Extracted revenue
        revenue: f64,
    },

    /// Screening policy could not be loaded
    #[error("Invalid screening policy: {0}")]
    Policy(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScreenError {
    /// True when the caller supplied bad input rather than the pipeline
    /// failing.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Data(DataError::InvalidTicker(_)))
    }
}
