//! Ticker symbols and SEC filer identifiers.

use crate::error::{DataError, Result};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A trimmed, uppercase ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw user input.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidTicker`] when nothing is left after
    /// trimming.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DataError::InvalidTicker("Missing ticker".to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// The normalized symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a symbol from a registry map.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.eq_ignore_ascii_case(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Central Index Key: the SEC's numeric identifier for a filer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Cik(u64);

impl Cik {
    /// Wrap a raw identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw identifier.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Zero-padded 10-digit form used in document URLs.
    ///
    /// # Example
    /// ```
    /// # use mizan_data::edgar::Cik;
    /// assert_eq!(Cik::new(320193).padded(), "0000320193");
    /// ```
    pub fn padded(self) -> String {
        format!("{:010}", self.0)
    }
}

impl FromStr for Cik {
    type Err = DataError;

    /// Parses a decimal identifier, tolerating leading zeros.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('0');
        if digits.is_empty() {
            return if s.trim().is_empty() {
                Err(DataError::Parse("Empty CIK".to_string()))
            } else {
                Ok(Self(0))
            };
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DataError::Parse(format!("Invalid CIK {:?}: {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalization() {
        let ticker = Ticker::parse("  brk.b ").unwrap();
        assert_eq!(ticker.as_str(), "BRK.B");
        assert!(ticker.matches("brk.B"));
        assert!(!ticker.matches("BRK"));
    }

    #[test]
    fn test_ticker_empty() {
        assert!(matches!(Ticker::parse("   "), Err(DataError::InvalidTicker(_))));
        assert!(matches!("".parse::<Ticker>(), Err(DataError::InvalidTicker(_))));
    }

    #[test]
    fn test_cik_padding() {
        assert_eq!(Cik::new(320193).padded(), "0000320193");
        assert_eq!(Cik::new(0).padded(), "0000000000");
        assert_eq!(Cik::new(320193).to_string(), "320193");
    }

    #[test]
    fn test_cik_from_str() {
        assert_eq!("0000320193".parse::<Cik>().unwrap(), Cik::new(320193));
        assert_eq!("789019".parse::<Cik>().unwrap(), Cik::new(789019));
        assert_eq!("0000".parse::<Cik>().unwrap(), Cik::new(0));
        assert!("".parse::<Cik>().is_err());
        assert!("12a".parse::<Cik>().is_err());
    }

    #[test]
    fn test_cik_serializes_as_number() {
        let json = serde_json::to_string(&Cik::new(320193)).unwrap();
        assert_eq!(json, "320193");
    }
}
