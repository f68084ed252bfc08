//! Filer profile from the SEC submissions API.

use super::client::{Pacer, RegistryClient, Transport};
use super::facts::EDGAR_DATA_URL;
use super::identifiers::Cik;
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Subset of `submissions/CIK##########.json` used for screening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Company name
    #[serde(default)]
    pub name: Option<String>,
    /// Standard Industrial Classification code
    #[serde(default, deserialize_with = "string_or_number")]
    pub sic: Option<String>,
    /// SIC description (e.g., "Electronic Computers")
    #[serde(default)]
    pub sic_description: Option<String>,
}

impl CompanyProfile {
    /// Industry classification of the filer.
    pub fn industry(&self) -> Industry {
        Industry {
            code: self.sic.clone().filter(|c| !c.trim().is_empty()),
            description: self.sic_description.clone().unwrap_or_default(),
        }
    }
}

/// SIC code and free-text description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    /// SIC code, when reported
    pub code: Option<String>,
    /// SIC description, empty when not reported
    pub description: String,
}

impl Industry {
    /// Builds an industry from its parts.
    pub fn new(code: Option<&str>, description: &str) -> Self {
        Self {
            code: code.map(str::to_string),
            description: description.to_string(),
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} {}", code, self.description),
            None => f.write_str(&self.description),
        }
    }
}

/// Submissions document URL.
pub fn submissions_url(cik: Cik) -> String {
    format!("{}/submissions/CIK{}.json", EDGAR_DATA_URL, cik.padded())
}

impl<T: Transport, P: Pacer> RegistryClient<T, P> {
    /// Fetches the filer profile (name and industry classification).
    pub async fn company_profile(&self, cik: Cik) -> Result<CompanyProfile> {
        self.fetch_json(&submissions_url(cik)).await
    }
}

// SIC arrives as a string, but accept a bare number too.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submissions() {
        let json = r#"{
            "cik": "320193",
            "entityType": "operating",
            "sic": "3571",
            "sicDescription": "Electronic Computers",
            "name": "Apple Inc.",
            "tickers": ["AAPL"],
            "filings": {"recent": {"accessionNumber": []}}
        }"#;

        let profile: CompanyProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
        let industry = profile.industry();
        assert_eq!(industry.code.as_deref(), Some("3571"));
        assert_eq!(industry.to_string(), "3571 Electronic Computers");
    }

    #[test]
    fn test_missing_classification() {
        let profile: CompanyProfile = serde_json::from_str(r#"{"sic": "", "name": "X"}"#).unwrap();
        let industry = profile.industry();
        assert_eq!(industry.code, None);
        assert_eq!(industry.description, "");
        assert_eq!(industry.to_string(), "");
    }

    #[test]
    fn test_numeric_sic() {
        let profile: CompanyProfile =
            serde_json::from_str(r#"{"sic": 2082, "sicDescription": "Malt Beverages"}"#).unwrap();
        assert_eq!(profile.industry().to_string(), "2082 Malt Beverages");
    }

    #[test]
    fn test_submissions_url() {
        assert_eq!(
            submissions_url(Cik::new(14693)),
            "https://data.sec.gov/submissions/CIK0000014693.json"
        );
    }
}
