//! XBRL company facts and most-authoritative value selection.
//!
//! The SEC provides every fact a filer has tagged at:
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik_padded}.json`
//!
//! Only the `us-gaap` taxonomy and the `USD` unit are retained. For each
//! concept, annual (10-K) figures are preferred over quarterly (10-Q) ones,
//! and the most recent period wins.

use super::client::{Pacer, RegistryClient, Transport};
use super::identifiers::Cik;
use crate::error::Result;
use crate::numeric::parse_finite;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// SEC data API base URL
pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";

/// Form family of a disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    /// Annual (10-K) filing
    Annual,
    /// Quarterly (10-Q) filing
    Quarterly,
}

impl FilingType {
    /// Convert form type to filing type; amendments and other forms map to
    /// `None`.
    pub fn from_form(form: &str) -> Option<Self> {
        if form.eq_ignore_ascii_case("10-K") {
            Some(Self::Annual)
        } else if form.eq_ignore_ascii_case("10-Q") {
            Some(Self::Quarterly)
        } else {
            None
        }
    }
}

/// One reported value for one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureRecord {
    /// Reported value, when it is a finite number
    pub value: Option<f64>,
    /// Raw form type (e.g., "10-K", "10-Q", "8-K")
    pub form: Option<String>,
    /// End date of the reporting period
    pub period_end: Option<NaiveDate>,
    /// Fiscal year
    pub fiscal_year: Option<i32>,
    /// Fiscal period (e.g., "FY", "Q1")
    pub fiscal_period: Option<String>,
}

impl DisclosureRecord {
    /// Record with only the fields the selection rule looks at.
    pub fn new(value: f64, form: &str, period_end: NaiveDate) -> Self {
        Self {
            value: Some(value).filter(|v| v.is_finite()),
            form: Some(form.to_string()),
            period_end: Some(period_end),
            fiscal_year: None,
            fiscal_period: None,
        }
    }

    /// Filing family derived from the form.
    pub fn filing_type(&self) -> Option<FilingType> {
        self.form.as_deref().and_then(FilingType::from_form)
    }
}

/// `us-gaap` facts of one filer, in USD.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "CompanyFactsResponse")]
pub struct CompanyFacts {
    /// Company name
    pub entity_name: Option<String>,
    concepts: HashMap<String, Vec<DisclosureRecord>>,
}

impl CompanyFacts {
    /// Creates an empty fact set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the SEC company facts JSON.
    pub fn parse_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds records for a concept, replacing any existing ones.
    pub fn insert(&mut self, concept: impl Into<String>, records: Vec<DisclosureRecord>) {
        self.concepts.insert(concept.into(), records);
    }

    /// Records reported under a concept.
    pub fn records(&self, concept: &str) -> &[DisclosureRecord] {
        self.concepts
            .get(concept)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All concept names, sorted.
    pub fn concepts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.concepts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The most authoritative record for a concept.
    ///
    /// Annual records are used when any exist, quarterly ones otherwise;
    /// other forms are never considered. Among the chosen family the latest
    /// period end wins, with undated records sorting oldest and ties going
    /// to the earlier record.
    pub fn latest(&self, concept: &str) -> Option<&DisclosureRecord> {
        let records = self.records(concept);
        let of_type = |wanted: FilingType| {
            records
                .iter()
                .filter(|r| r.filing_type() == Some(wanted))
                .collect::<Vec<_>>()
        };

        let annual = of_type(FilingType::Annual);
        let mut pool = if annual.is_empty() {
            of_type(FilingType::Quarterly)
        } else {
            annual
        };

        pool.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        pool.first().copied()
    }

    /// Value of the first alias whose latest record carries a finite
    /// number, or `0.0` when none does.
    ///
    /// A zero result means "unknown"; callers decide whether that is fatal.
    pub fn pick(&self, aliases: &[&str]) -> f64 {
        aliases
            .iter()
            .find_map(|alias| self.latest(alias).and_then(|r| r.value))
            .unwrap_or(0.0)
    }
}

/// Company facts document URL.
pub fn company_facts_url(cik: Cik) -> String {
    format!(
        "{}/api/xbrl/companyfacts/CIK{}.json",
        EDGAR_DATA_URL,
        cik.padded()
    )
}

impl<T: Transport, P: Pacer> RegistryClient<T, P> {
    /// Fetches all `us-gaap` USD facts for a filer.
    pub async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        self.fetch_json(&company_facts_url(cik)).await
    }
}

// SEC API JSON structure
// Based on: https://www.sec.gov/edgar/sec-api-documentation

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyFactsResponse {
    #[serde(default)]
    entity_name: Option<String>,
    #[serde(default)]
    facts: Taxonomies,
}

#[derive(Debug, Default, Deserialize)]
struct Taxonomies {
    #[serde(rename = "us-gaap", default)]
    us_gaap: HashMap<String, ConceptData>,
}

#[derive(Debug, Deserialize)]
struct ConceptData {
    #[serde(default)]
    units: Option<HashMap<String, Vec<FactData>>>,
}

#[derive(Debug, Deserialize)]
struct FactData {
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    val: Value,
    #[serde(default)]
    fy: Option<i32>, // Fiscal year
    #[serde(default)]
    fp: Option<String>, // Fiscal period
    #[serde(default)]
    form: Option<String>, // Form type (10-K, 10-Q, etc.)
}

impl From<FactData> for DisclosureRecord {
    fn from(raw: FactData) -> Self {
        Self {
            value: parse_finite(&raw.val),
            form: raw.form,
            period_end: raw
                .end
                .as_deref()
                .and_then(|end| NaiveDate::parse_from_str(end, "%Y-%m-%d").ok()),
            fiscal_year: raw.fy,
            fiscal_period: raw.fp,
        }
    }
}

impl From<CompanyFactsResponse> for CompanyFacts {
    fn from(raw: CompanyFactsResponse) -> Self {
        let concepts = raw
            .facts
            .us_gaap
            .into_iter()
            .filter_map(|(name, data)| {
                let mut units = data.units?;
                let usd = units.remove("USD").or_else(|| units.remove("usd"))?;
                Some((name, usd.into_iter().map(DisclosureRecord::from).collect()))
            })
            .collect();

        Self {
            entity_name: raw.entity_name,
            concepts,
        }
    }
}

/// Common US-GAAP concept names used for screening.
pub mod concepts {
    /// Total Assets
    pub const ASSETS: &str = "Assets";

    /// Total Debt
    pub const DEBT: &str = "Debt";

    /// Interest-bearing liabilities
    pub const INTEREST_BEARING_LIABILITIES: &str = "InterestBearingLiabilities";

    /// Total Liabilities
    pub const LIABILITIES: &str = "Liabilities";

    /// Cash and Cash Equivalents
    pub const CASH: &str = "CashAndCashEquivalentsAtCarryingValue";

    /// Short-term investments
    pub const SHORT_TERM_INVESTMENTS: &str = "ShortTermInvestments";

    /// Total Revenue
    pub const REVENUES: &str = "Revenues";

    /// Legacy revenue tag
    pub const SALES_REVENUE_NET: &str = "SalesRevenueNet";

    /// Revenue from Contract with Customer
    pub const REVENUE_FROM_CONTRACT: &str = "RevenueFromContractWithCustomerExcludingAssessedTax";

    /// Interest income tags, any of which may be reported alongside the others.
    pub const INTEREST_INCOME: [&str; 5] = [
        "InterestIncome",
        "InterestAndDividendIncomeOperating",
        "InterestAndDividendIncome",
        "InterestIncomeNonoperating",
        "InvestmentIncomeInterest",
    ];
}
