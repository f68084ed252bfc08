//! Response payloads for the check endpoint and CLI.

use crate::classifier::Status;
use crate::error::ScreenError;
use crate::pipeline::Screening;
use mizan_data::edgar::Cik;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// `Cache-Control` value sent with successful checks.
pub const CACHE_CONTROL: &str = "public, max-age=900";

/// Body of a successful check.
///
/// Ratio fields are omitted when the filer was excluded by industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// Normalized ticker
    pub ticker: String,
    /// Filer identifier, as a number
    pub cik: Cik,
    /// Compliance status
    pub status: Status,
    /// Debt / assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_to_assets: Option<f64>,
    /// Cash / assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_to_assets: Option<f64>,
    /// Impure revenue share
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impure_revenue: Option<f64>,
    /// Explanation
    pub note: String,
}

impl From<&Screening> for CheckResponse {
    fn from(screening: &Screening) -> Self {
        let ratios = screening.verdict.ratios;
        Self {
            ticker: screening.ticker.to_string(),
            cik: screening.cik,
            status: screening.verdict.status,
            debt_to_assets: ratios.map(|r| r.debt_to_assets),
            cash_to_assets: ratios.map(|r| r.cash_to_assets),
            impure_revenue: ratios.map(|r| r.impure_revenue),
            note: screening.verdict.note.clone(),
        }
    }
}

/// Body of a failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Wraps a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<&ScreenError> for ErrorResponse {
    fn from(error: &ScreenError) -> Self {
        Self::new(error.to_string())
    }
}

/// Plain-text report of a screening, including the extracted figures.
pub fn text_report(screening: &Screening) -> String {
    let mut out = String::new();
    let verdict = &screening.verdict;

    // Writing to a String cannot fail
    let _ = writeln!(out, "Ticker:    {}", screening.ticker);
    let _ = writeln!(out, "CIK:       {}", screening.cik.padded());
    if let Some(name) = &screening.company_name {
        let _ = writeln!(out, "Company:   {name}");
    }
    if !screening.industry.description.is_empty() {
        let _ = writeln!(out, "Industry:  {}", screening.industry);
    }

    if let Some(s) = &screening.snapshot {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<18}{:>20}", "Assets", money(s.assets));
        let _ = writeln!(out, "{:<18}{:>20}", "Debt", money(s.debt));
        let _ = writeln!(out, "{:<18}{:>20}", "Cash + ST inv.", money(s.cash));
        let _ = writeln!(out, "{:<18}{:>20}", "Revenue", money(s.revenue));
        let _ = writeln!(out, "{:<18}{:>20}", "Interest income", money(s.interest_income));
    }

    if let Some(r) = &verdict.ratios {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<18}{:>19.2}%", "Debt / Assets", r.debt_to_assets * 100.0);
        let _ = writeln!(out, "{:<18}{:>19.2}%", "Cash / Assets", r.cash_to_assets * 100.0);
        let _ = writeln!(out, "{:<18}{:>19.2}%", "Impure revenue", r.impure_revenue * 100.0);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Status:    {}", verdict.status);
    if !verdict.note.is_empty() {
        let _ = writeln!(out, "Note:      {}", verdict.note);
    }
    out
}

fn money(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
