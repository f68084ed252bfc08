//! Screening policy: ratio thresholds and industry exclusions.
//!
//! The policy is an immutable value handed to the [`Screener`](crate::Screener)
//! at construction. Defaults follow the common AAOIFI-style limits; a JSON
//! file can override any part of it.

use crate::error::{Result, ScreenError};
use mizan_data::edgar::Industry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum debt to total assets.
pub const MAX_DEBT_TO_ASSETS: f64 = 0.30;

/// Default maximum cash and short-term investments to total assets.
pub const MAX_CASH_TO_ASSETS: f64 = 0.30;

/// Default maximum share of revenue from impure sources.
pub const MAX_IMPURE_REVENUE: f64 = 0.05;

/// Ratio limits. A ratio equal to its limit passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    /// Maximum debt / assets (default: 0.30)
    pub max_debt_to_assets: f64,
    /// Maximum cash / assets (default: 0.30)
    pub max_cash_to_assets: f64,
    /// Maximum impure revenue / revenue (default: 0.05)
    pub max_impure_revenue: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_debt_to_assets: MAX_DEBT_TO_ASSETS,
            max_cash_to_assets: MAX_CASH_TO_ASSETS,
            max_impure_revenue: MAX_IMPURE_REVENUE,
        }
    }
}

/// A family of impermissible business lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionCategory {
    /// Category name reported in the verdict note
    pub name: String,
    /// Lowercase substrings searched for in the industry description
    pub keywords: Vec<String>,
}

impl ExclusionCategory {
    /// Build a category from static keyword lists.
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Keyword that excluded an industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionMatch<'a> {
    /// Matched category
    pub category: &'a str,
    /// Matched keyword
    pub keyword: &'a str,
}

/// Thresholds plus industry exclusion list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningPolicy {
    /// Ratio limits
    pub thresholds: Thresholds,
    /// Banned industries, checked in order
    pub exclusions: Vec<ExclusionCategory>,
}

impl Default for ScreeningPolicy {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            exclusions: default_exclusions(),
        }
    }
}

impl ScreeningPolicy {
    /// Parse a policy from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ScreenError::Policy(e.to_string()))
    }

    /// Load a policy from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// First banned keyword found in the industry description.
    ///
    /// Matching is a case-insensitive substring search; categories and
    /// keywords are tried in declaration order.
    pub fn exclusion_for(&self, industry: &Industry) -> Option<ExclusionMatch<'_>> {
        let description = industry.description.to_lowercase();
        if description.is_empty() {
            return None;
        }

        self.exclusions.iter().find_map(|category| {
            category
                .keywords
                .iter()
                .filter(|k| !k.is_empty())
                .find(|k| description.contains(&k.to_lowercase()))
                .map(|keyword| ExclusionMatch {
                    category: &category.name,
                    keyword,
                })
        })
    }
}

fn default_exclusions() -> Vec<ExclusionCategory> {
    vec![
        ExclusionCategory::new(
            "alcohol",
            &[
                "alcohol",
                "brewer",
                "brewery",
                "wine",
                "spirits",
                "distill",
                "liquor",
                "beer",
                "malt beverage",
            ],
        ),
        ExclusionCategory::new("gambling", &["gambling", "casino", "lottery"]),
        ExclusionCategory::new("pork", &["pork", "swine", "hog", "pig farm"]),
        ExclusionCategory::new("tobacco", &["tobacco", "cigarette"]),
        ExclusionCategory::new("cannabis", &["cannabis"]),
        ExclusionCategory::new("adult content", &["adult", "porn"]),
        ExclusionCategory::new(
            "conventional finance",
            &["bank", "banking", "mortgage", "insurance", "reinsurance"],
        ),
        ExclusionCategory::new("weapons", &["weapons", "firearms", "ordnance", "defense"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn industry(description: &str) -> Industry {
        Industry::new(None, description)
    }

    #[test]
    fn test_default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.max_debt_to_assets, 0.30);
        assert_eq!(t.max_cash_to_assets, 0.30);
        assert_eq!(t.max_impure_revenue, 0.05);
    }

    #[rstest]
    #[case("Brewers", "alcohol", "brewer")]
    #[case("Malt Beverages", "alcohol", "malt beverage")]
    #[case("Wines, Brandy & Brandy Spirits", "alcohol", "wine")]
    #[case("Hotels & Motels (casino)", "gambling", "casino")]
    #[case("Cigarettes", "tobacco", "cigarette")]
    #[case("Hog Farms & Feedlots", "pork", "hog")]
    #[case("Pig Farming", "pork", "pig farm")]
    #[case("National Commercial Banks", "conventional finance", "bank")]
    #[case("Fire, Marine & Casualty Insurance", "conventional finance", "insurance")]
    #[case("Ordnance & Accessories, (No Vehicles/Guided Missiles)", "weapons", "ordnance")]
    fn test_exclusions(#[case] description: &str, #[case] category: &str, #[case] keyword: &str) {
        let policy = ScreeningPolicy::default();
        let found = policy.exclusion_for(&industry(description));
        assert_eq!(found, Some(ExclusionMatch { category, keyword }));
    }

    #[rstest]
    #[case("Electronic Computers")]
    #[case("Services-Prepackaged Software")]
    #[case("Inorganic Pigments")]
    #[case("")]
    fn test_permissible_industries(#[case] description: &str) {
        assert!(ScreeningPolicy::default().exclusion_for(&industry(description)).is_none());
    }

    #[test]
    fn test_from_json_partial_override() {
        let policy = ScreeningPolicy::from_json(r#"{"thresholds": {"maxDebtToAssets": 0.33}}"#)
            .unwrap();
        assert_eq!(policy.thresholds.max_debt_to_assets, 0.33);
        assert_eq!(policy.thresholds.max_cash_to_assets, MAX_CASH_TO_ASSETS);
        assert_eq!(policy.exclusions, default_exclusions());
    }

    #[test]
    fn test_from_json_custom_exclusions() {
        let policy = ScreeningPolicy::from_json(
            r#"{"exclusions": [{"name": "crypto", "keywords": ["Crypto"]}]}"#,
        )
        .unwrap();
        let found = policy.exclusion_for(&industry("crypto asset mining"));
        assert_eq!(found.map(|m| m.category), Some("crypto"));
        assert!(policy.exclusion_for(&industry("Brewers")).is_none());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            ScreeningPolicy::from_json("{"),
            Err(ScreenError::Policy(_))
        ));
    }
}
