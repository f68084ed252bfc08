//! Compliance classification.
//!
//! Two stages feed a [`ScreeningVerdict`]:
//!
//! - the industry pre-check ([`screen_industry`]), which rejects a filer
//!   whose SIC description names a banned business line, and
//! - the financial screen ([`classify`]), which compares three ratios of a
//!   [`FinancialSnapshot`] against the policy [`Thresholds`].
//!
//! # Decision order
//!
//! A breach of the debt or cash limit is `Haram` regardless of revenue
//! purity. Otherwise the impure revenue share decides: zero is `Halal`,
//! anything up to the limit `Needs Purification`, above it `Haram`.
//! Every limit is inclusive.

use crate::policy::{ExclusionMatch, ScreeningPolicy, Thresholds};
use crate::snapshot::FinancialSnapshot;
use mizan_data::edgar::Industry;
use mizan_data::numeric::safe_divide;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Permissible
    Halal,
    /// Permissible once the impure share of gains is given away
    #[serde(rename = "Needs Purification")]
    NeedsPurification,
    /// Impermissible
    Haram,
}

impl Status {
    /// Display label, as used on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Halal => "Halal",
            Self::NeedsPurification => "Needs Purification",
            Self::Haram => "Haram",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screening ratios of one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    /// Debt / assets
    pub debt_to_assets: f64,
    /// Cash and short-term investments / assets
    pub cash_to_assets: f64,
    /// Interest income / revenue, clamped to [0, 1]
    pub impure_revenue: f64,
}

impl Ratios {
    /// Computes the ratios, treating undefined divisions as zero.
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        Self {
            debt_to_assets: safe_divide(snapshot.debt, snapshot.assets),
            cash_to_assets: safe_divide(snapshot.cash, snapshot.assets),
            impure_revenue: safe_divide(snapshot.interest_income, snapshot.revenue).clamp(0.0, 1.0),
        }
    }
}

/// Outcome of screening one filer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningVerdict {
    /// Compliance status
    pub status: Status,
    /// Ratios, absent when the filer was excluded by industry
    pub ratios: Option<Ratios>,
    /// Human-readable explanation, empty for a clean pass
    pub note: String,
}

impl ScreeningVerdict {
    /// True when the verdict came from the industry pre-check.
    pub const fn is_exclusion(&self) -> bool {
        self.ratios.is_none()
    }
}

/// Industry pre-check. `Some` means the filer is excluded outright.
pub fn screen_industry(policy: &ScreeningPolicy, industry: &Industry) -> Option<ScreeningVerdict> {
    policy
        .exclusion_for(industry)
        .map(|found| exclusion_verdict(&found, industry))
}

/// Verdict for an industry exclusion.
pub fn exclusion_verdict(found: &ExclusionMatch<'_>, industry: &Industry) -> ScreeningVerdict {
    ScreeningVerdict {
        status: Status::Haram,
        ratios: None,
        note: format!(
            "Excluded by SIC ({}: {}): {}",
            found.category, found.keyword, industry
        ),
    }
}

/// Applies the ratio thresholds to a snapshot.
pub fn classify(snapshot: &FinancialSnapshot, thresholds: &Thresholds) -> ScreeningVerdict {
    let ratios = Ratios::from_snapshot(snapshot);

    let debt_ok = within(ratios.debt_to_assets, thresholds.max_debt_to_assets);
    let cash_ok = within(ratios.cash_to_assets, thresholds.max_cash_to_assets);
    let impure = ratios.impure_revenue;

    let (status, note) = if !debt_ok || !cash_ok {
        let mut reasons = Vec::with_capacity(3);
        if !debt_ok {
            reasons.push(format!(
                "Debt/Assets > {}",
                whole_percent(thresholds.max_debt_to_assets)
            ));
        }
        if !cash_ok {
            reasons.push(format!(
                "Cash/Assets > {}",
                whole_percent(thresholds.max_cash_to_assets)
            ));
        }
        // Reported alongside, the status is already decided
        if impure > thresholds.max_impure_revenue {
            reasons.push(format!(
                "Impure Rev {} > {}",
                percent(impure),
                whole_percent(thresholds.max_impure_revenue)
            ));
        }
        (Status::Haram, reasons.join(" | "))
    } else if impure == 0.0 {
        (Status::Halal, String::new())
    } else if impure <= thresholds.max_impure_revenue {
        (
            Status::NeedsPurification,
            format!("Purification = {} of gains.", percent(impure)),
        )
    } else {
        (
            Status::Haram,
            format!(
                "Impure revenue {} > {}.",
                percent(impure),
                whole_percent(thresholds.max_impure_revenue)
            ),
        )
    };

    ScreeningVerdict {
        status,
        ratios: Some(ratios),
        note,
    }
}

fn within(ratio: f64, limit: f64) -> bool {
    ratio.is_finite() && ratio <= limit
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

fn whole_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn snapshot(
        assets: f64,
        debt: f64,
        cash: f64,
        revenue: f64,
        interest: f64,
    ) -> FinancialSnapshot {
        FinancialSnapshot::new(assets, debt, cash, revenue, interest)
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::NeedsPurification).unwrap(),
            r#""Needs Purification""#
        );
        assert_eq!(Status::Haram.to_string(), "Haram");
    }

    #[test]
    fn test_clean_pass() {
        let verdict = classify(
            &snapshot(1000.0, 200.0, 100.0, 500.0, 0.0),
            &Thresholds::default(),
        );
        let ratios = verdict.ratios.unwrap();
        assert_relative_eq!(ratios.debt_to_assets, 0.2);
        assert_relative_eq!(ratios.cash_to_assets, 0.1);
        assert_eq!(ratios.impure_revenue, 0.0);
        assert_eq!(verdict.status, Status::Halal);
        assert_eq!(verdict.note, "");
    }

    #[test]
    fn test_needs_purification() {
        let verdict = classify(
            &snapshot(1000.0, 200.0, 100.0, 500.0, 10.0),
            &Thresholds::default(),
        );
        assert_relative_eq!(verdict.ratios.unwrap().impure_revenue, 0.02);
        assert_eq!(verdict.status, Status::NeedsPurification);
        assert_eq!(verdict.note, "Purification = 2.00% of gains.");
    }

    #[test]
    fn test_impure_revenue_over_limit() {
        let verdict = classify(
            &snapshot(1000.0, 200.0, 100.0, 500.0, 30.0),
            &Thresholds::default(),
        );
        assert_eq!(verdict.status, Status::Haram);
        assert_eq!(verdict.note, "Impure revenue 6.00% > 5%.");
    }

    #[test]
    fn test_debt_breach() {
        let verdict = classify(
            &snapshot(1000.0, 400.0, 100.0, 500.0, 0.0),
            &Thresholds::default(),
        );
        assert_eq!(verdict.status, Status::Haram);
        assert_eq!(verdict.note, "Debt/Assets > 30%");
    }

    #[test]
    fn test_all_breaches_joined() {
        let verdict = classify(
            &snapshot(1000.0, 400.0, 500.0, 500.0, 50.0),
            &Thresholds::default(),
        );
        assert_eq!(verdict.status, Status::Haram);
        assert_eq!(
            verdict.note,
            "Debt/Assets > 30% | Cash/Assets > 30% | Impure Rev 10.00% > 5%"
        );
    }

    #[test]
    fn test_impure_within_limit_not_listed_on_breach() {
        let verdict = classify(
            &snapshot(1000.0, 100.0, 400.0, 500.0, 10.0),
            &Thresholds::default(),
        );
        assert_eq!(verdict.status, Status::Haram);
        assert_eq!(verdict.note, "Cash/Assets > 30%");
    }

    #[rstest]
    #[case(300.0, Status::Halal)]
    #[case(300.0001, Status::Haram)]
    fn test_debt_limit_is_inclusive(#[case] debt: f64, #[case] expected: Status) {
        let verdict = classify(
            &snapshot(1000.0, debt, 0.0, 500.0, 0.0),
            &Thresholds::default(),
        );
        assert_eq!(verdict.status, expected);
    }

    #[test]
    fn test_impure_limit_is_inclusive() {
        let verdict = classify(
            &snapshot(1000.0, 0.0, 0.0, 100.0, 5.0),
            &Thresholds::default(),
        );
        assert_eq!(verdict.status, Status::NeedsPurification);
        assert_eq!(verdict.note, "Purification = 5.00% of gains.");
    }

    #[test]
    fn test_impure_revenue_is_clamped() {
        let ratios = Ratios::from_snapshot(&snapshot(1000.0, 0.0, 0.0, 10.0, 50.0));
        assert_eq!(ratios.impure_revenue, 1.0);
    }

    #[test]
    fn test_custom_thresholds_in_note() {
        let thresholds = Thresholds {
            max_debt_to_assets: 0.33,
            ..Thresholds::default()
        };
        let verdict = classify(&snapshot(1000.0, 320.0, 0.0, 500.0, 0.0), &thresholds);
        assert_eq!(verdict.status, Status::Halal);

        let verdict = classify(&snapshot(1000.0, 340.0, 0.0, 500.0, 0.0), &thresholds);
        assert_eq!(verdict.note, "Debt/Assets > 33%");
    }

    #[test]
    fn test_industry_exclusion() {
        let industry = Industry::new(Some("2082"), "Malt Beverages");
        let verdict = screen_industry(&ScreeningPolicy::default(), &industry).unwrap();
        assert_eq!(verdict.status, Status::Haram);
        assert!(verdict.is_exclusion());
        assert_eq!(
            verdict.note,
            "Excluded by SIC (alcohol: malt beverage): 2082 Malt Beverages"
        );

        let software = Industry::new(Some("7372"), "Services-Prepackaged Software");
        assert!(screen_industry(&ScreeningPolicy::default(), &software).is_none());
    }
}
