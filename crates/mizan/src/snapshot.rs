//! The five figures screening looks at.

use crate::error::{Result, ScreenError};
use mizan_data::edgar::{CompanyFacts, concepts};
use mizan_data::numeric::{first_positive, sum, sum_of_positives, to_finite_or_zero};
use serde::{Deserialize, Serialize};

/// Latest assets, debt, cash, revenue and interest income of one filer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    /// Total assets
    pub assets: f64,
    /// Debt, falling back to interest-bearing liabilities then total liabilities
    pub debt: f64,
    /// Cash and equivalents plus short-term investments
    pub cash: f64,
    /// Revenue under the first tag that reports a positive figure
    pub revenue: f64,
    /// Positive interest income across all interest tags
    pub interest_income: f64,
}

impl FinancialSnapshot {
    /// Builds a snapshot from raw figures, zeroing non-finite ones.
    pub const fn new(
        assets: f64,
        debt: f64,
        cash: f64,
        revenue: f64,
        interest_income: f64,
    ) -> Self {
        Self {
            assets: to_finite_or_zero(assets),
            debt: to_finite_or_zero(debt),
            cash: to_finite_or_zero(cash),
            revenue: to_finite_or_zero(revenue),
            interest_income: to_finite_or_zero(interest_income),
        }
    }

    /// Extracts the snapshot from company facts.
    pub fn from_facts(facts: &CompanyFacts) -> Self {
        let pick = |tag: &str| facts.pick(&[tag]);

        let assets = pick(concepts::ASSETS);
        let debt = first_positive(&[
            pick(concepts::DEBT),
            pick(concepts::INTEREST_BEARING_LIABILITIES),
            pick(concepts::LIABILITIES),
        ]);
        let cash = sum(&[pick(concepts::CASH), pick(concepts::SHORT_TERM_INVESTMENTS)]);
        let revenue = first_positive(&[
            pick(concepts::REVENUES),
            pick(concepts::SALES_REVENUE_NET),
            pick(concepts::REVENUE_FROM_CONTRACT),
        ]);
        let interest: Vec<f64> = concepts::INTEREST_INCOME.iter().map(|t| pick(t)).collect();
        let interest_income = sum_of_positives(&interest);

        Self::new(assets, debt, cash, revenue, interest_income)
    }

    /// Ensures assets and revenue are both known and positive.
    ///
    /// # Errors
    /// Returns [`ScreenError::InsufficientData`] otherwise.
    pub fn validate(&self, ticker: &str) -> Result<()> {
        if self.assets > 0.0 && self.revenue > 0.0 {
            Ok(())
        } else {
            Err(ScreenError::InsufficientData {
                ticker: ticker.to_string(),
                assets: self.assets,
                revenue: self.revenue,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mizan_data::edgar::DisclosureRecord;

    fn annual(value: f64) -> Vec<DisclosureRecord> {
        vec![DisclosureRecord::new(
            value,
            "10-K",
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )]
    }

    #[test]
    fn test_from_facts_combines_tags() {
        let mut facts = CompanyFacts::new();
        facts.insert("Assets", annual(1000.0));
        facts.insert("Debt", annual(0.0));
        facts.insert("Liabilities", annual(450.0));
        facts.insert("CashAndCashEquivalentsAtCarryingValue", annual(60.0));
        facts.insert("ShortTermInvestments", annual(40.0));
        facts.insert("SalesRevenueNet", annual(500.0));
        facts.insert("InterestIncome", annual(4.0));
        facts.insert("InterestIncomeNonoperating", annual(-3.0));
        facts.insert("InvestmentIncomeInterest", annual(1.0));

        let snapshot = FinancialSnapshot::from_facts(&facts);
        assert_eq!(snapshot, FinancialSnapshot::new(1000.0, 450.0, 100.0, 500.0, 5.0));
    }

    #[test]
    fn test_empty_facts_are_zero() {
        let snapshot = FinancialSnapshot::from_facts(&CompanyFacts::new());
        assert_eq!(snapshot, FinancialSnapshot::default());
    }

    #[test]
    fn test_validate() {
        assert!(FinancialSnapshot::new(1.0, 0.0, 0.0, 1.0, 0.0).validate("X").is_ok());

        for bad in [
            FinancialSnapshot::new(0.0, 0.0, 0.0, 1.0, 0.0),
            FinancialSnapshot::new(1.0, 0.0, 0.0, 0.0, 0.0),
            FinancialSnapshot::new(-5.0, 0.0, 0.0, 1.0, 0.0),
            FinancialSnapshot::new(f64::NAN, 0.0, 0.0, 1.0, 0.0),
        ] {
            assert!(matches!(
                bad.validate("X"),
                Err(ScreenError::InsufficientData { .. })
            ));
        }
    }

    #[test]
    fn test_new_zeroes_non_finite() {
        let snapshot = FinancialSnapshot::new(f64::INFINITY, f64::NAN, 1.0, 2.0, 3.0);
        assert_eq!(snapshot.assets, 0.0);
        assert_eq!(snapshot.debt, 0.0);
        assert_eq!(snapshot.cash, 1.0);
    }
}
