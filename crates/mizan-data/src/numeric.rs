//! Numeric coercion and aggregation over extracted facts.
//!
//! Every number that enters from a registry document passes through
//! [`to_finite_or_zero`] or [`parse_finite`]; the combinators below are
//! what the screening layer composes on top of
//! [`CompanyFacts::pick`](crate::edgar::CompanyFacts::pick).

use serde_json::Value;

/// Coerces a float to itself when finite, otherwise zero.
pub const fn to_finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Reads a finite number out of a JSON value.
///
/// Numbers and numeric strings are accepted. Anything else, including
/// `NaN`-producing strings, yields `None`.
pub fn parse_finite(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Returns the first strictly positive finite value, or zero.
///
/// Used when one quantity may be reported under mutually exclusive tags.
pub fn first_positive(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .find(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

/// Sums the finite entries, ignoring the rest.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().copied().map(to_finite_or_zero).sum()
}

/// Sums the finite, strictly positive entries.
///
/// A negative component must not offset positive ones when measuring
/// exposure.
pub fn sum_of_positives(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .sum()
}

/// Divides `a` by `b`, or returns zero when `b` is zero or either side is
/// not finite.
pub fn safe_divide(a: f64, b: f64) -> f64 {
    if a.is_finite() && b.is_finite() && b != 0.0 {
        a / b
    } else {
        0.0
    }
}
