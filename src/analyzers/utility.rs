use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal value of `value` as written: the shortest text that reads back
/// as the same `f64`, so `0.75` is exactly `0.75`.
///
/// `None` for non-finite values and values outside the decimal range.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value.to_string().parse().ok()
}

/// Rounds to two fractional digits, halves away from zero.
pub fn round_decimal(value: Decimal) -> Option<f64> {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
///
/// Sums in decimal so a mean that is exactly on a half keeps it.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let exact = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(to_decimal(*v)?))
        .and_then(|sum| sum.checked_div(Decimal::from(values.len())))
        .and_then(|m| m.to_f64());
    exact.unwrap_or_else(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds to two fractional digits, halves away from zero.
///
/// The decision is made on the decimal value, so `2.175` rounds up even
/// though its nearest `f64` is slightly below it.
pub fn round2(value: f64) -> f64 {
    to_decimal(value)
        .and_then(round_decimal)
        // Outside the decimal range.
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

/// Renders a CGPA with two decimals, or `N/A` when there is nothing to average.
pub fn format_cgpa(cgpa: Option<f64>) -> String {
    match cgpa {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

/// Renders a credit count without a trailing `.0` for whole numbers.
pub fn format_credits(credits: f64) -> String {
    if credits.fract() == 0.0 {
        format!("{credits:.0}")
    } else {
        format!("{}", credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[3.0, 4.0]), 3.5);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.125), 1.13);
        assert_eq!(round2(-1.125), -1.13);
        assert_eq!(round2(3.6), 3.6);
        assert_eq!(round2(3.333333), 3.33);
    }

    #[test]
    fn test_round2_decides_on_decimal_value() {
        // 2.175 and 1.005 are stored just below the half.
        assert_eq!(round2(2.175), 2.18);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(0.015), 0.02);
        assert_eq!(round2(0.29999999999999982), 0.3);
    }

    #[test]
    fn test_round2_non_finite() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_mean_keeps_exact_half() {
        // (3.21 + 3.22) / 2 is exactly 3.215.
        assert_eq!(round2(mean(&[3.21, 3.22])), 3.22);
        assert_eq!(mean(&[1e300, 1e300]), 1e300);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(to_decimal(0.75), Some(Decimal::new(75, 2)));
        assert_eq!(to_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_format_cgpa() {
        assert_eq!(format_cgpa(Some(3.6)), "3.60");
        assert_eq!(format_cgpa(Some(4.0)), "4.00");
        assert_eq!(format_cgpa(None), "N/A");
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(3.0), "3");
        assert_eq!(format_credits(1.5), "1.5");
        assert_eq!(format_credits(1e20), "100000000000000000000");
    }
}
