//! The one place this crate divides user data. Missing values never reach
//! these helpers; callers unwrap their Options first and decide what absence
//! means for them.

/// Percentage of `numerator` against `denominator`, with a zero denominator
/// substituted by 1 (so 0 available vehicles and N allocated reads as
/// N * 100, never a division error). Both arguments are counts.
pub fn pct_of(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator.max(1.0) * 100.0
}

/// None when the denominator is zero. Comparisons against the result are
/// then simply false, so impossible rows drop out of filters.
pub fn checked_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_substitutes_one() {
        assert_eq!(pct_of(3.0, 0.0), 300.0);
        assert_eq!(pct_of(4.0, 2.0), 200.0);
    }

    #[test]
    fn checked_div_refuses_zero() {
        assert_eq!(checked_div(50.0, 0.0), None);
        assert_eq!(checked_div(50.0, 2.0), Some(25.0));
        // Negative denominators are odd data, not impossible data
        assert_eq!(checked_div(50.0, -2.0), Some(-25.0));
    }
}
