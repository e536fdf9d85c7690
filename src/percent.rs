//! Percentage/fraction conversions shared by every marketplace calculator.
//!
//! All helpers are pure and guard against zero totals by returning 0.0
//! instead of dividing.

/// Returns how much `percent`% of `total` is.
pub fn percentage_of(percent: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (percent / 100.0) * total
}

/// Returns what percentage `value` represents of `total`, rounded to two
/// decimal places. A zero total yields 0.0.
pub fn percent_from_total(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    round2((value / total) * 100.0)
}

/// Converts a percentage (20.0) into a fraction (0.20).
pub fn as_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Converts a fraction (0.17) into a percentage (17.0) for display.
pub fn as_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Rounds a monetary value to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
