//! Project-specific utilities live here.

/// Round a currency amount to two decimal places, halves away from zero.
///
/// Negative zero is folded into zero so it never reaches a response body.
pub fn round_to_cents(amount: f64) -> f64 {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Case-insensitive equality using Unicode lower-casing.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// Case-insensitive substring test using Unicode lower-casing.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
