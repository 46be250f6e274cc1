//! Rate formatting.

/// Render a rate the way the reference files and artifacts spell it.
///
/// Whole numbers keep one decimal place (`5.0`), everything else uses the
/// shortest representation that round-trips (`6.25`).
///
/// ```
/// use ratecard_core::format_rate;
///
/// assert_eq!(format_rate(5.0), "5.0");
/// assert_eq!(format_rate(6.25), "6.25");
/// assert_eq!(format_rate(0.0), "0.0");
/// ```
#[must_use]
pub fn format_rate(rate: f64) -> String {
    if rate.is_finite() && rate.fract() == 0.0 && rate.abs() < 1e16 {
        format!("{rate:.1}")
    } else {
        format!("{rate}")
    }
}
