//! Human-readable distance labels.

/// Metres in a kilometre.
const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Render a distance with one decimal place, in metres below one kilometre
/// and in kilometres otherwise.
///
/// Ties round up, so 1250 m reads as `1.3 km`.
///
/// # Examples
///
/// ```
/// use earthwalker_core::format_distance;
///
/// assert_eq!(format_distance(999.94), "999.9 m");
/// assert_eq!(format_distance(1234.0), "1.2 km");
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion divides by a constant"
)]
pub fn format_distance(metres: f64) -> String {
    if metres < METRES_PER_KILOMETRE {
        format!("{:.1} m", round_tenths(metres))
    } else {
        format!("{:.1} km", round_tenths(metres / METRES_PER_KILOMETRE))
    }
}

#[expect(clippy::float_arithmetic, reason = "rounds to one decimal place")]
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
