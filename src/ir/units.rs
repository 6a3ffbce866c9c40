//! Unit-conversion constants.
//!
//! Every decoder converts device-native coordinates to canonical
//! millimeters exactly once, at the point a coordinate is first produced,
//! using the scalars below. The constants are written as their defining
//! ratios rather than rounded decimals so that pages decoded today stay
//! numerically comparable with previously captured data.

/// Tolerance for millimeter comparisons throughout the crate.
pub const EPSILON: f64 = 1e-3;

/// Decimal places used when formatting coordinates for export.
pub const WRITE_DECIMAL_PRECISION: u32 = 3;

/// Typographic dots per inch.
pub const DOTS_PER_INCH: f64 = 72.0;

/// One typographic dot, in inches.
pub const DOT_TO_INCH: f64 = 1.0 / DOTS_PER_INCH;

/// Millimeters per inch.
pub const INCH_TO_MM: f64 = 25.4;

/// Rendered pixels to Ncode grid dots.
pub const PIXEL_TO_DOT: f64 = 600.0 / 72.0 / 56.0;

/// Anoto pattern coordinates to millimeters.
pub const ANOTO_TO_MM: f64 = 1.0 / 3.3 / 8.0;

/// Ncode glyph coordinates to millimeters.
///
/// One Ncode glyph cell spans 56 dots of a 600 dpi grid.
pub const NCODE_TO_MM: f64 = 56.0 / 600.0 * INCH_TO_MM;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ncode_cell_is_about_two_point_four_mm() {
        assert!((NCODE_TO_MM - 2.3706666666666667).abs() < 1e-12);
    }

    #[test]
    fn anoto_factor_matches_defining_ratio() {
        assert!((ANOTO_TO_MM - 0.03787878787878788).abs() < 1e-15);
    }

    #[test]
    fn dot_and_inch_factors_are_consistent() {
        assert!((DOT_TO_INCH * DOTS_PER_INCH - 1.0).abs() < f64::EPSILON);
        assert!((PIXEL_TO_DOT - 600.0 / 72.0 / 56.0).abs() < f64::EPSILON);
    }
}
