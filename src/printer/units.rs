//! # Unit Conversion
//!
//! Label layouts are authored in millimetres; the canvas and the printer
//! work in dots. Every conversion in the crate goes through [`to_pixels`]
//! so that elements sharing an edge in millimetres also share it in dots.
//!
//! ## Calculations
//!
//! ```text
//! pixels = round(mm × 0.0393701 × dpi)
//!
//! For a 100mm label at 300 DPI:
//!   100 × 0.0393701 × 300 = 1181.103 → 1181 dots
//! ```

/// Inches per millimetre.
pub const MM_TO_INCHES: f64 = 0.0393701;

/// Convert a millimetre measurement to dots at the given resolution.
///
/// ## Example
///
/// ```
/// use labelpress::printer::units::to_pixels;
///
/// assert_eq!(to_pixels(100.0, 300), 1181);
/// assert_eq!(to_pixels(25.4, 203), 203);
/// ```
#[inline]
pub fn to_pixels(value_mm: f64, dpi: u32) -> i64 {
    (value_mm * MM_TO_INCHES * dpi as f64).round() as i64
}

/// Convert a millimetre size to a dot count, clamping negatives to zero.
#[inline]
pub(crate) fn to_dots(value_mm: f64, dpi: u32) -> u32 {
    to_pixels(value_mm, dpi).clamp(0, u32::MAX as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixels_formula() {
        for &(mm, dpi) in &[(0.0, 300), (1.0, 203), (29.0, 300), (67.0, 300), (3.3, 600)] {
            let expected = (mm * 0.0393701 * dpi as f64).round() as i64;
            assert_eq!(to_pixels(mm, dpi), expected);
        }
    }

    #[test]
    fn test_label_dimensions() {
        assert_eq!(to_pixels(100.0, 300), 1181);
        assert_eq!(to_pixels(29.0, 300), 343);
        assert_eq!(to_pixels(67.0, 300), 791);
    }

    #[test]
    fn test_monotonic_in_mm() {
        for dpi in [1, 96, 203, 300, 600] {
            let mut last = to_pixels(0.0, dpi);
            for step in 1..2000 {
                let px = to_pixels(step as f64 * 0.05, dpi);
                assert!(px >= last, "dpi {} step {}", dpi, step);
                last = px;
            }
        }
    }

    #[test]
    fn test_to_dots_clamps_negative() {
        assert_eq!(to_dots(-5.0, 300), 0);
        assert_eq!(to_dots(10.0, 300), 118);
    }
}
