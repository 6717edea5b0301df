//! # TSPL Printer Commands
//!
//! Builders for the TSPL commands understood by TSC-family thermal label
//! printers (TE210, TE310, TTP-244, ...).
//!
//! ## Command Format
//!
//! TSPL commands are plain ASCII lines:
//!
//! ```text
//! KEYWORD p1, p2, ...\r\n
//! ```
//!
//! The builders here return the line **without** its terminator; the
//! device channel appends `\r\n` when writing.
//!
//! ## Numbers
//!
//! Millimetre values are written with Rust's shortest `Display` form
//! (`100`, `3.048`, `0`), followed by the ` mm` unit suffix where the
//! command takes a physical dimension.

use crate::printer::{LabelProfile, LabelSettings, Orientation};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Clear the image buffer.
pub const CLEAR_BUFFER: &str = "CLS";

/// File name the label bitmap is stored under in printer memory.
pub const IMAGE_NAME: &str = "label.bmp";

/// Run the gap sensor calibration.
pub const AUTO_CALIBRATION: &str = "AUTO CALIBRATION";

// ============================================================================
// SETUP COMMANDS
// ============================================================================

/// # Print Direction (DIRECTION n)
///
/// | Orientation | n |
/// |-------------|---|
/// | Landscape   | 0 |
/// | Portrait    | 1 |
///
/// ```
/// use labelpress::printer::Orientation;
/// use labelpress::protocol::commands;
///
/// assert_eq!(commands::direction(Orientation::Portrait), "DIRECTION 1");
/// ```
pub fn direction(orientation: Orientation) -> String {
    let n = match orientation {
        Orientation::Landscape => 0,
        Orientation::Portrait => 1,
    };
    format!("DIRECTION {}", n)
}

/// # Print Darkness (DENSITY n)
///
/// Heat level, 0–15 on most models. Passed through unchecked.
pub fn density(level: u32) -> String {
    format!("DENSITY {}", level)
}

/// # Print Speed (SPEED n)
///
/// Inches per second. Passed through unchecked.
pub fn speed(ips: u32) -> String {
    format!("SPEED {}", ips)
}

/// # Label Size (SIZE w mm, h mm)
///
/// Both arguments are taken as given; see [`configuration`] for which
/// dimensions a job sends.
pub fn size(width_mm: f64, height_mm: f64) -> String {
    format!("SIZE {} mm, {} mm", width_mm, height_mm)
}

/// # Gap Between Labels (GAP m mm, n mm)
///
/// | Param | Meaning |
/// |-------|---------|
/// | m | gap height |
/// | n | gap offset |
pub fn gap(height_mm: f64, offset_mm: f64) -> String {
    format!("GAP {} mm, {} mm", height_mm, offset_mm)
}

/// # Tear Mode (TEAR ON|OFF)
///
/// With tear mode on, the label is fed to the tear bar after printing.
pub fn tear(enabled: bool) -> String {
    if enabled {
        "TEAR ON".to_string()
    } else {
        "TEAR OFF".to_string()
    }
}

/// # Vertical Offset (SHIFT n)
///
/// The configured left shift is sent negated:
///
/// ```
/// use labelpress::protocol::commands;
///
/// assert_eq!(commands::shift(2.032), "SHIFT -2.032 mm");
/// ```
pub fn shift(left_shift_mm: f64) -> String {
    format!("SHIFT -{} mm", left_shift_mm)
}

// ============================================================================
// PRINT COMMANDS
// ============================================================================

/// # Place Stored Bitmap (PUTBMP x, y, "name", bpp, contrast)
///
/// Places the uploaded bitmap at the label origin, 8-bit depth, contrast 80.
pub fn put_bitmap(name: &str) -> String {
    format!("PUTBMP 0,0,\"{}\",8,80", name)
}

/// # Print (PRINT m, n)
///
/// One set of one copy.
pub fn print() -> String {
    "PRINT 1,1".to_string()
}

// ============================================================================
// CONFIGURATION BLOCK
// ============================================================================

/// The eight configuration commands sent after the buffer is cleared.
///
/// `SIZE` carries the label **width** in both positions. This matches what
/// the deployed printers have always received; the height argument is
/// ignored by the gap-sensing firmware on these models.
pub fn configuration(settings: &LabelSettings, profile: LabelProfile) -> Vec<String> {
    let (width_mm, _height_mm) = settings.label_size(profile);
    vec![
        direction(settings.orientation),
        density(settings.density),
        speed(settings.speed),
        size(width_mm, width_mm),
        gap(settings.gap_height, settings.gap_offset),
        tear(settings.tear_off),
        AUTO_CALIBRATION.to_string(),
        shift(settings.left_shift),
    ]
}
