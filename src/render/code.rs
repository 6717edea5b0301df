//! Matrix code renderer.
//!
//! Every code element becomes a QR symbol at error-correction level L,
//! built at 10 pixels per module with a 4-module quiet zone and then
//! scaled (nearest-neighbour) into the element's box.
//!
//! ## Caption
//!
//! When the caption is enabled, the sanitized payload is drawn under the
//! symbol with its top-left corner at:
//!
//! ```text
//! (x, y + code_height_px + 5)
//! ```
//!
//! Every alignment other than `none` uses that anchor.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use log::debug;
use qrcode::{EcLevel, QrCode};

use super::sanitize::sanitize;
use super::text::draw_string;
use super::{DrawContext, ElementOutcome};
use crate::label::{CaptionAlignment, CodeElement, SymbolFormat};
use crate::printer::units::{to_dots, to_pixels};

/// Pixels per module before scaling.
pub const MODULE_PIXELS: u32 = 10;

/// Quiet zone width in modules.
pub const QUIET_ZONE: u32 = 4;

/// Gap between the symbol and its caption, in dots.
pub const CAPTION_GAP: i64 = 5;

/// Build the unscaled QR symbol for `payload`.
pub fn matrix_image(payload: &str) -> Result<GrayImage, String> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
        .map_err(|e| format!("QR code generation failed: {}", e))?;

    let modules = code.width();
    let size = (modules as u32 + 2 * QUIET_ZONE) * MODULE_PIXELS;
    let mut img = GrayImage::from_pixel(size, size, Luma([255]));

    for qy in 0..modules {
        for qx in 0..modules {
            if code[(qx, qy)] != qrcode::Color::Dark {
                continue;
            }
            let left = (qx as u32 + QUIET_ZONE) * MODULE_PIXELS;
            let top = (qy as u32 + QUIET_ZONE) * MODULE_PIXELS;
            for py in top..top + MODULE_PIXELS {
                for px in left..left + MODULE_PIXELS {
                    img.put_pixel(px, py, Luma([0]));
                }
            }
        }
    }

    Ok(img)
}

/// Draw one code element and, if enabled, its caption.
pub fn draw(canvas: &mut RgbaImage, code: &CodeElement, ctx: &DrawContext<'_>) -> ElementOutcome {
    if code.payload.is_empty() {
        return ElementOutcome::Skipped("empty payload".to_string());
    }
    if code.format != SymbolFormat::QrCode {
        debug!("{:?} requested, drawing as QR", code.format);
    }

    let symbol = match matrix_image(&code.payload) {
        Ok(img) => img,
        Err(reason) => return ElementOutcome::Skipped(reason),
    };

    let width = to_dots(code.width, ctx.dpi);
    let height = to_dots(code.height, ctx.dpi);
    if width == 0 || height == 0 {
        return ElementOutcome::Skipped(format!(
            "{}x{}mm is below one dot at {} dpi",
            code.width, code.height, ctx.dpi
        ));
    }

    let x = to_pixels(code.x, ctx.dpi);
    let y = to_pixels(code.y, ctx.dpi);
    let scaled = DynamicImage::ImageLuma8(symbol)
        .resize_exact(width, height, FilterType::Nearest)
        .to_rgba8();
    imageops::overlay(canvas, &scaled, x, y);

    if code.caption != CaptionAlignment::None {
        draw_caption(canvas, code, ctx, x, y + height as i64 + CAPTION_GAP);
    }

    ElementOutcome::Drawn
}

fn draw_caption(canvas: &mut RgbaImage, code: &CodeElement, ctx: &DrawContext<'_>, x: i64, y: i64) {
    let pixel_size = to_pixels(code.caption_font_size, ctx.dpi);
    if pixel_size <= 0 {
        debug!("Caption font size rounds to zero, not drawn");
        return;
    }
    let font = ctx.fonts.resolve(&code.caption_font_family);
    draw_string(canvas, &font, &sanitize(&code.payload), x, y, pixel_size as f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FontResolver, WHITE};

    fn is_dark(canvas: &RgbaImage, x: u32, y: u32) -> bool {
        canvas.get_pixel(x, y).0[0] < 128
    }

    #[test]
    fn test_matrix_image_quiet_zone() {
        let img = matrix_image("1598524566").unwrap();
        // Version 1 symbol: 21 modules + 2×4 quiet zone
        assert_eq!(img.width(), (21 + 8) * MODULE_PIXELS);
        assert_eq!(img.width(), img.height());
        // Quiet zone is white, finder pattern corner is dark
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(QUIET_ZONE * MODULE_PIXELS, QUIET_ZONE * MODULE_PIXELS)[0], 0);
    }

    #[test]
    fn test_code_drawn_in_box() {
        let fonts = FontResolver::builtin();
        let ctx = DrawContext { dpi: 254, fonts: &fonts };
        let mut canvas = RgbaImage::from_pixel(300, 300, WHITE);

        let code = CodeElement::new("1598524566", 5.0, 5.0, 14.5, 14.5);
        assert_eq!(draw(&mut canvas, &code, &ctx), ElementOutcome::Drawn);

        // 145px box for 29 modules → 5px per module; first finder module at 4*5 = 20px in
        assert!(is_dark(&canvas, 50 + 22, 50 + 22));
        assert!(!is_dark(&canvas, 50 + 2, 50 + 2));
        // Nothing outside the box
        assert!(!is_dark(&canvas, 49, 60));
        assert!(!is_dark(&canvas, 60, 196));
    }

    #[test]
    fn test_caption_below_code() {
        let fonts = FontResolver::builtin();
        let ctx = DrawContext { dpi: 254, fonts: &fonts };
        let mut canvas = RgbaImage::from_pixel(400, 400, WHITE);

        let code = CodeElement::new("ABC", 1.0, 1.0, 10.0, 10.0).caption(CaptionAlignment::Left);
        let code = CodeElement {
            caption_font_size: 2.4,
            ..code
        };
        assert_eq!(draw(&mut canvas, &code, &ctx), ElementOutcome::Drawn);

        // Caption band starts at 10 + 100 + 5 = 115 and is 24px tall
        let caption_ink = (115..139).any(|y| (10..60).any(|x| is_dark(&canvas, x, y)));
        assert!(caption_ink);
        // Gap between symbol and caption stays clear
        assert!((110..115).all(|y| (0..400).all(|x| !is_dark(&canvas, x, y))));
    }

    #[test]
    fn test_no_caption_when_none() {
        let fonts = FontResolver::builtin();
        let ctx = DrawContext { dpi: 254, fonts: &fonts };
        let mut canvas = RgbaImage::from_pixel(400, 400, WHITE);

        let code = CodeElement::new("ABC", 1.0, 1.0, 10.0, 10.0);
        assert_eq!(draw(&mut canvas, &code, &ctx), ElementOutcome::Drawn);
        assert!((110..400).all(|y| (0..400).all(|x| !is_dark(&canvas, x, y))));
    }

    #[test]
    fn test_empty_payload_skipped() {
        let fonts = FontResolver::builtin();
        let ctx = DrawContext { dpi: 203, fonts: &fonts };
        let mut canvas = RgbaImage::from_pixel(50, 50, WHITE);

        let code = CodeElement::new("", 0.0, 0.0, 5.0, 5.0);
        assert_eq!(
            draw(&mut canvas, &code, &ctx),
            ElementOutcome::Skipped("empty payload".to_string())
        );
    }
}
