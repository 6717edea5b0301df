//! Text element renderer.
//!
//! Text is anchored at its top-left: the ascender line sits on `y`. Outline
//! fonts are rasterized with `ab_glyph` and their coverage blended toward
//! black; the built-in bitmap font is scaled nearest-neighbour from its
//! 12×24 cell.

use ab_glyph::{Font, ScaleFont, point};
use image::RgbaImage;
use log::debug;

use super::font::{BUILTIN_CELL_HEIGHT, BUILTIN_CELL_WIDTH, ResolvedFont, builtin_glyph};
use super::sanitize::sanitize;
use super::{DrawContext, ElementOutcome, blend_black};
use crate::label::TextElement;
use crate::printer::units::to_pixels;

/// Draw one text element.
pub fn draw(canvas: &mut RgbaImage, element: &TextElement, ctx: &DrawContext<'_>) -> ElementOutcome {
    let content = sanitize(&element.content);
    if content.is_empty() {
        return ElementOutcome::Drawn;
    }

    let pixel_size = to_pixels(element.font_size, ctx.dpi);
    if pixel_size <= 0 {
        return ElementOutcome::Skipped(format!(
            "font size {}mm is below one dot at {} dpi",
            element.font_size, ctx.dpi
        ));
    }

    let font = ctx.fonts.resolve(&element.font_family);
    let x = to_pixels(element.x, ctx.dpi);
    let y = to_pixels(element.y, ctx.dpi);
    debug!("Text {:?} at ({}, {}) size {}px", content, x, y, pixel_size);

    draw_string(canvas, &font, &content, x, y, pixel_size as f32);
    ElementOutcome::Drawn
}

/// Draw `text` with its top-left corner at (x, y). Returns the advance width in pixels.
pub(crate) fn draw_string(
    canvas: &mut RgbaImage,
    font: &ResolvedFont,
    text: &str,
    x: i64,
    y: i64,
    pixel_size: f32,
) -> i64 {
    match font {
        ResolvedFont::Outline(font) => draw_outline(canvas, font, text, x, y, pixel_size),
        ResolvedFont::Builtin => draw_builtin(canvas, text, x, y, pixel_size),
    }
}

fn draw_outline<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    text: &str,
    x: i64,
    y: i64,
    pixel_size: f32,
) -> i64 {
    let scaled = font.as_scaled(pixel_size);
    let baseline_y = y as f32 + scaled.ascent();
    let mut caret_x = x as f32;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(pixel_size, point(caret_x, baseline_y));
        caret_x += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let gx = bounds.min.x as i64 + px as i64;
                let gy = bounds.min.y as i64 + py as i64;
                blend_black(canvas, gx, gy, coverage);
            });
        }
    }

    (caret_x - x as f32).ceil() as i64
}

fn draw_builtin(canvas: &mut RgbaImage, text: &str, x: i64, y: i64, pixel_size: f32) -> i64 {
    let cell_h = pixel_size.round().max(1.0) as usize;
    let cell_w = ((BUILTIN_CELL_WIDTH as f32 * pixel_size / BUILTIN_CELL_HEIGHT as f32).round()
        as usize)
        .max(1);

    let mut caret_x = x;
    for ch in text.chars() {
        let glyph = builtin_glyph(ch);
        for dy in 0..cell_h {
            let sy = dy * BUILTIN_CELL_HEIGHT / cell_h;
            for dx in 0..cell_w {
                let sx = dx * BUILTIN_CELL_WIDTH / cell_w;
                if glyph[sy * BUILTIN_CELL_WIDTH + sx] {
                    blend_black(canvas, caret_x + dx as i64, y + dy as i64, 1.0);
                }
            }
        }
        caret_x += cell_w as i64;
    }

    caret_x - x
}
