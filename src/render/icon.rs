//! Icon element renderer.
//!
//! Decodes the base64 image payload, scales it into the element's box with
//! nearest-neighbour sampling and alpha-composites it onto the canvas.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::debug;

use super::{DrawContext, ElementOutcome};
use crate::label::IconElement;
use crate::printer::units::{to_dots, to_pixels};

/// Draw one icon element.
pub fn draw(canvas: &mut RgbaImage, icon: &IconElement, ctx: &DrawContext<'_>) -> ElementOutcome {
    let bytes = match decode_payload(&icon.payload) {
        Ok(bytes) => bytes,
        Err(reason) => return ElementOutcome::Skipped(reason),
    };

    let source = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => return ElementOutcome::Skipped(format!("payload is not a readable image: {}", e)),
    };

    let width = to_dots(icon.width, ctx.dpi);
    let height = to_dots(icon.height, ctx.dpi);
    if width == 0 || height == 0 {
        return ElementOutcome::Skipped(format!(
            "{}x{}mm is below one dot at {} dpi",
            icon.width, icon.height, ctx.dpi
        ));
    }

    let x = to_pixels(icon.x, ctx.dpi);
    let y = to_pixels(icon.y, ctx.dpi);
    debug!(
        "Icon {}x{} → {}x{} at ({}, {})",
        source.width(),
        source.height(),
        width,
        height,
        x,
        y
    );

    let resized = source
        .resize_exact(width, height, FilterType::Nearest)
        .to_rgba8();
    imageops::overlay(canvas, &resized, x, y);

    ElementOutcome::Drawn
}

/// Base64 text → image file bytes. Accepts a `data:<mime>;base64,` prefix
/// and embedded whitespace.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, String> {
    let trimmed = payload.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| "data URL has no payload".to_string())?,
        None => trimmed,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err("empty payload".to_string());
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("payload is not valid base64: {}", e))
}
