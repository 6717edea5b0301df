//! Label compositor: owns the canvas for one render call.

use image::RgbaImage;
use image::imageops;
use log::{debug, info};

use super::{DrawContext, ElementKind, FontResolver, MonoRaster, RenderReport, WHITE};
use super::{code, icon, text};
use crate::error::LabelError;
use crate::label::LabelElements;
use crate::printer::units::to_pixels;
use crate::printer::{LabelProfile, LabelSettings};

/// Largest canvas side accepted, in dots (about 1.7m at 300 dpi).
pub const MAX_CANVAS_DOTS: u32 = 20_000;

/// Canvas dimensions in dots for a label of `width_mm` × `height_mm`.
pub fn canvas_size(width_mm: f64, height_mm: f64, dpi: u32) -> Result<(u32, u32), LabelError> {
    let width = to_pixels(width_mm, dpi);
    let height = to_pixels(height_mm, dpi);

    let in_range = |dots: i64| dots >= 1 && dots <= MAX_CANVAS_DOTS as i64;
    if !in_range(width) || !in_range(height) {
        return Err(LabelError::Composition(format!(
            "canvas {}x{} dots ({}x{}mm at {} dpi) is outside 1..={}",
            width, height, width_mm, height_mm, dpi, MAX_CANVAS_DOTS
        )));
    }
    Ok((width as u32, height as u32))
}

/// Output of a render call.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub raster: MonoRaster,
    pub report: RenderReport,
}

/// Renders label elements to monochrome rasters.
#[derive(Default)]
pub struct LabelRenderer {
    fonts: FontResolver,
}

impl LabelRenderer {
    pub fn new(fonts: FontResolver) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontResolver {
        &self.fonts
    }

    /// Render `elements` onto a label of the profile's size.
    ///
    /// Codes are drawn first, then icons, then texts, each kind in list
    /// order, so later kinds paint over earlier ones. Elements that cannot
    /// be drawn are recorded in the report and do not fail the call.
    pub fn render(
        &self,
        elements: &LabelElements,
        profile: LabelProfile,
        settings: &LabelSettings,
    ) -> Result<RenderedLabel, LabelError> {
        settings.validate()?;
        elements.validate()?;

        let (width_mm, height_mm) = settings.label_size(profile);
        let (width, height) = canvas_size(width_mm, height_mm, settings.dpi)?;
        debug!(
            "Composing {} label: {}x{}mm → {}x{} dots at {} dpi",
            profile, width_mm, height_mm, width, height, settings.dpi
        );

        let mut canvas = RgbaImage::from_pixel(width, height, WHITE);
        let ctx = DrawContext {
            dpi: settings.dpi,
            fonts: &self.fonts,
        };
        let mut report = RenderReport::default();

        for (i, element) in elements.codes.iter().enumerate() {
            report.record(ElementKind::Code, i, code::draw(&mut canvas, element, &ctx));
        }
        for (i, element) in elements.icons.iter().enumerate() {
            report.record(ElementKind::Icon, i, icon::draw(&mut canvas, element, &ctx));
        }
        for (i, element) in elements.texts.iter().enumerate() {
            report.record(ElementKind::Text, i, text::draw(&mut canvas, element, &ctx));
        }

        let gray = imageops::grayscale(&canvas);
        let raster = MonoRaster::from_luma(&gray, settings.dpi);

        info!(
            "Rendered {} label {}x{}: {} drawn, {} skipped",
            profile,
            width,
            height,
            report.drawn_count(),
            report.skipped().count()
        );

        Ok(RenderedLabel { raster, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{CodeElement, IconElement, TextElement};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn settings_254() -> LabelSettings {
        // 10 dots per mm keeps the arithmetic readable
        LabelSettings {
            dpi: 254,
            primary_label_width: 40.0,
            primary_label_height: 20.0,
            ..LabelSettings::default()
        }
    }

    fn solid_icon(color: [u8; 4], x: f64, y: f64, w: f64, h: f64) -> IconElement {
        let img = RgbaImage::from_pixel(4, 4, Rgba(color));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        IconElement {
            payload: STANDARD.encode(bytes),
            x,
            y,
            width: w,
            height: h,
        }
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(canvas_size(100.0, 29.0, 300).unwrap(), (1181, 343));
        assert_eq!(canvas_size(100.0, 67.0, 300).unwrap(), (1181, 791));
        assert!(matches!(canvas_size(0.01, 29.0, 300), Err(LabelError::Composition(_))));
        assert!(matches!(canvas_size(10_000.0, 29.0, 300), Err(LabelError::Composition(_))));
    }

    #[test]
    fn test_empty_label_is_all_white() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        let label = renderer
            .render(&LabelElements::default(), LabelProfile::Primary, &LabelSettings::default())
            .unwrap();

        assert_eq!(label.raster.width(), 1181);
        assert_eq!(label.raster.height(), 343);
        assert_eq!(label.raster.black_count(), 0);
        assert!(label.report.elements.is_empty());
    }

    #[test]
    fn test_secondary_profile_size() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        let label = renderer
            .render(&LabelElements::default(), LabelProfile::Secondary, &LabelSettings::default())
            .unwrap();
        assert_eq!((label.raster.width(), label.raster.height()), (1181, 791));
    }

    #[test]
    fn test_icon_paints_over_code() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        // A white opaque icon over the whole code box blanks it
        let elements = LabelElements {
            codes: vec![CodeElement::new("12345", 1.0, 1.0, 15.0, 15.0)],
            icons: vec![solid_icon([255, 255, 255, 255], 1.0, 1.0, 15.0, 15.0)],
            ..Default::default()
        };
        let label = renderer
            .render(&elements, LabelProfile::Primary, &settings_254())
            .unwrap();

        assert!(label.report.is_clean());
        assert_eq!(label.raster.black_count(), 0);
    }

    #[test]
    fn test_text_paints_over_icon() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        // Black icon, then text; text only darkens, so the box stays black
        // and the text does not erase anything.
        let elements = LabelElements {
            icons: vec![solid_icon([0, 0, 0, 255], 0.0, 0.0, 5.0, 5.0)],
            texts: vec![TextElement::new("X", 0.0, 0.0).font_size(4.8)],
            ..Default::default()
        };
        let label = renderer
            .render(&elements, LabelProfile::Primary, &settings_254())
            .unwrap();

        for y in 0..50 {
            for x in 0..50 {
                assert!(label.raster.is_black(x, y));
            }
        }
    }

    #[test]
    fn test_bad_icon_does_not_abort() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        let elements = LabelElements {
            icons: vec![IconElement {
                payload: "not an image".to_string(),
                x: 0.0,
                y: 0.0,
                width: 5.0,
                height: 5.0,
            }],
            texts: vec![TextElement::new("OK", 1.0, 1.0).font_size(3.0)],
            ..Default::default()
        };
        let label = renderer
            .render(&elements, LabelProfile::Primary, &settings_254())
            .unwrap();

        assert_eq!(label.report.skipped().count(), 1);
        assert_eq!(label.report.drawn_count(), 1);
        assert!(label.raster.black_count() > 0);
    }

    #[test]
    fn test_invalid_element_fails_fast() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        let elements = LabelElements {
            texts: vec![TextElement::new("neg", -1.0, 0.0)],
            ..Default::default()
        };
        let result = renderer.render(&elements, LabelProfile::Primary, &settings_254());
        assert!(matches!(result, Err(LabelError::InvalidElement(_))));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = LabelRenderer::new(FontResolver::builtin());
        let elements = LabelElements {
            codes: vec![CodeElement::new("ABC-123", 2.0, 2.0, 12.0, 12.0)],
            texts: vec![TextElement::new("Çiğdem Şüküroğlu", 16.0, 3.0).font_size(3.0)],
            ..Default::default()
        };
        let a = renderer
            .render(&elements, LabelProfile::Primary, &settings_254())
            .unwrap();
        let b = renderer
            .render(&elements, LabelProfile::Primary, &settings_254())
            .unwrap();
        assert_eq!(a.raster.to_bmp(), b.raster.to_bmp());
    }
}
