//! # Rendering Module
//!
//! Turns label elements into the monochrome raster the printer prints.
//!
//! ## Pipeline
//!
//! ```text
//! LabelElements ──► compositor ──► RGBA canvas (white)
//!                       │
//!                       ├─ code::draw   (all codes)
//!                       ├─ icon::draw   (all icons)
//!                       ├─ text::draw   (all texts)
//!                       ▼
//!                  grayscale ──► threshold ──► MonoRaster ──► BMP
//! ```
//!
//! ## Modules
//!
//! - [`compositor`]: Canvas lifecycle and draw order
//! - [`code`], [`icon`], [`text`]: One renderer per element kind
//! - [`font`]: Font source chain with built-in fallback
//! - [`sanitize`]: Accented-letter fallbacks
//! - [`mono`]: 1-bit raster and BMP encoding
//!
//! ## Usage Example
//!
//! ```
//! use labelpress::label::{LabelElements, TextElement};
//! use labelpress::printer::{LabelProfile, LabelSettings};
//! use labelpress::render::{FontResolver, LabelRenderer};
//!
//! let renderer = LabelRenderer::new(FontResolver::builtin());
//! let elements = LabelElements {
//!     texts: vec![TextElement::new("HELLO", 2.0, 2.0).font_size(5.0)],
//!     ..Default::default()
//! };
//!
//! let label = renderer
//!     .render(&elements, LabelProfile::Primary, &LabelSettings::default())
//!     .unwrap();
//! assert_eq!((label.raster.width(), label.raster.height()), (1181, 343));
//! assert!(label.report.is_clean());
//! ```

pub mod code;
pub mod compositor;
pub mod font;
pub mod icon;
pub mod mono;
pub mod sanitize;
pub mod text;

pub use compositor::{LabelRenderer, RenderedLabel};
pub use font::{FontResolver, ResolvedFont};
pub use mono::MonoRaster;

use std::fmt;

use image::{Rgba, RgbaImage};
use log::warn;

/// Result of drawing one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementOutcome {
    Drawn,
    /// The element was left off the label; the reason is for diagnostics.
    Skipped(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Code,
    Icon,
    Text,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Icon => write!(f, "icon"),
            Self::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementReport {
    pub kind: ElementKind,
    /// Position within its kind's list.
    pub index: usize,
    pub outcome: ElementOutcome,
}

/// Per-element outcomes of one render, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub elements: Vec<ElementReport>,
}

impl RenderReport {
    pub(crate) fn record(&mut self, kind: ElementKind, index: usize, outcome: ElementOutcome) {
        if let ElementOutcome::Skipped(reason) = &outcome {
            warn!("Skipped {} #{}: {}", kind, index, reason);
        }
        self.elements.push(ElementReport {
            kind,
            index,
            outcome,
        });
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ElementReport> {
        self.elements
            .iter()
            .filter(|r| matches!(r.outcome, ElementOutcome::Skipped(_)))
    }

    pub fn drawn_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|r| r.outcome == ElementOutcome::Drawn)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.skipped().next().is_none()
    }
}

/// Shared inputs for the element renderers.
pub struct DrawContext<'a> {
    pub dpi: u32,
    pub fonts: &'a FontResolver,
}

pub(crate) const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Darken a canvas pixel toward black by `coverage` (0.0–1.0).
/// Out-of-bounds coordinates are ignored.
pub(crate) fn blend_black(canvas: &mut RgbaImage, x: i64, y: i64, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let keep = 1.0 - coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for channel in pixel.0.iter_mut().take(3) {
        *channel = (*channel as f32 * keep).round() as u8;
    }
}
