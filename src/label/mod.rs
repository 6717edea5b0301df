//! # Label Elements
//!
//! The three element kinds a label is built from. Every position and size
//! is in millimetres from the label's top-left corner.
//!
//! ```
//! use labelpress::label::{LabelElements, TextElement};
//!
//! let elements = LabelElements {
//!     texts: vec![TextElement::new("SN 000123", 2.0, 2.0).font_size(4.0)],
//!     ..Default::default()
//! };
//! assert!(elements.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// A run of text drawn top-left anchored at (x, y).
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    /// Advisory; resolution falls back when the family is unavailable.
    pub font_family: String,
    /// Font size in millimetres.
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
}

impl TextElement {
    pub fn new(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            content: content.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            x,
            y,
        }
    }

    pub fn font_size(mut self, mm: f64) -> Self {
        self.font_size = mm;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }
}

/// An embedded image scaled into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct IconElement {
    /// Base64-encoded image file (PNG, BMP, ...). A `data:` URL prefix is accepted.
    pub payload: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Symbology requested for a code element.
///
/// Every format is rendered as a QR matrix code; the tag is kept so the
/// element round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolFormat {
    #[serde(rename = "CODE_128")]
    Code128,
    #[default]
    #[serde(rename = "CODE_39")]
    Code39,
    QrCode,
}

/// Caption placement under a code. Anything but `None` draws the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A matrix code with an optional human-readable caption below it.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeElement {
    pub payload: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub format: SymbolFormat,
    pub caption: CaptionAlignment,
    /// Caption font size in millimetres.
    pub caption_font_size: f64,
    pub caption_font_family: String,
}

impl CodeElement {
    pub fn new(payload: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            payload: payload.into(),
            x,
            y,
            width,
            height,
            format: SymbolFormat::default(),
            caption: CaptionAlignment::None,
            caption_font_size: DEFAULT_FONT_SIZE,
            caption_font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    pub fn caption(mut self, alignment: CaptionAlignment) -> Self {
        self.caption = alignment;
        self
    }
}

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: f64 = 8.0;

/// Everything drawn on one label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelElements {
    pub texts: Vec<TextElement>,
    pub icons: Vec<IconElement>,
    pub codes: Vec<CodeElement>,
}

impl LabelElements {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.icons.is_empty() && self.codes.is_empty()
    }

    /// Reject malformed elements before anything is drawn.
    ///
    /// Payload problems (undecodable icons, empty codes) are not checked here;
    /// those elements are skipped at draw time.
    pub fn validate(&self) -> Result<(), LabelError> {
        for (i, text) in self.texts.iter().enumerate() {
            check_position("text", i, text.x, text.y)?;
            check_non_negative("text", i, "font_size", text.font_size)?;
        }
        for (i, icon) in self.icons.iter().enumerate() {
            check_position("icon", i, icon.x, icon.y)?;
            check_positive("icon", i, "width", icon.width)?;
            check_positive("icon", i, "height", icon.height)?;
        }
        for (i, code) in self.codes.iter().enumerate() {
            check_position("code", i, code.x, code.y)?;
            check_positive("code", i, "width", code.width)?;
            check_positive("code", i, "height", code.height)?;
            check_non_negative("code", i, "caption_font_size", code.caption_font_size)?;
        }
        Ok(())
    }
}

fn check_position(kind: &str, index: usize, x: f64, y: f64) -> Result<(), LabelError> {
    check_non_negative(kind, index, "x", x)?;
    check_non_negative(kind, index, "y", y)
}

fn check_non_negative(kind: &str, index: usize, field: &str, value: f64) -> Result<(), LabelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LabelError::InvalidElement(format!(
            "{} #{}: {} must be a non-negative number, got {}",
            kind, index, field, value
        )))
    }
}

fn check_positive(kind: &str, index: usize, field: &str, value: f64) -> Result<(), LabelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LabelError::InvalidElement(format!(
            "{} #{}: {} must be greater than zero, got {}",
            kind, index, field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(width: f64, height: f64) -> IconElement {
        IconElement {
            payload: String::new(),
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    #[test]
    fn test_empty_is_valid() {
        let elements = LabelElements::default();
        assert!(elements.is_empty());
        assert!(elements.validate().is_ok());
    }

    #[test]
    fn test_negative_position_rejected() {
        let elements = LabelElements {
            texts: vec![TextElement::new("x", -1.0, 0.0)],
            ..Default::default()
        };
        let err = elements.validate().unwrap_err();
        assert!(err.to_string().contains("text #0"));
    }

    #[test]
    fn test_zero_icon_size_rejected() {
        let elements = LabelElements {
            icons: vec![icon(10.0, 10.0), icon(10.0, 0.0)],
            ..Default::default()
        };
        let err = elements.validate().unwrap_err();
        assert!(matches!(err, LabelError::InvalidElement(ref m) if m.contains("icon #1")));
    }

    #[test]
    fn test_empty_payloads_pass_validation() {
        let elements = LabelElements {
            texts: vec![TextElement::new("", 0.0, 0.0)],
            icons: vec![icon(5.0, 5.0)],
            codes: vec![CodeElement::new("", 1.0, 1.0, 10.0, 10.0)],
        };
        assert!(elements.validate().is_ok());
    }

    #[test]
    fn test_format_tags() {
        let f: SymbolFormat = serde_json::from_str("\"CODE_128\"").unwrap();
        assert_eq!(f, SymbolFormat::Code128);
        let f: SymbolFormat = serde_json::from_str("\"QR_CODE\"").unwrap();
        assert_eq!(f, SymbolFormat::QrCode);
        let a: CaptionAlignment = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(a, CaptionAlignment::Center);
    }
}
