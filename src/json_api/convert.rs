//! Conversion from JSON schema types to label elements.

use crate::error::LabelError;
use crate::label::{CodeElement, IconElement, LabelElements, TextElement};

use super::schema::*;

impl JsonLabel {
    /// Parse a label request. Missing required fields and wrong types are
    /// reported as [`LabelError::InvalidElement`].
    pub fn parse(json: &str) -> Result<Self, LabelError> {
        serde_json::from_str(json).map_err(|e| LabelError::InvalidElement(e.to_string()))
    }

    /// Convert to validated label elements.
    pub fn to_elements(&self) -> Result<LabelElements, LabelError> {
        let elements = LabelElements {
            texts: self.text_entries.iter().map(JsonTextEntry::to_element).collect(),
            icons: self.icon_entries.iter().map(JsonIconEntry::to_element).collect(),
            codes: self
                .barcode_entries
                .iter()
                .map(JsonBarcodeEntry::to_element)
                .collect(),
        };
        elements.validate()?;
        Ok(elements)
    }
}

impl JsonTextEntry {
    fn to_element(&self) -> TextElement {
        TextElement {
            content: self.text.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            x: self.x,
            y: self.y,
        }
    }
}

impl JsonIconEntry {
    fn to_element(&self) -> IconElement {
        IconElement {
            payload: self.base64_string.clone(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

impl JsonBarcodeEntry {
    fn to_element(&self) -> CodeElement {
        CodeElement {
            payload: self.barcode_data.clone(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            format: self.barcode_format,
            caption: self.text_alignment,
            caption_font_size: self.text_font_size,
            caption_font_family: self.text_font_family.clone(),
        }
    }
}
