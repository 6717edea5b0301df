//! JSON schema types for label requests.
//!
//! Field names follow the label editor's request body (camelCase).

use serde::Deserialize;

use crate::label::{CaptionAlignment, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, SymbolFormat};

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

/// Top-level label request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLabel {
    #[serde(default)]
    pub text_entries: Vec<JsonTextEntry>,
    #[serde(default)]
    pub icon_entries: Vec<JsonIconEntry>,
    #[serde(default)]
    pub barcode_entries: Vec<JsonBarcodeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTextEntry {
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonIconEntry {
    #[serde(default)]
    pub base64_string: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonBarcodeEntry {
    #[serde(default)]
    pub barcode_data: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub barcode_format: SymbolFormat,
    #[serde(default)]
    pub text_alignment: CaptionAlignment,
    #[serde(default = "default_font_size")]
    pub text_font_size: f64,
    #[serde(default = "default_font_family")]
    pub text_font_family: String,
}
