//! # JSON API
//!
//! Deserialize label requests into [`LabelElements`](crate::label::LabelElements).
//!
//! ## Example
//!
//! ```
//! use labelpress::json_api::JsonLabel;
//!
//! let json = r#"{
//!     "textEntries": [{"text": "Hello", "fontSize": 4, "x": 2, "y": 2}],
//!     "barcodeEntries": [{"barcodeData": "1598524566", "x": 70, "y": 2,
//!                         "width": 20, "height": 20, "textAlignment": "left"}]
//! }"#;
//!
//! let elements = JsonLabel::parse(json).unwrap().to_elements().unwrap();
//! assert_eq!(elements.texts.len(), 1);
//! assert_eq!(elements.codes.len(), 1);
//! ```

mod convert;
mod schema;

pub use schema::{JsonBarcodeEntry, JsonIconEntry, JsonLabel, JsonTextEntry};
