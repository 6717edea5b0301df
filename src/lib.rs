//! # Labelpress - Thermal Label Printing Library
//!
//! Labelpress renders label layouts authored in millimetres into 1-bit
//! bitmaps and prints them on TSC thermal label printers. It provides:
//!
//! - **Rendering**: text, image and QR code elements composited onto a
//!   canvas sized to the label stock, then thresholded to monochrome
//! - **Protocol**: TSPL configuration and print commands
//! - **Transport**: a device channel trait, a device-file adapter, and a
//!   job dispatcher that always cleans up after itself
//! - **Settings**: two label profiles, environment loading, live updates
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelpress::{
//!     json_api::JsonLabel,
//!     printer::{LabelProfile, LabelSettings},
//!     render::FontResolver,
//!     render::LabelRenderer,
//!     service::LabelService,
//!     transport::PortChannel,
//! };
//!
//! let elements = JsonLabel::parse(r#"{
//!     "textEntries": [{"text": "PN-4711", "fontSize": 4, "x": 2, "y": 2}],
//!     "barcodeEntries": [{"barcodeData": "4711", "x": 70, "y": 2,
//!                         "width": 25, "height": 25, "textAlignment": "center"}]
//! }"#)?
//! .to_elements()?;
//!
//! let channel = PortChannel::new().with_device("TSC TE310-btpincode", "/dev/usb/lp0");
//! let service = LabelService::new(
//!     LabelSettings::from_env(),
//!     LabelRenderer::new(FontResolver::system()),
//!     channel,
//! );
//!
//! service.print(&elements, LabelProfile::Primary)?;
//!
//! # Ok::<(), labelpress::error::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Typed label elements |
//! | [`json_api`] | JSON request schema |
//! | [`render`] | Compositing and monochrome output |
//! | [`protocol`] | TSPL command builders |
//! | [`transport`] | Device channels and job dispatch |
//! | [`printer`] | Settings, profiles, unit conversion |
//! | [`service`] | Serialized print jobs |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently used with:
//! - TSC TE310 (300 DPI, USB)
//!
//! Other TSPL printers should work with adjusted settings.

pub mod error;
pub mod json_api;
pub mod label;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod service;
pub mod transport;

// Re-exports for convenience
pub use error::LabelError;
pub use printer::{LabelProfile, LabelSettings};
pub use service::LabelService;
