//! # Error Types
//!
//! This module defines error types used throughout the labelpress library.
//!
//! Per-element drawing problems are not errors: they surface as
//! [`ElementOutcome::Skipped`](crate::render::ElementOutcome) in the render
//! report. Everything here aborts the render call or the print job.

use thiserror::Error;

/// Main error type for labelpress operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// A label element is missing a required field or carries an invalid value.
    /// Raised before any drawing starts.
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// Settings violate an invariant, or an update carried a value of the wrong type
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The label canvas could not be produced
    #[error("Composition failed: {0}")]
    Composition(String),

    /// The device channel refused to open. No commands were sent.
    #[error("Could not open printer '{printer}'")]
    DeviceOpen { printer: String },

    /// A device call failed after the channel was opened
    #[error("Printer command failed after reaching state {stage}")]
    DeviceCommand { stage: &'static str },

    /// Transport-level errors reported by a device channel adapter
    #[error("Transport error: {0}")]
    Transport(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// JSON input or settings file error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
