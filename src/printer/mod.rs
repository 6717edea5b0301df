//! # Printer Module
//!
//! Printer and label-stock configuration.
//!
//! ## Modules
//!
//! - [`config`]: Label settings and profiles
//! - [`store`]: Shared settings with snapshot reads and partial updates
//! - [`units`]: Millimetre to dot conversion

pub mod config;
pub mod store;
pub mod units;

pub use config::{LabelProfile, LabelSettings, Orientation};
pub use store::SettingsStore;
