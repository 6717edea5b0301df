//! # Label Settings
//!
//! Physical label stock, printer tuning and job flags for the two label
//! profiles printed by one installation.
//!
//! ## Profiles
//!
//! | Profile | Default printer | Default size |
//! |---------|-----------------|--------------|
//! | Primary | TSC TE310-btpincode | 100 × 29 mm |
//! | Secondary | TSC TE310-packaging | 100 × 67 mm |
//!
//! ## Usage
//!
//! ```
//! use labelpress::printer::{LabelProfile, LabelSettings};
//!
//! let settings = LabelSettings::default();
//! let (width, height) = settings.label_size(LabelProfile::Secondary);
//! assert_eq!((width, height), (100.0, 67.0));
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LabelError;

/// One of the two label configurations an installation prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelProfile {
    Primary,
    Secondary,
}

impl fmt::Display for LabelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Print direction relative to the feed.
///
/// Any value other than `landscape` (case-insensitive) reads as portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("landscape") {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl Serialize for Orientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// # Label Settings
///
/// Field names double as the keys accepted by
/// [`SettingsStore::update`](super::SettingsStore::update).
///
/// All lengths are millimetres. `dpi` is the printer resolution used for
/// every mm → dot conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    pub primary_printer_name: String,
    pub secondary_printer_name: String,
    pub primary_label_width: f64,
    pub primary_label_height: f64,
    pub secondary_label_width: f64,
    pub secondary_label_height: f64,
    pub dpi: u32,
    pub orientation: Orientation,
    pub density: u32,
    pub speed: u32,
    pub gap_height: f64,
    pub gap_offset: f64,
    pub tear_off: bool,
    pub left_shift: f64,
    /// Carried for completeness; the command set only applies the left shift.
    pub right_shift: f64,
    /// Build print commands but never touch the device.
    pub is_app_development_mode: bool,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            primary_printer_name: "TSC TE310-btpincode".to_string(),
            secondary_printer_name: "TSC TE310-packaging".to_string(),
            primary_label_width: 100.0,
            primary_label_height: 29.0,
            secondary_label_width: 100.0,
            secondary_label_height: 67.0,
            dpi: 300,
            orientation: Orientation::Portrait,
            density: 12,
            speed: 4,
            gap_height: 3.048,
            gap_offset: 0.0,
            tear_off: true,
            left_shift: 2.032,
            right_shift: 2.032,
            is_app_development_mode: false,
        }
    }
}

impl LabelSettings {
    /// Load settings from the process environment, reading a `.env` file
    /// first when one exists. Missing variables keep their defaults.
    pub fn from_env() -> Self {
        // A missing .env is the normal case.
        let _ = dotenvy::dotenv();

        let d = Self::default();
        Self {
            primary_printer_name: env::var("PRIMARY_PRINTER_NAME").unwrap_or(d.primary_printer_name),
            secondary_printer_name: env::var("SECONDARY_PRINTER_NAME")
                .unwrap_or(d.secondary_printer_name),
            primary_label_width: env_or("PRIMARY_LABEL_WIDTH", d.primary_label_width),
            primary_label_height: env_or("PRIMARY_LABEL_HEIGHT", d.primary_label_height),
            secondary_label_width: env_or("SECONDARY_LABEL_WIDTH", d.secondary_label_width),
            secondary_label_height: env_or("SECONDARY_LABEL_HEIGHT", d.secondary_label_height),
            dpi: env_or("DPI", d.dpi),
            orientation: env::var("ORIENTATION")
                .map(|s| Orientation::parse(&s))
                .unwrap_or(d.orientation),
            density: env_or("DENSITY", d.density),
            speed: env_or("SPEED", d.speed),
            gap_height: env_or("GAP_HEIGHT", d.gap_height),
            gap_offset: env_or("GAP_OFFSET", d.gap_offset),
            tear_off: env_flag("TEAR_OFF", d.tear_off),
            left_shift: env_or("LEFT_SHIFT", d.left_shift),
            right_shift: env_or("RIGHT_SHIFT", d.right_shift),
            is_app_development_mode: env_flag("IS_APP_DEVELOPMENT_MODE", d.is_app_development_mode),
        }
    }

    /// Physical (width, height) of the profile's label stock in millimetres.
    pub fn label_size(&self, profile: LabelProfile) -> (f64, f64) {
        match profile {
            LabelProfile::Primary => (self.primary_label_width, self.primary_label_height),
            LabelProfile::Secondary => (self.secondary_label_width, self.secondary_label_height),
        }
    }

    /// Printer identifier the profile's jobs are sent to.
    pub fn printer_name(&self, profile: LabelProfile) -> &str {
        match profile {
            LabelProfile::Primary => &self.primary_printer_name,
            LabelProfile::Secondary => &self.secondary_printer_name,
        }
    }

    /// Check the invariants rendering depends on.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.dpi == 0 {
            return Err(LabelError::InvalidSettings("dpi must be at least 1".to_string()));
        }
        let sizes = [
            ("primary_label_width", self.primary_label_width),
            ("primary_label_height", self.primary_label_height),
            ("secondary_label_width", self.secondary_label_width),
            ("secondary_label_height", self.secondary_label_height),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(LabelError::InvalidSettings(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn env_or<T: FromStr + fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring {}={:?}: not a valid value, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|raw| raw.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

// ============================================================================
// TESTS
// ============================================================================
