//! Process-wide settings store.
//!
//! Jobs read through [`SettingsStore::snapshot`] once at start and work on
//! the copy, so an update that lands mid-job never produces a torn read.

use std::sync::{PoisonError, RwLock};

use log::{debug, info};
use serde_json::{Map, Value};

use super::config::LabelSettings;
use crate::error::LabelError;

/// Shared, updatable [`LabelSettings`]. Last writer wins.
#[derive(Debug, Default)]
pub struct SettingsStore {
    inner: RwLock<LabelSettings>,
}

impl SettingsStore {
    pub fn new(settings: LabelSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Consistent copy of the current settings.
    pub fn snapshot(&self) -> LabelSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace all settings.
    pub fn replace(&self, settings: LabelSettings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Apply a partial key/value update.
    ///
    /// Keys that name a settings field are applied; unknown keys are ignored.
    /// If any applied value has the wrong type the whole update is rejected
    /// and nothing changes. Returns the keys that were applied.
    pub fn update(&self, changes: &Map<String, Value>) -> Result<Vec<String>, LabelError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut current = match serde_json::to_value(&*guard)? {
            Value::Object(map) => map,
            other => {
                return Err(LabelError::InvalidSettings(format!(
                    "settings serialized to {} instead of an object",
                    other
                )));
            }
        };

        let mut applied = Vec::new();
        for (key, value) in changes {
            if let Some(slot) = current.get_mut(key) {
                *slot = value.clone();
                applied.push(key.clone());
            } else {
                debug!("Ignoring unknown settings key '{}'", key);
            }
        }

        let updated: LabelSettings = serde_json::from_value(Value::Object(current))
            .map_err(|e| LabelError::InvalidSettings(e.to_string()))?;
        *guard = updated;

        info!("Settings updated: {}", applied.join(", "));
        Ok(applied)
    }
}
