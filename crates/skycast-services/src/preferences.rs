//! Unit system and theme preferences.
//!
//! Values are read once at construction and written back on every change.
//! A failing store only costs durability: the in-memory value still updates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skycast_weather::UnitSystem;

use crate::store::KeyValueStore;

pub const KEY_UNITS: &str = "units";
pub const KEY_THEME: &str = "theme";
pub const KEY_LAST_CITY: &str = "lastCity";
pub const KEY_HISTORY: &str = "history";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Snapshot of everything the user has chosen or last looked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    pub units: UnitSystem,
    pub theme: Theme,
    pub last_city: Option<String>,
}

/// Reads a string value, treating storage failures as "never written"
pub(crate) fn read_value(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to read {} from store: {}", key, e);
            None
        }
    }
}

/// Writes a value, logging instead of failing when the store is unavailable
pub(crate) fn write_value(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!("Failed to persist {}; keeping it in memory only: {}", key, e);
    }
}

pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    units: UnitSystem,
    theme: Theme,
}

impl Preferences {
    /// Load persisted values; missing or unrecognised ones fall back to defaults
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let units = read_value(store.as_ref(), KEY_UNITS)
            .and_then(|v| UnitSystem::parse(&v))
            .unwrap_or_default();
        let theme = read_value(store.as_ref(), KEY_THEME)
            .and_then(|v| Theme::parse(&v))
            .unwrap_or_default();

        tracing::debug!("Loaded preferences: units={:?} theme={:?}", units, theme);
        Self {
            store,
            units,
            theme,
        }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
        write_value(self.store.as_ref(), KEY_UNITS, units.as_str());
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        write_value(self.store.as_ref(), KEY_THEME, theme.as_str());
    }
}
