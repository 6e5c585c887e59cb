//! Game settings and preferences
//!
//! Persisted as individual string keys in the platform's settings store.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::lights::{Bulb, format_bulbs, parse_bulbs};
use crate::platform::SettingsStore;

/// Store keys
pub mod keys {
    pub const PREVIOUS_BEST_TIME: &str = "PreviousBestTime";
    pub const SOUND_STATUS: &str = "SoundStatus";
    pub const DEVICE_NAME: &str = "DeviceName";
    pub const HUE_APP_KEY: &str = "HueAppKey";
    pub const HUE_CONNECTED_BULBS: &str = "HueConnectedBulbs";
}

/// Pairing identity for the smart-light bridge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightIdentity {
    pub device_name: String,
    pub app_key: String,
}

impl LightIdentity {
    /// A bridge was paired before
    pub fn is_paired(&self) -> bool {
        !self.app_key.trim().is_empty()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Background music and sound effects enabled
    pub sound_on: bool,
    /// Smart-light pairing
    pub light: LightIdentity,
    /// Bulbs that receive balloon colors
    pub bulbs: Vec<Bulb>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            light: LightIdentity::default(),
            bulbs: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a store. Missing or blank keys keep their defaults.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut settings = Self::default();

        if let Some(status) = non_blank(store, keys::SOUND_STATUS) {
            settings.sound_on = status == "On";
        }
        if let Some(name) = non_blank(store, keys::DEVICE_NAME) {
            settings.light.device_name = name;
        }
        if let Some(key) = non_blank(store, keys::HUE_APP_KEY) {
            settings.light.app_key = key;
        }
        if let Some(bulbs) = non_blank(store, keys::HUE_CONNECTED_BULBS) {
            settings.bulbs = parse_bulbs(&bulbs);
        }

        log::info!(
            "Settings loaded (sound {}, {} bulbs)",
            if settings.sound_on { "on" } else { "off" },
            settings.bulbs.len()
        );
        settings
    }

    /// Save settings to a store
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), StoreError> {
        store.set_setting(keys::SOUND_STATUS, self.sound_status())?;
        store.set_setting(keys::DEVICE_NAME, &self.light.device_name)?;
        store.set_setting(keys::HUE_APP_KEY, &self.light.app_key)?;
        store.set_setting(keys::HUE_CONNECTED_BULBS, &format_bulbs(&self.bulbs))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// "On" / "Off", the stored form of `sound_on`
    pub fn sound_status(&self) -> &'static str {
        if self.sound_on { "On" } else { "Off" }
    }
}

fn non_blank(store: &dyn SettingsStore, key: &str) -> Option<String> {
    store.get_setting(key).filter(|v| !v.trim().is_empty())
}
