//! Session configuration
//!
//! Supplied once when the frame driver builds a [`crate::FlightSession`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StoreError;

/// Layer and device configuration for a flight session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Layer width in points
    pub layer_width: f32,
    /// Layer height in points
    pub layer_height: f32,
    /// Balloon sprite size
    pub balloon_width: f32,
    pub balloon_height: f32,
    /// Pressure-sensitive input available (selects pressure mode over swipe)
    pub force_touch_available: bool,
    /// RNG seed for wind and balloon colors
    pub seed: u64,
    /// Balloon palette, as "r, g, b" identifiers
    pub balloon_colors: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layer_width: 320.0,
            layer_height: 480.0,
            balloon_width: BALLOON_WIDTH,
            balloon_height: BALLOON_HEIGHT,
            force_touch_available: false,
            seed: 0x5eed,
            balloon_colors: vec![
                "255, 59, 48".into(),
                "255, 149, 0".into(),
                "255, 204, 0".into(),
                "76, 217, 100".into(),
                "90, 200, 250".into(),
                "0, 122, 255".into(),
                "88, 86, 214".into(),
                "255, 45, 85".into(),
            ],
        }
    }
}

impl GameConfig {
    pub fn layer_size(&self) -> Vec2 {
        Vec2::new(self.layer_width, self.layer_height)
    }

    pub fn balloon_size(&self) -> Vec2 {
        Vec2::new(self.balloon_width, self.balloon_height)
    }

    /// Parse from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {} ({}x{}, force touch: {})",
            path.display(),
            config.layer_width,
            config.layer_height,
            config.force_touch_available
        );
        Ok(config)
    }
}
