//! Smart-light feedback
//!
//! The session only ever asks for two things: paint the room in the
//! popped balloon's color, and flash on an in-flight tap.
//! Commands are plain values so they can be shipped to the light worker
//! thread and replayed against any [`SmartLight`] implementation.

use serde::{Deserialize, Serialize};

use crate::error::LightError;
use crate::platform::SmartLight;

/// A bulb selected to receive colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bulb {
    pub id: String,
    pub name: String,
}

/// Parse the stored bulb list, `id=name|id=name`. Malformed pairs are skipped.
pub fn parse_bulbs(stored: &str) -> Vec<Bulb> {
    stored
        .split('|')
        .filter_map(|pair| {
            let (id, name) = pair.split_once('=')?;
            let id = id.trim();
            if id.is_empty() {
                return None;
            }
            Some(Bulb {
                id: id.to_string(),
                name: name.trim().to_string(),
            })
        })
        .collect()
}

/// Inverse of [`parse_bulbs`]
pub fn format_bulbs(bulbs: &[Bulb]) -> String {
    bulbs
        .iter()
        .map(|b| format!("{}={}", b.id, b.name))
        .collect::<Vec<_>>()
        .join("|")
}

/// One outbound light request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightCommand {
    SetColor { r: u8, g: u8, b: u8 },
    Flash,
}

impl LightCommand {
    /// Run the command against a light
    pub fn apply(self, light: &mut dyn SmartLight) -> Result<(), LightError> {
        match self {
            LightCommand::SetColor { r, g, b } => light.set_color(r, g, b),
            LightCommand::Flash => light.flash(),
        }
    }
}
