//! Platform abstraction layer
//!
//! The flight engine never talks to the OS, the UI toolkit or a light bridge
//! directly. Everything outside the physics is reached through these traits,
//! implemented by the embedding app:
//! - Persisted key-value settings
//! - Menu chrome visibility
//! - Audio playback
//! - Achievement / share flow
//! - Smart lights
//! - The renderer (motion scripts and scene changes)

use serde::{Deserialize, Serialize};

use crate::effects::SceneChange;
use crate::error::{LightError, StoreError};
use crate::motion::MotionScript;

/// Menu chrome visibility requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuState {
    Show,
    Hide,
    Collapse,
}

impl MenuState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuState::Show => "Show",
            MenuState::Hide => "Hide",
            MenuState::Collapse => "Collapse",
        }
    }
}

/// Audio transport actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundAction {
    Play,
    Stop,
    Pause,
    Resume,
}

impl SoundAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundAction::Play => "Play",
            SoundAction::Stop => "Stop",
            SoundAction::Pause => "Pause",
            SoundAction::Resume => "Resume",
        }
    }
}

/// Persisted key-value store
pub trait SettingsStore {
    fn get_setting(&self, key: &str) -> Option<String>;
    fn set_setting(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// UI chrome
pub trait MenuControl {
    fn control_menu(&mut self, state: MenuState);
}

/// Audio playback
pub trait SoundControl {
    /// `file_name` is empty for the background track
    fn control_sound(&mut self, background: bool, file_name: &str, action: SoundAction, volume: f32);
}

/// Platform alert / share flow for a new best time
pub trait AchievementNotifier {
    fn notify_achievement(&mut self, best_time: &str);
}

/// Scene graph: plays motion scripts and applies sprite changes
pub trait SceneRenderer {
    fn play_motion(&mut self, script: &MotionScript);
    fn apply_scene(&mut self, change: &SceneChange);
}

/// Smart-light bulbs. Implementations must not block for long; the
/// [`crate::effects::LightWorker`] runs them off the frame thread.
pub trait SmartLight: Send {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<(), LightError>;
    fn flash(&mut self) -> Result<(), LightError>;
}

/// Stand-in light used when no bridge is paired
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLight;

impl SmartLight for NoLight {
    fn set_color(&mut self, _r: u8, _g: u8, _b: u8) -> Result<(), LightError> {
        Err(LightError::NotConnected)
    }

    fn flash(&mut self) -> Result<(), LightError> {
        Err(LightError::NotConnected)
    }
}
