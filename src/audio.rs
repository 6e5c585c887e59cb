//! Audio cues
//!
//! The engine doesn't decode or mix anything. It decides which cue should
//! play and hands a [`SoundCommand`] to the platform's audio collaborator.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::{SoundAction, SoundControl};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// In-flight tap nudged the balloon
    BalloonTap,
    /// Balloon popped
    BalloonPop,
}

impl SoundEffect {
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::BalloonTap => BALLOON_TAP_SOUND_FILE,
            SoundEffect::BalloonPop => BALLOON_POP_SOUND_FILE,
        }
    }
}

/// A request for the audio collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundCommand {
    pub background: bool,
    pub file_name: String,
    pub action: SoundAction,
    pub volume: f32,
}

impl SoundCommand {
    pub fn dispatch(&self, sink: &mut dyn SoundControl) {
        sink.control_sound(self.background, &self.file_name, self.action, self.volume);
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    sound_on: bool,
    music_volume: f32,
    sfx_volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AudioManager {
    pub fn new(sound_on: bool) -> Self {
        Self {
            sound_on,
            music_volume: BACKGROUND_MUSIC_VOLUME,
            sfx_volume: SOUND_EFFECT_VOLUME,
        }
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn set_sound_on(&mut self, on: bool) {
        self.sound_on = on;
    }

    /// Background track transport. `None` when sound is off.
    pub fn music(&self, action: SoundAction) -> Option<SoundCommand> {
        self.sound_on.then(|| SoundCommand {
            background: true,
            file_name: String::new(),
            action,
            volume: self.music_volume,
        })
    }

    /// Play a one-shot effect. `None` when sound is off.
    pub fn effect(&self, effect: SoundEffect) -> Option<SoundCommand> {
        self.sound_on.then(|| SoundCommand {
            background: false,
            file_name: effect.file_name().to_string(),
            action: SoundAction::Play,
            volume: self.sfx_volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_uses_background_volume() {
        let audio = AudioManager::new(true);
        let cmd = audio.music(SoundAction::Play).unwrap();
        assert!(cmd.background);
        assert!(cmd.file_name.is_empty());
        assert_eq!(cmd.volume, BACKGROUND_MUSIC_VOLUME);
    }

    #[test]
    fn test_pop_effect() {
        let audio = AudioManager::new(true);
        let cmd = audio.effect(SoundEffect::BalloonPop).unwrap();
        assert!(!cmd.background);
        assert_eq!(cmd.file_name, "BalloonPop.mp3");
        assert_eq!(cmd.action, SoundAction::Play);
    }

    #[test]
    fn test_sound_off_is_silent() {
        let mut audio = AudioManager::new(true);
        audio.set_sound_on(false);
        assert!(audio.music(SoundAction::Stop).is_none());
        assert!(audio.effect(SoundEffect::BalloonTap).is_none());
    }
}
