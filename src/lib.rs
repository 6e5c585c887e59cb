//! Balloon Drift - launch a balloon and keep it aloft
//!
//! Core modules:
//! - `sim`: Flight and session engine (input, integrator, exit detection, wind, stopwatch)
//! - `motion`: Declarative motion scripts the renderer plays back
//! - `effects`: Outbound command queue and the background light worker
//! - `platform`: Collaborator traits (menu, sound, settings, lights, achievements)
//! - `persistence`: Key-value settings stores
//! - `settings` / `records`: Typed preferences and the best-time record
//! - `audio` / `lights`: Sound cues and smart-light control

pub mod audio;
pub mod config;
pub mod effects;
pub mod error;
pub mod lights;
pub mod motion;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use error::{ErrorLog, GameError};
pub use records::BestTime;
pub use settings::Settings;
pub use sim::FlightSession;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Gravity used by the velocity-squared position update
    pub const GAME_GRAVITY: f32 = 0.000_050;
    /// Nominal frame time for headless runs (seconds)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Seconds idle on the ground before the balloon nudges the player
    pub const REMINDER_ALERT_DURATION: f64 = 30.0;
    /// Seconds of flight between wind changes
    pub const GAME_VARIATION_FREQUENCY: f32 = 30.0;
    /// Force-touch launch divisor: vy = (force / K) * 2
    pub const INVERSE_FORCETOUCH_LAUNCH_VELOCITY_CONSTANT: f32 = 25.0;

    pub const BACKGROUND_MUSIC_VOLUME: f32 = 0.5;
    pub const SOUND_EFFECT_VOLUME: f32 = 1.0;
    pub const BALLOON_TAP_SOUND_FILE: &str = "BalloonTap.mp3";
    pub const BALLOON_POP_SOUND_FILE: &str = "BalloonPop.mp3";

    /// Opacity of a freshly spawned balloon
    pub const BALLOON_OPACITY: u8 = 200;
    /// Horizontal offset from layer center where balloons spawn
    pub const BALLOON_SPAWN_OFFSET_X: f32 = 3.0;
    /// Default balloon sprite size
    pub const BALLOON_WIDTH: f32 = 64.0;
    pub const BALLOON_HEIGHT: f32 = 80.0;

    /// Duration of the pop animation before a new balloon spawns
    pub const EXPLOSION_DURATION: f32 = 0.6;
    /// Force at or above which the launch wobble plays
    pub const WOBBLE_FORCE_THRESHOLD: f32 = 4.0;

    /// Wind speeds are drawn from 0..=MAX_WIND_SPEED
    pub const MAX_WIND_SPEED: u8 = 9;
    /// Drawn speeds below this are truncated to calm
    pub const MIN_BLOWING_WIND_SPEED: u8 = 5;
    /// Cap on rejection-sampling draws per wind change
    pub const MAX_WIND_DRAWS: u32 = 64;

    /// In-flight tap nudges
    pub const TAP_NUDGE_VX: f32 = 0.05;
    pub const TAP_NUDGE_VY: f32 = 0.06;
    pub const TAP_NUDGE_MARGIN: f32 = 30.0;

    /// Decorative boat width, used to park it just off screen
    pub const BOAT_WIDTH: f32 = 60.0;
    /// How far past the layer edge the clouds drift before wrapping
    pub const CLOUD_OFFSCREEN: f32 = 350.0;

    /// Top-left corner (px) that toggles the debug overlay on a hard press
    pub const DEBUG_CORNER_SIZE: f32 = 45.0;
}

/// Axis-aligned bounding box of a sprite centered on `center`
#[inline]
pub fn bounding_box(center: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let half = size * 0.5;
    (center - half, center + half)
}

/// Inclusive point-in-box test
#[inline]
pub fn box_contains(min: Vec2, max: Vec2, point: Vec2) -> bool {
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Round to two decimals for display
#[inline]
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
