//! Flight state types
//!
//! Everything the frame update mutates lives here. Owned exclusively by
//! [`super::FlightSession`]; renderers and collaborators get copies.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// Current phase of a flight cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightPhase {
    /// Balloon resting on the ground, waiting for a launch
    Idle,
    /// Balloon airborne
    InFlight,
    /// Pop animation running; a new balloon spawns when it ends
    Exploding { remaining: f32 },
}

/// Balloon color as an "r, g, b" identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalloonColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BalloonColor {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for BalloonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

impl FromStr for BalloonColor {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split(',').map(|p| p.trim().parse::<u8>()).collect();
        match parts.as_slice() {
            [Ok(r), Ok(g), Ok(b)] => Ok(Self::new(*r, *g, *b)),
            _ => Err(GameError::Color(s.to_string())),
        }
    }
}

/// The live balloon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalloonState {
    pub pos: Vec2,
    /// x: horizontal velocity, y: vertical velocity (px/ms)
    pub vel: Vec2,
    /// Vertical velocity for the step being integrated
    pub new_vy: f32,
    pub launched: bool,
    /// A move was seen after a swipe started on the balloon
    pub moved: bool,
    /// Set at launch, cleared by the first flight frame
    pub just_launched: bool,
    pub color: BalloonColor,
    pub opacity: u8,
    pub size: Vec2,
}

impl BalloonState {
    /// Fresh balloon resting at the bottom center of the layer
    pub fn spawn(layer: Vec2, size: Vec2, color: BalloonColor) -> Self {
        Self {
            pos: Vec2::new((layer.x / 2.0).trunc() + BALLOON_SPAWN_OFFSET_X, 0.0),
            vel: Vec2::ZERO,
            new_vy: 0.0,
            launched: false,
            moved: false,
            just_launched: false,
            color,
            opacity: BALLOON_OPACITY,
            size,
        }
    }

    /// Put the balloon in flight with an initial velocity
    pub fn launch(&mut self, vel: Vec2) {
        self.vel = vel;
        self.new_vy = vel.y;
        self.launched = true;
        self.just_launched = true;
    }

    /// Bounding box (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        crate::bounding_box(self.pos, self.size)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = self.bounds();
        crate::box_contains(min, max, point)
    }
}

/// Pressure reading from a force-touch display
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TouchForceState {
    force: f32,
}

impl TouchForceState {
    /// Force already popped the balloon
    pub const TRIGGERED: f32 = -1.0;

    pub fn value(&self) -> f32 {
        self.force
    }

    /// Store a sample. Anything below 1 reads as idle.
    pub fn set(&mut self, force: f32) {
        self.force = if force >= 1.0 { force } else { 0.0 };
    }

    pub fn mark_triggered(&mut self) {
        self.force = Self::TRIGGERED;
    }

    pub fn is_triggered(&self) -> bool {
        self.force == Self::TRIGGERED
    }

    pub fn reset(&mut self) {
        self.force = 0.0;
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
