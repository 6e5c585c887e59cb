//! Wind state machine
//!
//! Wind is either calm or blowing left/right at 5..=9. Every change redraws
//! the speed until it differs from the current one, truncates weak draws to
//! calm, and picks a direction that favors blowing left two to one.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::motion::{Easing, MotionKind, MotionScript, MotionStep, MotionTarget};

/// Observable wind phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindPhase {
    Calm,
    Blowing { right: bool, speed: u8 },
}

/// Result of a change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindChange {
    Changed(WindPhase),
    /// Draw cap hit without a new speed; wind left as it was
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindState {
    /// 0 (calm) or 5..=9
    pub speed: u8,
    pub blowing_right: bool,
    /// Set by a change until decorative motion has been dispatched
    pub changed: bool,
    /// Glide value (speed * 1.4) of the last blowing wind, for wind-down animations
    pub previous_speed: f32,
}

impl Default for WindState {
    fn default() -> Self {
        Self {
            speed: 0,
            blowing_right: true,
            changed: false,
            previous_speed: 0.0,
        }
    }
}

impl WindState {
    pub fn blowing(speed: u8, right: bool) -> Self {
        Self {
            speed,
            blowing_right: right,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> WindPhase {
        if self.speed == 0 {
            WindPhase::Calm
        } else {
            WindPhase::Blowing {
                right: self.blowing_right,
                speed: self.speed,
            }
        }
    }

    /// +1 blowing right, -1 blowing left
    pub fn direction_sign(&self) -> f32 {
        if self.blowing_right { 1.0 } else { -1.0 }
    }

    pub fn speed_f32(&self) -> f32 {
        f32::from(self.speed)
    }

    /// Draw a new wind. Never settles on the current speed.
    pub fn change(&mut self, rng: &mut impl Rng) -> WindChange {
        let draws = std::iter::repeat_with(|| rng.random_range(0..=MAX_WIND_SPEED));
        let Some(candidate) = first_distinct(self.speed, draws) else {
            log::warn!(
                "Wind draw gave {} {} times in a row, keeping current wind",
                self.speed,
                MAX_WIND_DRAWS
            );
            return WindChange::Unchanged;
        };

        if candidate < MIN_BLOWING_WIND_SPEED {
            self.speed = 0;
        } else {
            self.speed = candidate;
            self.blowing_right = rng.random_range(1..=3) > 2;
        }
        self.changed = true;

        log::debug!("Wind changed: {:?}", self.phase());
        WindChange::Changed(self.phase())
    }

    /// Force calm
    pub fn stop(&mut self) {
        self.speed = 0;
        self.changed = true;
    }

    /// Consume the `changed` flag, producing boat and cloud motion for it
    pub fn take_decor_motion(&mut self, layer: Vec2) -> Vec<MotionScript> {
        if !std::mem::take(&mut self.changed) {
            return Vec::new();
        }

        if self.speed > 0 {
            let motions = vec![self.boat_drift(layer), self.clouds_drift(layer)];
            self.previous_speed = self.speed_f32() * 1.4;
            motions
        } else if self.previous_speed > 0.0 {
            vec![self.boat_glide(layer), self.clouds_glide()]
        } else {
            Vec::new()
        }
    }

    fn boat_drift(&self, layer: Vec2) -> MotionScript {
        let crossing = self.speed_f32() * 1.4;
        let (target, reset) = if self.blowing_right {
            (layer.x + BOAT_WIDTH, -BOAT_WIDTH)
        } else {
            (-BOAT_WIDTH, layer.x + BOAT_WIDTH)
        };
        MotionScript::new(MotionTarget::Boat)
            .replacing()
            .then(MotionStep::new(crossing, MotionKind::MoveToX(target)).eased(Easing::SineIn))
            .repeat(vec![
                MotionStep::new(0.0, MotionKind::PlaceX(reset)),
                MotionStep::new(crossing, MotionKind::MoveToX(target)),
            ])
    }

    fn clouds_drift(&self, layer: Vec2) -> MotionScript {
        let crossing = self.speed_f32() * 3.0;
        let (target, reset) = if self.blowing_right {
            (layer.x + CLOUD_OFFSCREEN, -CLOUD_OFFSCREEN)
        } else {
            (-CLOUD_OFFSCREEN, layer.x + CLOUD_OFFSCREEN)
        };
        MotionScript::new(MotionTarget::Clouds)
            .replacing()
            .then(MotionStep::new(crossing, MotionKind::MoveToX(target)).eased(Easing::SineIn))
            .repeat(vec![
                MotionStep::new(crossing, MotionKind::MoveToX(target)),
                MotionStep::new(0.0, MotionKind::PlaceX(reset)),
            ])
    }

    fn glide_offset(&self) -> Vec2 {
        Vec2::new(self.direction_sign() * self.previous_speed * 7.0, 0.0)
    }

    fn boat_glide(&self, layer: Vec2) -> MotionScript {
        let offset = self.glide_offset();
        let wrap = if self.blowing_right {
            MotionKind::WrapX { limit: layer.x + BOAT_WIDTH, to: -BOAT_WIDTH, rightward: true }
        } else {
            MotionKind::WrapX { limit: -BOAT_WIDTH, to: layer.x + BOAT_WIDTH, rightward: false }
        };
        MotionScript::new(MotionTarget::Boat)
            .replacing()
            .then(MotionStep::new(self.previous_speed * 1.2, MotionKind::MoveBy(offset)).eased(Easing::SineOut))
            .then(MotionStep::new(0.0, wrap))
            .then(MotionStep::new(self.previous_speed * 1.4, MotionKind::MoveBy(offset)).eased(Easing::SineOut))
    }

    fn clouds_glide(&self) -> MotionScript {
        MotionScript::new(MotionTarget::Clouds)
            .replacing()
            .then(MotionStep::new(self.previous_speed * 1.2, MotionKind::MoveBy(self.glide_offset())).eased(Easing::SineOut))
    }
}

/// First draw that differs from `current`, giving up after `MAX_WIND_DRAWS`
fn first_distinct(current: u8, draws: impl IntoIterator<Item = u8>) -> Option<u8> {
    draws
        .into_iter()
        .take(MAX_WIND_DRAWS as usize)
        .find(|&c| c != current)
}
