//! Input interpretation
//!
//! Two launch styles, picked by what the display supports:
//! - Swipe: velocity is swipe displacement over swipe duration, px/ms per axis
//! - Pressure: a firm press launches straight up, harder presses go higher
//!
//! Once airborne, taps next to the balloon nudge it away from the finger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::InputError;

/// Launch input style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Swipe,
    Pressure,
}

impl InputMode {
    pub fn for_device(force_touch_available: bool) -> Self {
        if force_touch_available {
            InputMode::Pressure
        } else {
            InputMode::Swipe
        }
    }
}

/// A touch location with the driver's timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub pos: Vec2,
    /// Milliseconds, any monotonic origin
    pub time_ms: f64,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            pos: Vec2::new(x, y),
            time_ms,
        }
    }
}

/// Swipe in progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwipeTracker {
    start: Option<TouchPoint>,
}

impl SwipeTracker {
    pub fn begin(&mut self, at: TouchPoint) {
        self.start = Some(at);
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Finish the swipe, producing a launch velocity
    pub fn finish(&mut self, end: TouchPoint) -> Option<Result<Vec2, InputError>> {
        self.start.take().map(|start| swipe_velocity(start, end))
    }

    pub fn clear(&mut self) {
        self.start = None;
    }
}

/// (end - start) / duration, per axis
pub fn swipe_velocity(start: TouchPoint, end: TouchPoint) -> Result<Vec2, InputError> {
    let duration_ms = end.time_ms - start.time_ms;
    if !(duration_ms > 0.0) {
        return Err(InputError::NonPositiveSwipeDuration { duration_ms });
    }
    let delta = (end.pos - start.pos).as_dvec2() / duration_ms;
    Ok(delta.as_vec2())
}

/// Straight-up launch from a press: vy = (force / K) * 2
pub fn pressure_velocity(force: f32) -> Vec2 {
    Vec2::new(0.0, force / INVERSE_FORCETOUCH_LAUNCH_VELOCITY_CONSTANT * 2.0)
}

/// Force has reached the device maximum and should pop the balloon
pub fn force_pops(force: f32, max_force: f32) -> bool {
    force >= max_force.floor()
}

/// Velocity change from an in-flight tap
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Nudge {
    /// Added to vx
    pub dvx: f32,
    /// Replaces vy (and the pending vy)
    pub vy: Option<f32>,
}

impl Nudge {
    pub fn is_hit(&self) -> bool {
        self.dvx != 0.0 || self.vy.is_some()
    }
}

/// Taps just beside the balloon push it away from the finger
pub fn tap_nudge(balloon_pos: Vec2, balloon_size: Vec2, tap: Vec2) -> Nudge {
    let reach = balloon_size / 2.0 + Vec2::splat(TAP_NUDGE_MARGIN);
    let mut nudge = Nudge::default();

    if tap.x > 0.0 && tap.x < balloon_pos.x && tap.x > balloon_pos.x - reach.x {
        nudge.dvx = TAP_NUDGE_VX;
    } else if tap.x > 0.0 && tap.x > balloon_pos.x && tap.x < balloon_pos.x + reach.x {
        nudge.dvx = -TAP_NUDGE_VX;
    }

    if tap.y > 0.0 && tap.y < balloon_pos.y && tap.y > balloon_pos.y - reach.y {
        nudge.vy = Some(TAP_NUDGE_VY);
    } else if tap.y > 0.0 && tap.y > balloon_pos.y && tap.y < balloon_pos.y + reach.y {
        nudge.vy = Some(-TAP_NUDGE_VY);
    }

    nudge
}

/// Hard press in the top-left corner toggles the debug overlay
pub fn in_debug_corner(tap: Vec2, layer: Vec2) -> bool {
    tap.x >= 0.0 && tap.x <= DEBUG_CORNER_SIZE && tap.y >= layer.y - DEBUG_CORNER_SIZE && tap.y <= layer.y
}
