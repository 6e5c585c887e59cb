//! Declarative motion scripts
//!
//! The engine describes what a sprite should do (move, scale, rotate, in
//! order, with easing) and the renderer plays it back. A script may repeat
//! forever and may name a hook to fire when it finishes, so the renderer can
//! update a label without the physics holding a closure into scene state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Scene element a script drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionTarget {
    Balloon,
    Explosion,
    Stopwatch,
    BestTime,
    Boat,
    Clouds,
}

/// Tween curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    SineIn,
    SineOut,
}

impl Easing {
    /// Map progress `t` in [0, 1] through the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            // Rate 1 ease in/out is linear
            Easing::EaseIn | Easing::EaseOut => t,
            Easing::SineIn => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            Easing::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
        }
    }
}

/// What a single step does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionKind {
    MoveBy(Vec2),
    /// Move horizontally to an absolute x, keeping y
    MoveToX(f32),
    /// Instantly set the x coordinate (used to wrap drifting sprites)
    PlaceX(f32),
    /// Instantly jump to `to` if x has passed `limit` in the drift direction
    WrapX { limit: f32, to: f32, rightward: bool },
    ScaleTo(f32),
    RotateBy(f32),
    RotateTo(f32),
    /// Hold position
    Wait,
}

/// One timed sub-action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionStep {
    pub duration: f32,
    pub kind: MotionKind,
    pub easing: Easing,
}

impl MotionStep {
    pub fn new(duration: f32, kind: MotionKind) -> Self {
        Self {
            duration,
            kind,
            easing: Easing::Linear,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Notification the renderer raises when a script completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionHook {
    /// Write this text into the best-time label
    ShowBestTime(String),
    /// Zero the stopwatch label
    ResetStopwatch,
    /// Hide the explosion sprite
    HideExplosion,
}

/// Ordered list of steps, optionally looping, with a completion hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionScript {
    pub target: MotionTarget,
    /// Steps played once before `looped`
    pub intro: Vec<MotionStep>,
    /// Steps repeated forever after the intro (empty: play once)
    pub looped: Vec<MotionStep>,
    /// Stop whatever the target is doing first
    pub replace: bool,
    /// Fired after the intro when nothing loops
    pub on_complete: Option<MotionHook>,
}

impl MotionScript {
    pub fn new(target: MotionTarget) -> Self {
        Self {
            target,
            intro: Vec::new(),
            looped: Vec::new(),
            replace: false,
            on_complete: None,
        }
    }

    pub fn then(mut self, step: MotionStep) -> Self {
        self.intro.push(step);
        self
    }

    pub fn repeat(mut self, steps: Vec<MotionStep>) -> Self {
        self.looped = steps;
        self
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    pub fn on_complete(mut self, hook: MotionHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    /// Seconds until the intro finishes
    pub fn intro_duration(&self) -> f32 {
        self.intro.iter().map(|s| s.duration).sum()
    }

    pub fn is_looping(&self) -> bool {
        !self.looped.is_empty()
    }

    /// Scale pop shown when a balloon appears or is touched
    pub fn scale_pulse(target: MotionTarget) -> Self {
        Self::new(target)
            .then(MotionStep::new(0.10, MotionKind::ScaleTo(1.5)))
            .then(MotionStep::new(0.10, MotionKind::ScaleTo(1.0)))
    }

    /// Two pulses, nudging an idle player
    pub fn reminder() -> Self {
        let pulse = Self::scale_pulse(MotionTarget::Balloon);
        let mut script = pulse.clone();
        script.intro.extend(pulse.intro);
        script
    }

    /// Scale the balloon to `scale` over `duration`
    pub fn scale_to(target: MotionTarget, duration: f32, scale: f32) -> Self {
        Self::new(target).then(MotionStep::new(duration, MotionKind::ScaleTo(scale)))
    }

    /// Rocking wobble after a hard force-touch launch
    pub fn launch_wobble() -> Self {
        let back = MotionStep::new(0.12, MotionKind::RotateBy(-20.0));
        let forth = MotionStep::new(0.12, MotionKind::RotateBy(20.0));
        let back_fast = MotionStep::new(0.06, MotionKind::RotateBy(-10.0));
        let forth_fast = MotionStep::new(0.06, MotionKind::RotateBy(10.0));
        Self::new(MotionTarget::Balloon)
            .then(back)
            .then(forth)
            .then(forth)
            .then(back)
            .then(back_fast)
            .then(forth_fast)
            .then(forth_fast)
            .then(MotionStep::new(0.25, MotionKind::RotateTo(0.0)))
    }

    /// Horizontal shake of a label, with a hook at the end
    pub fn shake(target: MotionTarget, hook: MotionHook) -> Self {
        Self::new(target)
            .then(MotionStep::new(0.05, MotionKind::MoveBy(Vec2::new(15.0, 0.0))).eased(Easing::EaseIn))
            .then(MotionStep::new(0.05, MotionKind::MoveBy(Vec2::new(-30.0, 0.0))).eased(Easing::EaseOut))
            .then(MotionStep::new(0.10, MotionKind::MoveBy(Vec2::new(30.0, 0.0))).eased(Easing::EaseIn))
            .then(MotionStep::new(0.10, MotionKind::MoveBy(Vec2::new(-15.0, 0.0))).eased(Easing::EaseOut))
            .on_complete(hook)
    }

    /// Burst at the pop location
    pub fn explosion(duration: f32) -> Self {
        Self::new(MotionTarget::Explosion)
            .then(MotionStep::new(duration, MotionKind::ScaleTo(100.0)))
            .then(MotionStep::new(0.1, MotionKind::ScaleTo(1.0)))
            .on_complete(MotionHook::HideExplosion)
    }
}
