//! Flight session
//!
//! One `FlightSession` per game layer, owned by the frame driver. It holds
//! every piece of mutable flight state and is the only writer to it. The
//! frame update lives in `tick.rs`; this file covers construction, touch
//! input, and handing queued effects to collaborators.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::input::{self, InputMode, SwipeTracker, TouchPoint};
use super::state::{BalloonColor, BalloonState, FlightPhase, RngState, TouchForceState};
use super::timer::SessionTimer;
use super::wind::{WindChange, WindState};
use crate::audio::{AudioManager, SoundEffect};
use crate::config::GameConfig;
use crate::consts::*;
use crate::effects::{self, Collaborators, Command, EffectQueue, SceneChange};
use crate::error::{ErrorLog, InputError};
use crate::lights::LightCommand;
use crate::motion::{MotionScript, MotionTarget};
use crate::platform::{MenuState, SettingsStore, SoundAction};
use crate::records::BestTime;
use crate::settings::Settings;
use crate::round2;

/// Flight & session controller
pub struct FlightSession {
    pub(super) layer: Vec2,
    pub(super) mode: InputMode,
    pub(super) palette: Vec<BalloonColor>,

    pub(super) balloon: BalloonState,
    pub(super) phase: FlightPhase,
    pub(super) wind: WindState,
    pub(super) force: TouchForceState,
    pub(super) swipe: SwipeTracker,
    pub(super) last_touch: Option<Vec2>,

    pub(super) timer: SessionTimer,
    pub(super) best: BestTime,

    /// Session clock, seconds of frame time since construction
    pub(super) clock: f64,
    /// Flight seconds since the last wind change
    pub(super) wind_clock: f32,

    pub(super) paused: bool,
    pub(super) debug_overlay: bool,
    pub(super) audio: AudioManager,
    pub(super) rng: Pcg32,
    pub(super) queue: EffectQueue,
    pub(super) errors: ErrorLog,
    pub(super) pops: u64,
}

impl FlightSession {
    /// Build a session and spawn the first balloon
    pub fn new(config: &GameConfig, settings: &Settings, best: BestTime) -> Self {
        let mut errors = ErrorLog::new();
        let mut palette = Vec::with_capacity(config.balloon_colors.len());
        for id in &config.balloon_colors {
            match id.parse::<BalloonColor>() {
                Ok(color) => palette.push(color),
                Err(e) => errors.record(0.0, e),
            }
        }
        if palette.is_empty() {
            palette.push(BalloonColor::WHITE);
        }

        let mut rng = RngState::new(config.seed).to_rng();
        let color = pick_color(&palette, None, &mut rng);
        let layer = config.layer_size();

        let mut session = Self {
            layer,
            mode: InputMode::for_device(config.force_touch_available),
            palette,
            balloon: BalloonState::spawn(layer, config.balloon_size(), color),
            phase: FlightPhase::Idle,
            wind: WindState::default(),
            force: TouchForceState::default(),
            swipe: SwipeTracker::default(),
            last_touch: None,
            timer: SessionTimer::new(0.0),
            best,
            clock: 0.0,
            wind_clock: 0.0,
            paused: false,
            debug_overlay: false,
            audio: AudioManager::new(settings.sound_on),
            rng,
            queue: EffectQueue::new(),
            errors,
            pops: 0,
        };
        session.announce_balloon();
        session.queue.push(Command::Menu(MenuState::Show));

        log::info!(
            "Flight session ready ({}x{}, {:?} input, best {})",
            layer.x,
            layer.y,
            session.mode,
            session.best.time
        );
        session
    }

    /// Build from persisted settings and best time
    pub fn from_store(config: &GameConfig, store: &dyn SettingsStore) -> Self {
        Self::new(config, &Settings::load(store), BestTime::load(store))
    }

    // --- Accessors ---

    pub fn balloon(&self) -> &BalloonState {
        &self.balloon
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn wind(&self) -> &WindState {
        &self.wind
    }

    pub fn touch_force(&self) -> TouchForceState {
        self.force
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn best_time(&self) -> BestTime {
        self.best
    }

    pub fn input_mode(&self) -> InputMode {
        self.mode
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.errors
    }

    /// Balloons popped so far
    pub fn pop_count(&self) -> u64 {
        self.pops
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Commands waiting for dispatch
    pub fn pending(&self) -> &EffectQueue {
        &self.queue
    }

    pub fn drain_commands(&mut self) -> Vec<Command> {
        self.queue.drain().collect()
    }

    /// Deliver queued commands to collaborators. Failures go to the error log.
    pub fn dispatch(&mut self, collab: &mut Collaborators<'_>) {
        effects::dispatch(self.queue.drain(), collab, &mut self.errors, self.clock);
    }

    // --- UI-driven state ---

    /// Pause or resume the game loop
    pub fn set_paused(&mut self, paused: bool) {
        if paused && !self.paused && self.phase == FlightPhase::InFlight {
            self.queue.sound(self.audio.music(SoundAction::Pause));
        }
        self.paused = paused;
    }

    pub fn set_sound_on(&mut self, on: bool) {
        if !on {
            self.queue.sound(self.audio.music(SoundAction::Stop));
        }
        self.audio.set_sound_on(on);
    }

    /// Force calm (used on some menu transitions)
    pub fn stop_wind(&mut self) {
        self.wind.stop();
        self.dispatch_wind_motion();
    }

    pub fn toggle_debug_overlay(&mut self) {
        self.debug_overlay = !self.debug_overlay;
        let text = self.debug_overlay.then(|| self.debug_snapshot().to_string());
        self.queue.scene(SceneChange::DebugOverlay(text));
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            wind_speed: self.wind.speed,
            blowing_right: self.wind.blowing_right,
            pos: self.balloon.pos,
            vel: self.balloon.vel,
            last_touch: self.last_touch.unwrap_or(Vec2::ZERO),
            force: self.force.value(),
        }
    }

    // --- Touch input ---

    pub fn touch_began(&mut self, at: TouchPoint) {
        if self.paused {
            return;
        }
        if !self.balloon.launched {
            self.last_touch = None;
        }
        if self.mode != InputMode::Swipe || self.phase != FlightPhase::Idle {
            return;
        }

        // Every touch-down starts a new gesture
        self.swipe.clear();
        self.balloon.moved = false;
        if self.balloon.contains(at.pos) {
            self.swipe.begin(at);
            self.queue.motion(MotionScript::scale_to(MotionTarget::Balloon, 0.10, 1.5));
        }
    }

    pub fn touch_moved(&mut self, _at: TouchPoint) {
        if self.paused {
            return;
        }
        if self.mode == InputMode::Swipe && self.swipe.is_active() {
            self.balloon.moved = true;
        }
    }

    pub fn touch_ended(&mut self, at: TouchPoint) {
        if self.paused {
            self.queue.push(Command::Menu(MenuState::Collapse));
            self.queue.sound(self.audio.music(SoundAction::Resume));
            self.paused = false;
            return;
        }

        if self.balloon.launched {
            self.last_touch = Some(at.pos);
        } else {
            self.queue.motion(MotionScript::scale_to(MotionTarget::Balloon, 0.25, 1.0));
        }

        let idle = self.phase == FlightPhase::Idle;
        let force = self.force.value();

        if self.mode == InputMode::Swipe && idle && self.balloon.moved && self.swipe.is_active() {
            match self.swipe.finish(at) {
                Some(Ok(vel)) => self.launch(vel),
                Some(Err(e)) => self.errors.record(self.clock, e),
                None => {}
            }
        } else if self.mode == InputMode::Pressure && idle && force >= 1.0 && self.balloon.contains(at.pos) {
            self.launch(input::pressure_velocity(force));
        } else if self.mode == InputMode::Pressure
            && idle
            && force >= WOBBLE_FORCE_THRESHOLD
            && input::in_debug_corner(at.pos, self.layer)
        {
            self.toggle_debug_overlay();
        } else if self.phase == FlightPhase::InFlight {
            self.nudge();
        }

        // A gesture that didn't launch leaves nothing behind for the next one
        if self.mode == InputMode::Swipe && !self.balloon.launched {
            self.swipe.clear();
            self.balloon.moved = false;
        }
    }

    /// Pressure sample from a force-touch display
    pub fn force_changed(&mut self, force: f32, max_force: f32) {
        if self.paused || self.mode != InputMode::Pressure {
            return;
        }
        if !force.is_finite() {
            self.errors.record(self.clock, InputError::InvalidForce { force });
            return;
        }

        if force >= 1.0 {
            self.force.set(force);
            self.queue
                .motion(MotionScript::scale_to(MotionTarget::Balloon, 0.25, 1.0 + force / 3.0));
            let exploding = matches!(self.phase, FlightPhase::Exploding { .. });
            if input::force_pops(force, max_force) && !exploding {
                self.force.mark_triggered();
                self.pop();
            }
        } else {
            self.queue.motion(MotionScript::scale_to(MotionTarget::Balloon, 0.25, 1.0));
        }
    }

    fn launch(&mut self, vel: Vec2) {
        self.balloon.launch(vel);
        self.phase = FlightPhase::InFlight;
        self.timer.restart(self.clock);
        self.last_touch = None;

        self.queue.push(Command::Menu(MenuState::Hide));
        self.queue.sound(self.audio.music(SoundAction::Play));
        log::info!("Balloon launched at ({:.3}, {:.3}) px/ms", vel.x, vel.y);
    }

    /// Apply the last in-flight tap
    fn nudge(&mut self) {
        let Some(tap) = self.last_touch.take() else {
            return;
        };
        let nudge = input::tap_nudge(self.balloon.pos, self.balloon.size, tap);
        if !nudge.is_hit() {
            return;
        }

        self.balloon.vel.x += nudge.dvx;
        if let Some(vy) = nudge.vy {
            self.balloon.vel.y = vy;
            self.balloon.new_vy = vy;
        }
        self.queue.push(Command::Light(LightCommand::Flash));
        self.queue.sound(self.audio.effect(SoundEffect::BalloonTap));
    }

    // --- Shared helpers for the frame update ---

    pub(super) fn change_wind(&mut self) {
        if let WindChange::Changed(_) = self.wind.change(&mut self.rng) {
            self.dispatch_wind_motion();
        }
    }

    fn dispatch_wind_motion(&mut self) {
        for script in self.wind.take_decor_motion(self.layer) {
            self.queue.motion(script);
        }
    }

    pub(super) fn next_color(&mut self) -> BalloonColor {
        pick_color(&self.palette, Some(self.balloon.color), &mut self.rng)
    }

    /// Tell the renderer about the current balloon
    pub(super) fn announce_balloon(&mut self) {
        self.queue.scene(SceneChange::SpawnBalloon {
            color: self.balloon.color,
            pos: self.balloon.pos,
            opacity: self.balloon.opacity,
        });
        self.queue.motion(MotionScript::scale_pulse(MotionTarget::Balloon));
    }
}

/// Random palette color other than `previous` (when there is a choice)
fn pick_color(palette: &[BalloonColor], previous: Option<BalloonColor>, rng: &mut impl Rng) -> BalloonColor {
    let others: Vec<_> = palette.iter().copied().filter(|c| Some(*c) != previous).collect();
    let pool = if others.is_empty() { palette } else { &others[..] };
    pool[rng.random_range(0..pool.len())]
}

/// Values shown on the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSnapshot {
    pub wind_speed: u8,
    pub blowing_right: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    pub last_touch: Vec2,
    pub force: f32,
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wind Speed: {}", self.wind_speed)?;
        writeln!(f, "Wind Direction: {}", if self.blowing_right { "Right" } else { "Left" })?;
        writeln!(f, "Balloon X: {}", round2(self.pos.x))?;
        writeln!(f, "Balloon Y: {}", round2(self.pos.y))?;
        writeln!(f, "Balloon Vel. X: {}", round2(self.vel.x))?;
        writeln!(f, "Balloon Vel. Y: {}", round2(self.vel.y))?;
        writeln!(f, "Touch Loc. X: {}", round2(self.last_touch.x))?;
        writeln!(f, "Touch Loc. Y: {}", round2(self.last_touch.y))?;
        write!(f, "Touch Force: {}", round2(self.force))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_pick_color_avoids_previous() {
        let palette = [BalloonColor::new(1, 1, 1), BalloonColor::new(2, 2, 2)];
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(pick_color(&palette, Some(palette[0]), &mut rng), palette[1]);
        }
    }

    #[test]
    fn test_pick_color_single_entry_palette() {
        let palette = [BalloonColor::WHITE];
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(pick_color(&palette, Some(BalloonColor::WHITE), &mut rng), BalloonColor::WHITE);
    }

    #[test]
    fn test_debug_snapshot_text() {
        let snap = DebugSnapshot {
            wind_speed: 7,
            blowing_right: false,
            pos: Vec2::new(163.456, 20.0),
            vel: Vec2::new(0.0, 0.5),
            last_touch: Vec2::ZERO,
            force: 0.0,
        };
        let text = snap.to_string();
        assert!(text.starts_with("Wind Speed: 7\nWind Direction: Left\n"));
        assert!(text.contains("Balloon X: 163.46"));
        assert!(text.ends_with("Touch Force: 0"));
    }
}
