//! Per-frame session update
//!
//! Frame order while airborne: launch follow-up, wind, integrate, exit check,
//! stopwatch. A pop hands over to the explosion countdown, and the next
//! balloon appears when it runs out.

use super::collision::check_exit;
use super::flight::{in_flight_envelope, integrate};
use super::session::FlightSession;
use super::state::{BalloonState, FlightPhase};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::effects::{Command, SceneChange};
use crate::error::GameError;
use crate::lights::LightCommand;
use crate::motion::{MotionHook, MotionScript, MotionTarget};
use crate::platform::{MenuState, SoundAction};

impl FlightSession {
    /// Advance the session by one frame. `dt` in seconds.
    ///
    /// Never fails: anything that goes wrong is recorded in the error log.
    pub fn tick(&mut self, dt: f32) {
        if self.paused || !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.clock += f64::from(dt);

        if let Err(e) = self.step(dt) {
            self.errors.record(self.clock, e);
        }

        if self.debug_overlay {
            let text = self.debug_snapshot().to_string();
            self.queue.scene(SceneChange::DebugOverlay(Some(text)));
        }
    }

    fn step(&mut self, dt: f32) -> Result<(), GameError> {
        match self.phase {
            FlightPhase::Idle => {
                self.remind_if_idle();
                Ok(())
            }
            FlightPhase::InFlight => self.fly(dt),
            FlightPhase::Exploding { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = FlightPhase::Exploding { remaining };
                } else {
                    self.finish_explosion();
                }
                Ok(())
            }
        }
    }

    fn fly(&mut self, dt: f32) -> Result<(), GameError> {
        if !in_flight_envelope(&self.balloon, self.layer) {
            return Ok(());
        }

        if self.balloon.just_launched {
            if self.force.value() >= WOBBLE_FORCE_THRESHOLD {
                self.queue.motion(MotionScript::launch_wobble());
            }
            self.balloon.just_launched = false;
            self.force.reset();
        }

        self.wind_clock += dt;
        if self.wind_clock > GAME_VARIATION_FREQUENCY {
            self.change_wind();
            self.wind_clock = 0.0;
        }

        integrate(&mut self.balloon, &self.wind, dt);

        let pos = self.balloon.pos;
        if !pos.is_finite() || !self.balloon.vel.is_finite() {
            self.respawn_in_place();
            return Err(GameError::NonFiniteFlight { x: pos.x, y: pos.y });
        }

        if let Some(edge) = check_exit(pos, self.balloon.size, self.layer) {
            log::debug!("Balloon left the layer ({:?}) at ({:.1}, {:.1})", edge, pos.x, pos.y);
            self.pop();
            return Ok(());
        }

        let before = self.timer.displayed();
        self.timer.update(self.clock);
        if self.timer.displayed() != before {
            self.queue.scene(SceneChange::Stopwatch(self.timer.display_text()));
        }
        Ok(())
    }

    /// End the flight with an explosion where the balloon is
    pub(super) fn pop(&mut self) {
        let color = self.balloon.color;
        self.phase = FlightPhase::Exploding {
            remaining: EXPLOSION_DURATION,
        };
        self.swipe.clear();
        self.pops += 1;

        self.queue.push(Command::Light(LightCommand::SetColor {
            r: color.r,
            g: color.g,
            b: color.b,
        }));
        self.queue.sound(self.audio.music(SoundAction::Stop));
        self.queue.sound(self.audio.effect(SoundEffect::BalloonPop));
        self.queue.scene(SceneChange::RemoveBalloon);
        self.queue.scene(SceneChange::Explosion {
            at: self.balloon.pos,
            color,
        });
        self.queue.motion(MotionScript::explosion(EXPLOSION_DURATION));

        log::info!("Balloon popped after {}", self.timer.displayed());
    }

    fn finish_explosion(&mut self) {
        self.queue.scene(SceneChange::LayerColor(self.balloon.color));
        self.spawn_balloon();
        if self.timer.reset_display() {
            self.queue
                .motion(MotionScript::shake(MotionTarget::Stopwatch, MotionHook::ResetStopwatch));
        }
    }

    /// Score the finished round and put a fresh balloon on the ground
    fn spawn_balloon(&mut self) {
        let round = self.timer.displayed();

        if self.best.submit(round) {
            let text = round.to_string();
            log::info!("New best time {}", text);
            self.queue.motion(MotionScript::shake(
                MotionTarget::BestTime,
                MotionHook::ShowBestTime(text.clone()),
            ));
            self.queue.push(self.best.persist_command());
            self.queue.push(Command::Achievement { best_time: text });
        } else {
            self.queue.push(Command::Menu(MenuState::Show));
        }

        let color = self.next_color();
        self.balloon = BalloonState::spawn(self.layer, self.balloon.size, color);
        self.phase = FlightPhase::Idle;
        self.force.reset();
        self.last_touch = None;
        self.timer.restart(self.clock);
        self.announce_balloon();
    }

    /// Recover from a broken flight without scoring it
    fn respawn_in_place(&mut self) {
        let color = self.balloon.color;
        self.balloon = BalloonState::spawn(self.layer, self.balloon.size, color);
        self.phase = FlightPhase::Idle;
        self.swipe.clear();
        self.timer.restart(self.clock);
        self.queue.scene(SceneChange::RemoveBalloon);
        self.queue.sound(self.audio.music(SoundAction::Stop));
        self.announce_balloon();
    }

    fn remind_if_idle(&mut self) {
        if self.balloon.launched || self.balloon.pos.y > 0.0 {
            return;
        }
        if self.timer.idle_for(self.clock) > REMINDER_ALERT_DURATION {
            self.queue.motion(MotionScript::reminder());
            self.timer.last_play_time = self.clock;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::config::GameConfig;
    use crate::persistence::MemoryStore;
    use crate::records::BestTime;
    use crate::settings::{Settings, keys};
    use crate::sim::{InputMode, StopwatchTime, TouchPoint};

    fn swipe_session() -> FlightSession {
        FlightSession::new(&GameConfig::default(), &Settings::default(), BestTime::default())
    }

    fn pressure_session() -> FlightSession {
        let config = GameConfig {
            force_touch_available: true,
            ..GameConfig::default()
        };
        FlightSession::new(&config, &Settings::default(), BestTime::default())
    }

    fn run(session: &mut FlightSession, frames: usize) {
        for _ in 0..frames {
            session.tick(FRAME_DT);
        }
    }

    fn swipe_up(session: &mut FlightSession) {
        let start = session.balloon().pos + Vec2::new(0.0, 10.0);
        session.touch_began(TouchPoint::new(start.x, start.y, 1000.0));
        session.touch_moved(TouchPoint::new(start.x, start.y + 100.0, 1200.0));
        session.touch_ended(TouchPoint::new(start.x, start.y + 200.0, 1400.0));
    }

    fn count(session: &FlightSession, pred: impl Fn(&Command) -> bool) -> usize {
        session.pending().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_spawn_position() {
        let session = swipe_session();
        assert_eq!(session.balloon().pos, Vec2::new(163.0, 0.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert_eq!(session.input_mode(), InputMode::Swipe);
    }

    #[test]
    fn test_swipe_launch_pops_exactly_once() {
        let mut session = swipe_session();
        swipe_up(&mut session);
        assert_eq!(session.phase(), FlightPhase::InFlight);
        assert!((session.balloon().vel.y - 0.5).abs() < 1e-6);
        session.drain_commands();

        run(&mut session, 120);

        assert_eq!(session.pop_count(), 1);
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert!(!session.balloon().launched);
        assert_eq!(count(&session, |c| *c == Command::Scene(SceneChange::RemoveBalloon)), 1);
        assert_eq!(count(&session, |c| matches!(c, Command::Light(LightCommand::SetColor { .. }))), 1);
        assert!(session.error_log().is_empty());
    }

    #[test]
    fn test_tap_without_move_does_not_launch() {
        let mut session = swipe_session();
        session.touch_began(TouchPoint::new(163.0, 10.0, 0.0));
        session.touch_ended(TouchPoint::new(163.0, 10.0, 80.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert!(!session.balloon().launched);
    }

    #[test]
    fn test_touch_outside_balloon_is_ignored() {
        let mut session = swipe_session();
        session.touch_began(TouchPoint::new(10.0, 400.0, 0.0));
        session.touch_moved(TouchPoint::new(10.0, 420.0, 50.0));
        session.touch_ended(TouchPoint::new(10.0, 450.0, 100.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert!(!session.balloon().moved);
    }

    #[test]
    fn test_zero_duration_swipe_is_logged() {
        let mut session = swipe_session();
        session.touch_began(TouchPoint::new(163.0, 10.0, 500.0));
        session.touch_moved(TouchPoint::new(163.0, 40.0, 500.0));
        session.touch_ended(TouchPoint::new(163.0, 80.0, 500.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert_eq!(session.error_log().len(), 1);
    }

    #[test]
    fn test_tap_after_rejected_swipe_does_not_launch() {
        let mut session = swipe_session();
        session.touch_began(TouchPoint::new(163.0, 10.0, 500.0));
        session.touch_moved(TouchPoint::new(163.0, 40.0, 500.0));
        session.touch_ended(TouchPoint::new(163.0, 80.0, 500.0));
        assert!(!session.balloon().moved);

        session.touch_began(TouchPoint::new(163.0, 10.0, 900.0));
        session.touch_ended(TouchPoint::new(163.0, 10.0, 950.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert!(!session.balloon().launched);
    }

    #[test]
    fn test_tap_then_outside_swipe_does_not_launch() {
        let mut session = swipe_session();
        session.touch_began(TouchPoint::new(163.0, 10.0, 0.0));
        session.touch_ended(TouchPoint::new(163.0, 10.0, 50.0));

        session.touch_began(TouchPoint::new(10.0, 400.0, 100.0));
        session.touch_moved(TouchPoint::new(10.0, 420.0, 150.0));
        session.touch_ended(TouchPoint::new(10.0, 450.0, 200.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert_eq!(session.balloon().vel, Vec2::ZERO);
    }

    #[test]
    fn test_outside_touch_cancels_pending_swipe() {
        let mut session = swipe_session();
        session.touch_began(TouchPoint::new(163.0, 10.0, 0.0));
        session.touch_began(TouchPoint::new(10.0, 400.0, 100.0));
        session.touch_moved(TouchPoint::new(10.0, 420.0, 150.0));
        session.touch_ended(TouchPoint::new(10.0, 450.0, 200.0));
        assert_eq!(session.phase(), FlightPhase::Idle);
    }

    #[test]
    fn test_force_ignored_in_swipe_mode() {
        let mut session = swipe_session();
        session.drain_commands();
        session.force_changed(7.0, 6.67);
        assert_eq!(session.pop_count(), 0);
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert_eq!(session.touch_force().value(), 0.0);
        assert!(session.pending().is_empty());
    }

    #[test]
    fn test_max_force_pops_without_launch() {
        let mut session = pressure_session();
        session.force_changed(1.5, 6.67);
        session.force_changed(3.0, 6.67);
        assert_eq!(session.pop_count(), 0);
        session.force_changed(6.0, 6.67);

        assert_eq!(session.pop_count(), 1);
        assert!(matches!(session.phase(), FlightPhase::Exploding { .. }));
        assert_eq!(session.balloon().vel, Vec2::ZERO);
        assert!(session.touch_force().is_triggered());

        // Lifting the finger must not launch the popped balloon
        session.touch_ended(TouchPoint::new(163.0, 0.0, 0.0));
        assert!(matches!(session.phase(), FlightPhase::Exploding { .. }));

        run(&mut session, 40);
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert_eq!(session.pop_count(), 1);
    }

    #[test]
    fn test_pressure_launch_goes_straight_up() {
        let mut session = pressure_session();
        session.force_changed(5.0, 6.67);
        session.touch_ended(TouchPoint::new(163.0, 0.0, 0.0));
        assert_eq!(session.phase(), FlightPhase::InFlight);
        assert_eq!(session.balloon().vel, Vec2::new(0.0, 0.4));

        session.drain_commands();
        session.tick(FRAME_DT);
        assert_eq!(count(&session, |c| *c == Command::Motion(MotionScript::launch_wobble())), 1);
        assert_eq!(session.touch_force().value(), 0.0);
    }

    #[test]
    fn test_pause_freezes_flight() {
        let mut session = swipe_session();
        swipe_up(&mut session);
        run(&mut session, 5);
        session.set_paused(true);

        let frozen = session.balloon().pos;
        let clock = session.clock();
        run(&mut session, 30);
        assert_eq!(session.balloon().pos, frozen);
        assert_eq!(session.clock(), clock);

        session.drain_commands();
        session.touch_ended(TouchPoint::new(10.0, 10.0, 0.0));
        assert!(!session.is_paused());
        assert_eq!(count(&session, |c| *c == Command::Menu(MenuState::Collapse)), 1);

        session.tick(FRAME_DT);
        assert!(session.balloon().pos.y > frozen.y);
    }

    #[test]
    fn test_long_round_sets_best_time() {
        let mut session = pressure_session();
        // vy 0.1 keeps the balloon up for about four seconds
        session.force_changed(1.25, 6.67);
        session.touch_ended(TouchPoint::new(163.0, 0.0, 0.0));
        assert_eq!(session.phase(), FlightPhase::InFlight);
        session.drain_commands();

        run(&mut session, 400);

        assert_eq!(session.pop_count(), 1);
        let best = session.best_time().time;
        assert!(best.total_secs() >= 3, "best was {}", best);
        assert_eq!(
            count(&session, |c| matches!(c, Command::Persist { key, .. } if key == keys::PREVIOUS_BEST_TIME)),
            1
        );
        assert_eq!(count(&session, |c| matches!(c, Command::Achievement { .. })), 1);
        assert_eq!(count(&session, |c| *c == Command::Menu(MenuState::Show)), 0);
    }

    #[test]
    fn test_short_round_shows_menu() {
        let best = BestTime::new(StopwatchTime::from_secs(3600));
        let mut session = FlightSession::new(&GameConfig::default(), &Settings::default(), best);
        swipe_up(&mut session);
        session.drain_commands();
        run(&mut session, 120);

        assert_eq!(session.best_time(), best);
        assert_eq!(count(&session, |c| *c == Command::Menu(MenuState::Show)), 1);
        assert_eq!(count(&session, |c| matches!(c, Command::Achievement { .. })), 0);
    }

    #[test]
    fn test_wind_changes_after_thirty_flight_seconds() {
        let mut session = swipe_session();
        session.wind_clock = GAME_VARIATION_FREQUENCY;
        session.tick(FRAME_DT);
        // Grounded balloons don't advance the wind clock
        assert_eq!(session.wind_clock, GAME_VARIATION_FREQUENCY);

        swipe_up(&mut session);
        session.tick(FRAME_DT);
        assert_eq!(session.wind_clock, 0.0);
        assert!(!session.wind().changed);
    }

    #[test]
    fn test_wind_pushes_balloon() {
        let mut session = swipe_session();
        session.wind = crate::sim::WindState::blowing(9, false);
        swipe_up(&mut session);
        let x = session.balloon().pos.x;
        run(&mut session, 10);
        assert!(session.balloon().pos.x < x);
    }

    #[test]
    fn test_idle_reminder_after_thirty_seconds() {
        let mut session = swipe_session();
        session.drain_commands();
        let reminder = Command::Motion(MotionScript::reminder());

        run(&mut session, 60 * 29);
        assert_eq!(count(&session, |c| *c == reminder), 0);
        run(&mut session, 60 * 2);
        assert_eq!(count(&session, |c| *c == reminder), 1);
    }

    #[test]
    fn test_tap_beside_balloon_nudges() {
        let mut session = swipe_session();
        swipe_up(&mut session);
        run(&mut session, 5);
        session.drain_commands();

        let pos = session.balloon().pos;
        let vx = session.balloon().vel.x;
        session.touch_ended(TouchPoint::new(pos.x - 40.0, pos.y, 0.0));
        assert!((session.balloon().vel.x - (vx + TAP_NUDGE_VX)).abs() < 1e-6);
        assert_eq!(count(&session, |c| *c == Command::Light(LightCommand::Flash)), 1);
    }

    #[test]
    fn test_non_finite_flight_recovers() {
        let mut session = swipe_session();
        swipe_up(&mut session);
        session.balloon.vel.x = f32::NAN;
        session.tick(FRAME_DT);

        assert_eq!(session.error_log().len(), 1);
        assert_eq!(session.phase(), FlightPhase::Idle);
        assert_eq!(session.balloon().pos, Vec2::new(163.0, 0.0));
        assert_eq!(session.pop_count(), 0);
    }

    #[test]
    fn test_sound_off_queues_no_audio() {
        let settings = Settings {
            sound_on: false,
            ..Settings::default()
        };
        let mut session = FlightSession::new(&GameConfig::default(), &settings, BestTime::default());
        swipe_up(&mut session);
        run(&mut session, 120);
        assert_eq!(count(&session, |c| matches!(c, Command::Sound(_))), 0);
    }

    #[test]
    fn test_from_store_reads_best_time() {
        let store = MemoryStore::new().with(keys::PREVIOUS_BEST_TIME, "00:01:00");
        let session = FlightSession::from_store(&GameConfig::default(), &store);
        assert_eq!(session.best_time().time.total_secs(), 60);
    }

    #[test]
    fn test_determinism() {
        let mut a = swipe_session();
        let mut b = swipe_session();
        for session in [&mut a, &mut b] {
            session.wind_clock = GAME_VARIATION_FREQUENCY;
            swipe_up(session);
            run(session, 200);
        }
        assert_eq!(a.wind(), b.wind());
        assert_eq!(a.balloon().color, b.balloon().color);
        assert_eq!(a.drain_commands(), b.drain_commands());
    }
}
