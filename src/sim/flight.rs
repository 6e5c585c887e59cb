//! Flight integrator
//!
//! Vertical motion is not integrated as `v * dt`. Each step lowers the
//! vertical velocity by gravity and moves the balloon by the difference of
//! the squared velocities over gravity, which traces the parabola the game
//! was tuned around. The step order and f32 arithmetic below are load-bearing.

use glam::Vec2;

use super::state::BalloonState;
use super::wind::WindState;
use crate::consts::GAME_GRAVITY;

/// Advance one frame. `dt` in seconds.
pub fn integrate(balloon: &mut BalloonState, wind: &WindState, dt: f32) {
    balloon.new_vy -= dt * GAME_GRAVITY * 1000.0;
    balloon.pos.x += balloon.vel.x * dt * 1000.0 + wind.direction_sign() * wind.speed_f32() * dt * 100.0;
    balloon.pos.y -= (balloon.new_vy * balloon.new_vy - balloon.vel.y * balloon.vel.y) / GAME_GRAVITY;
    balloon.vel.y = balloon.new_vy;
}

/// Balloon still close enough to the layer for the integrator to run
pub fn in_flight_envelope(balloon: &BalloonState, layer: Vec2) -> bool {
    let (pos, size) = (balloon.pos, balloon.size);
    pos.y >= 0.0 && pos.y - size.y <= layer.y && pos.x + size.x >= 0.0 && pos.x - size.x <= layer.x
}

/// Height above the launch point where vertical velocity reaches zero
pub fn apex_height(vy: f32) -> f32 {
    vy * vy / GAME_GRAVITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BalloonColor;
    use proptest::prelude::*;

    fn launched(vel: Vec2) -> BalloonState {
        let mut b = BalloonState::spawn(Vec2::new(320.0, 480.0), Vec2::new(64.0, 80.0), BalloonColor::WHITE);
        b.launch(vel);
        b
    }

    #[test]
    fn test_single_step_matches_formula() {
        let mut b = launched(Vec2::new(0.1, 0.5));
        let dt = 1.0 / 60.0;
        let start = b.pos;
        integrate(&mut b, &WindState::default(), dt);

        let new_vy = 0.5f32 - dt * GAME_GRAVITY * 1000.0;
        let dy = (new_vy * new_vy - 0.25) / GAME_GRAVITY;
        assert_eq!(b.vel.y, new_vy);
        assert_eq!(b.pos.y, start.y - dy);
        assert_eq!(b.pos.x, start.x + 0.1 * dt * 1000.0);
        assert!(b.pos.y > start.y, "rising while vy > 0");
    }

    #[test]
    fn test_wind_pushes_sideways() {
        let mut calm = launched(Vec2::new(0.0, 0.2));
        let mut windy = calm.clone();
        let wind = WindState::blowing(7, false);
        integrate(&mut calm, &WindState::default(), 0.1);
        integrate(&mut windy, &wind, 0.1);
        assert!((calm.pos.x - windy.pos.x - 70.0).abs() < 1e-3);
        assert_eq!(calm.pos.y, windy.pos.y);
    }

    #[test]
    fn test_arc_rises_then_falls() {
        let mut b = launched(Vec2::new(0.0, 0.1));
        let dt = 1.0 / 60.0;
        let mut peak = b.pos.y;
        let mut fell = false;
        for _ in 0..600 {
            integrate(&mut b, &WindState::default(), dt);
            if b.pos.y < peak {
                fell = true;
            }
            peak = peak.max(b.pos.y);
        }
        assert!(fell);
        assert!((peak - apex_height(0.1)).abs() < 1.0, "peak {}", peak);
    }

    #[test]
    fn test_envelope() {
        let layer = Vec2::new(320.0, 480.0);
        let mut b = launched(Vec2::ZERO);
        assert!(in_flight_envelope(&b, layer));
        b.pos.y = -0.1;
        assert!(!in_flight_envelope(&b, layer));
        b.pos = Vec2::new(-64.0, 10.0);
        assert!(in_flight_envelope(&b, layer));
        b.pos.x = -64.5;
        assert!(!in_flight_envelope(&b, layer));
    }

    proptest! {
        #[test]
        fn prop_vy_strictly_decreases(vy in -1.0f32..1.0, dt in 0.001f32..0.1, steps in 1usize..200) {
            let mut b = launched(Vec2::new(0.0, vy));
            let wind = WindState::default();
            for _ in 0..steps {
                let before = b.vel.y;
                integrate(&mut b, &wind, dt);
                prop_assert!(b.vel.y < before);
            }
        }
    }
}
