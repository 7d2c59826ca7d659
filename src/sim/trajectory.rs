//! Two-phase trajectory integration
//!
//! Eggs leave a hen sliding diagonally down a chute, accelerating with the
//! level, then drop off the end of the chute into free fall. The switch happens
//! exactly once, when the egg passes the precomputed `transition_x`.

use std::f32::consts::SQRT_2;

use glam::Vec2;

use super::state::{Emitter, FallingObject, MotionPhase};
use crate::consts::*;
use crate::tuning::Tuning;

/// Result of advancing one object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Still on the field
    InFlight,
    /// Crossed the floor; the object has been deactivated
    Landed,
}

/// Initial kinematics for an object leaving an emitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: MotionPhase,
    pub transition_x: f32,
}

/// Launch down a hen's chute. Left-half hens slide right, right-half hens
/// slide left, both toward the field centre.
pub fn launch_from(emitter: &Emitter, level: u32, tuning: &Tuning) -> Launch {
    let pos = emitter.launch_point();
    let speed = tuning.launch_speed_at(level) / SQRT_2;
    let dir = if pos.x < FIELD_WIDTH / 2.0 { 1.0 } else { -1.0 };
    Launch {
        pos,
        vel: Vec2::new(dir * speed, speed),
        phase: MotionPhase::Sliding,
        transition_x: pos.x + dir * tuning.chute_length,
    }
}

/// Straight drop with no slide (boss drops)
pub fn drop_from(origin: Vec2, drop_speed: f32) -> Launch {
    Launch {
        pos: origin,
        vel: Vec2::new(0.0, drop_speed),
        phase: MotionPhase::Falling,
        transition_x: origin.x,
    }
}

/// Advance an object by `frames` reference frames
pub fn advance(obj: &mut FallingObject, level: u32, tuning: &Tuning, frames: f32) -> Motion {
    if !obj.alive {
        return Motion::Landed;
    }

    match obj.phase {
        MotionPhase::Sliding => {
            // 45° decomposition: each axis gets accel / √2
            let component = tuning.slide_accel_at(level) / SQRT_2 * frames;
            let dir = obj.vel.x.signum();
            obj.vel.x += dir * component;
            obj.vel.y += component;
            obj.pos += obj.vel * frames;

            let past_end = (dir > 0.0 && obj.pos.x >= obj.transition_x)
                || (dir < 0.0 && obj.pos.x <= obj.transition_x);
            if past_end {
                obj.phase = MotionPhase::Falling;
            }
        }
        MotionPhase::Falling => {
            obj.vel.y += tuning.gravity * frames;
            let mut dx = obj.vel.x * frames;
            if dx < 0.0 {
                dx *= tuning.leftward_fall_factor;
            }
            obj.pos.x += dx;
            obj.pos.y += obj.vel.y * frames;
        }
    }

    if obj.pos.y > FIELD_HEIGHT {
        obj.alive = false;
        return Motion::Landed;
    }
    Motion::InFlight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{HEN_EMITTERS, Payload};

    fn object(launch: Launch) -> FallingObject {
        FallingObject {
            id: 1,
            pos: launch.pos,
            vel: launch.vel,
            phase: launch.phase,
            transition_x: launch.transition_x,
            payload: Payload::BonusScore,
            alive: true,
        }
    }

    #[test]
    fn test_left_hen_launch_at_level_one() {
        let tuning = Tuning::default();
        let launch = launch_from(&HEN_EMITTERS[0], 1, &tuning);
        assert_eq!(launch.transition_x, launch.pos.x + 67.5);
        assert!((launch.vel.x - 0.7071).abs() < 1e-4);
        assert!((launch.vel.y - 0.7071).abs() < 1e-4);
        assert_eq!(launch.phase, MotionPhase::Sliding);
    }

    #[test]
    fn test_right_hen_slides_left() {
        let tuning = Tuning::default();
        let launch = launch_from(&HEN_EMITTERS[2], 1, &tuning);
        assert!(launch.vel.x < 0.0);
        assert_eq!(launch.transition_x, launch.pos.x - 67.5);
    }

    #[test]
    fn test_slide_transitions_once() {
        let tuning = Tuning::default();
        let mut obj = object(launch_from(&HEN_EMITTERS[1], 1, &tuning));
        let start_x = obj.pos.x;
        let mut transitions = 0;
        let mut last = obj.phase;
        while advance(&mut obj, 1, &tuning, 1.0) == Motion::InFlight {
            if obj.phase != last {
                transitions += 1;
                assert_eq!(obj.phase, MotionPhase::Falling);
                assert!(obj.pos.x >= start_x + 67.5);
            }
            last = obj.phase;
        }
        assert_eq!(transitions, 1);
        assert!(!obj.alive);
    }

    #[test]
    fn test_slide_speed_grows_with_level() {
        let tuning = Tuning::default();
        let mut slow = object(launch_from(&HEN_EMITTERS[0], 1, &tuning));
        let mut fast = object(launch_from(&HEN_EMITTERS[0], 5, &tuning));
        advance(&mut slow, 1, &tuning, 1.0);
        advance(&mut fast, 5, &tuning, 1.0);
        assert!(fast.vel.x > slow.vel.x);
        // Horizontal direction never flips while sliding
        assert!(slow.vel.x > 0.0);
    }

    #[test]
    fn test_fall_applies_gravity() {
        let tuning = Tuning::default();
        let mut obj = object(drop_from(Vec2::new(100.0, 100.0), 2.0));
        advance(&mut obj, 1, &tuning, 1.0);
        assert!((obj.vel.y - 2.1).abs() < 1e-5);
        assert!((obj.pos.y - 102.1).abs() < 1e-4);
        assert_eq!(obj.pos.x, 100.0);
    }

    #[test]
    fn test_leftward_fall_damping() {
        let mut tuning = Tuning::default();
        tuning.leftward_fall_factor = 0.75;
        let mut left = object(drop_from(Vec2::new(400.0, 100.0), 0.0));
        left.vel.x = -4.0;
        let mut right = left.clone();
        right.vel.x = 4.0;
        advance(&mut left, 1, &tuning, 1.0);
        advance(&mut right, 1, &tuning, 1.0);
        assert_eq!(left.pos.x, 397.0);
        assert_eq!(right.pos.x, 404.0);
    }

    #[test]
    fn test_lands_below_floor() {
        let tuning = Tuning::default();
        let mut obj = object(drop_from(Vec2::new(100.0, FIELD_HEIGHT - 1.0), 5.0));
        assert_eq!(advance(&mut obj, 1, &tuning, 1.0), Motion::Landed);
        assert!(!obj.alive);
    }
}
