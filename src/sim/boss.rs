//! Boss encounter state
//!
//! The boss patrols the top of the field, dropping objects on a fixed timer.
//! Catching a non-harmful drop damages it; the hit/gloat animation timers are
//! cosmetic and exposed only for the presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::BossTuning;

/// Vertical offset from the boss's top edge to where drops appear
const DROP_OFFSET_Y: f32 = 60.0;

/// Which reaction the boss is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossAnimation {
    #[default]
    Idle,
    /// Took damage from a catch
    Hurt,
    /// Player caught something harmful
    Gloat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    /// Centre x, top y
    pub pos: Vec2,
    /// +1.0 moving right, -1.0 moving left
    pub dir: f32,
    /// Patrol speed (px/frame)
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    /// Seconds until the next drop
    pub spawn_timer: f32,
    pub animation: BossAnimation,
    /// Seconds the current animation has left
    pub animation_timer: f32,
}

impl Boss {
    pub fn new(tuning: &BossTuning) -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, BOSS_Y),
            dir: 1.0,
            speed: tuning.speed,
            health: tuning.max_health,
            max_health: tuning.max_health,
            spawn_timer: tuning.spawn_interval,
            animation: BossAnimation::Idle,
            animation_timer: 0.0,
        }
    }

    /// Patrol between the field edges, reversing on contact
    pub fn patrol(&mut self, frames: f32) {
        let half = BOSS_WIDTH / 2.0;
        let (min_x, max_x) = (half, FIELD_WIDTH - half);
        self.pos.x += self.dir * self.speed * frames;
        if self.pos.x >= max_x {
            self.pos.x = max_x;
            self.dir = -1.0;
        } else if self.pos.x <= min_x {
            self.pos.x = min_x;
            self.dir = 1.0;
        }
    }

    /// Run the drop timer; true when a drop is due this tick
    pub fn drop_due(&mut self, dt: f32, interval: f32) -> bool {
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return false;
        }
        self.spawn_timer += interval;
        if self.spawn_timer <= 0.0 {
            self.spawn_timer = interval;
        }
        true
    }

    /// Where the next drop appears
    pub fn drop_point(&self) -> Vec2 {
        Vec2::new(self.pos.x - EGG_SIZE / 2.0, self.pos.y + DROP_OFFSET_Y)
    }

    /// Take one point of damage; returns remaining health
    pub fn hit(&mut self, animation_secs: f32) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.animation = BossAnimation::Hurt;
        self.animation_timer = animation_secs;
        self.health
    }

    pub fn gloat(&mut self, animation_secs: f32) {
        self.animation = BossAnimation::Gloat;
        self.animation_timer = animation_secs;
    }

    /// Count down the cosmetic animation
    pub fn tick_animation(&mut self, dt: f32) {
        if self.animation_timer > 0.0 {
            self.animation_timer = (self.animation_timer - dt).max(0.0);
            if self.animation_timer == 0.0 {
                self.animation = BossAnimation::Idle;
            }
        }
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_reverses_at_edges() {
        let mut boss = Boss::new(&BossTuning::default());
        boss.patrol(1000.0);
        assert_eq!(boss.pos.x, FIELD_WIDTH - BOSS_WIDTH / 2.0);
        assert_eq!(boss.dir, -1.0);
        boss.patrol(1000.0);
        assert_eq!(boss.pos.x, BOSS_WIDTH / 2.0);
        assert_eq!(boss.dir, 1.0);
    }

    #[test]
    fn test_drop_timer() {
        let mut boss = Boss::new(&BossTuning::default());
        assert!(!boss.drop_due(0.5, 1.0));
        assert!(!boss.drop_due(0.25, 1.0));
        assert!(boss.drop_due(0.25, 1.0));
        // Reset to a full interval
        assert!(!boss.drop_due(0.75, 1.0));
        assert!(boss.drop_due(0.25, 1.0));
    }

    #[test]
    fn test_hit_and_animation() {
        let mut boss = Boss::new(&BossTuning {
            max_health: 2,
            ..Default::default()
        });
        assert_eq!(boss.hit(0.3), 1);
        assert_eq!(boss.animation, BossAnimation::Hurt);
        boss.tick_animation(0.5);
        assert_eq!(boss.animation, BossAnimation::Idle);
        assert_eq!(boss.hit(0.3), 0);
        assert!(boss.is_defeated());
        assert_eq!(boss.hit(0.3), 0);
    }
}
