//! Per-tick view for the presentation layer
//!
//! A plain, serializable copy of what a renderer or HUD needs. Holds no
//! references into the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossAnimation;
use super::state::{GamePhase, GameState, MotionPhase, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectView {
    pub id: u32,
    pub pos: Vec2,
    pub phase: MotionPhase,
    pub payload: Payload,
    /// Cosmetic rotation (radians)
    pub spin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossView {
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub animation: BossAnimation,
    pub animation_timer: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub catcher_x: f32,
    pub objects: Vec<ObjectView>,
    pub score: u32,
    pub record: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub level: u32,
    pub phase: GamePhase,
    pub boss: Option<BossView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            catcher_x: state.catcher.x,
            objects: state
                .objects
                .iter()
                .filter(|o| o.alive)
                .map(|o| ObjectView {
                    id: o.id,
                    pos: o.pos,
                    phase: o.phase,
                    payload: o.payload,
                    spin: o.spin(),
                })
                .collect(),
            score: state.score,
            record: state.record,
            lives: state.lives,
            max_lives: state.tuning.max_lives,
            level: state.level,
            phase: state.phase,
            boss: state.boss.as_ref().map(|b| BossView {
                pos: b.pos,
                health: b.health,
                max_health: b.max_health,
                animation: b.animation,
                animation_timer: b.animation_timer,
            }),
        }
    }
}
