//! Game state and core simulation types
//!
//! Everything a running round owns lives here: the catcher, the objects in
//! flight, the boss (when present), score/lives/level and the cue queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use crate::consts::*;
use crate::error::InvariantViolation;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Hens are laying, one egg at a time
    Playing,
    /// Simulation frozen until resumed
    Paused,
    /// Boss is on the field dropping objects
    BossEncounter,
    /// Lives ran out
    GameOver,
    /// Boss defeated
    Won,
}

impl GamePhase {
    /// GameOver and Won end the round; only a restart leaves them
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::BossEncounter => "BossEncounter",
            GamePhase::GameOver => "GameOver",
            GamePhase::Won => "Won",
        }
    }
}

/// What a falling object carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payload {
    /// Costs a life when caught, safe to let fall
    Harmful,
    /// Scores and restores a life (up to the cap)
    BonusLife,
    /// Scores
    BonusScore,
}

impl Payload {
    #[inline]
    pub fn is_harmful(&self) -> bool {
        matches!(self, Payload::Harmful)
    }
}

/// Trajectory segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    /// Accelerating diagonally down a chute
    Sliding,
    /// Free fall under gravity
    Falling,
}

/// An egg (or boss drop) in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub phase: MotionPhase,
    /// X coordinate at which the slide ends
    pub transition_x: f32,
    pub payload: Payload,
    pub alive: bool,
}

impl FallingObject {
    /// Cosmetic spin angle: rolls with horizontal speed on the chute,
    /// tumbles with vertical speed in free fall
    pub fn spin(&self) -> f32 {
        let angle = match self.phase {
            MotionPhase::Sliding => self.vel.x,
            MotionPhase::Falling => self.vel.y,
        };
        crate::wrap_angle(angle)
    }
}

/// A fixed source of objects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// Top-left of the hen sprite
    pub pos: Vec2,
}

impl Emitter {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: Vec2::new(x, y) }
    }

    /// Where an egg appears: under the hen, centred on it
    pub fn launch_point(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + HEN_SIZE / 2.0 - EGG_SIZE / 2.0,
            self.pos.y + HEN_SIZE,
        )
    }
}

/// The four hens, two per side
pub const HEN_EMITTERS: [Emitter; 4] = [
    Emitter::new(150.0, 58.0),
    Emitter::new(100.0, 108.0),
    Emitter::new(650.0, 58.0),
    Emitter::new(700.0, 108.0),
];

/// The player's catcher (wolf with basket)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    /// Horizontal centre of the body and basket
    pub x: f32,
    /// Top of the capture band
    pub y: f32,
    pub basket_width: f32,
}

impl Default for Catcher {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0,
            y: BASKET_Y,
            basket_width: BASKET_WIDTH,
        }
    }
}

impl Catcher {
    /// Move by `dir * speed * frames`, clamped so the body stays on the field
    pub fn step(&mut self, dir: f32, speed: f32, frames: f32) {
        let half = CATCHER_WIDTH / 2.0;
        self.x = (self.x + dir * speed * frames).clamp(half, FIELD_WIDTH - half);
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.basket_width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.basket_width / 2.0
    }
}

/// Discrete cues for the presentation layer (sounds, flashes, banners)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ObjectCaught(Payload),
    LifeLost,
    LifeGained,
    LevelUp(u32),
    BossHit { health: u32 },
    BossDefeated,
    NewHighScore(u32),
    PhaseChanged(GamePhase),
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the round's RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub score: u32,
    pub lives: u8,
    pub level: u32,
    pub phase: GamePhase,
    /// Best score known for the player (persisted high, raised live)
    pub record: u32,
    /// Ticks that advanced the simulation (zero-length steps are not counted)
    pub time_ticks: u64,
    pub catcher: Catcher,
    /// Objects in flight (sorted by id)
    pub objects: Vec<FallingObject>,
    /// Present only during the boss encounter
    pub boss: Option<Boss>,
    /// Boss encounter already started this round
    pub boss_triggered: bool,
    /// Pending cues, drained by the host
    pub events: Vec<GameEvent>,
    /// Record at the start of the round, for the one-shot high score cue
    initial_record: u32,
    next_id: u32,
}

impl GameState {
    /// Create a new round with the given seed and the player's best score
    pub fn new(seed: u64, tuning: Tuning, record: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: tuning.max_lives,
            level: 1,
            phase: GamePhase::Playing,
            record,
            time_ticks: 0,
            catcher: Catcher::default(),
            objects: Vec::new(),
            boss: None,
            boss_triggered: false,
            events: Vec::new(),
            initial_record: record,
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of live objects in flight
    pub fn active_count(&self) -> usize {
        self.objects.iter().filter(|o| o.alive).count()
    }

    /// Change phase and queue the cue (no-op if unchanged)
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
        self.events.push(GameEvent::PhaseChanged(phase));
    }

    /// Add points and keep the live record current
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.record {
            if self.record == self.initial_record {
                self.events.push(GameEvent::NewHighScore(self.score));
            }
            self.record = self.score;
        }
    }

    /// Lose one life (saturating at zero)
    pub fn lose_life(&mut self) {
        if self.lives > 0 {
            self.lives -= 1;
        }
        self.events.push(GameEvent::LifeLost);
    }

    /// Gain one life; returns false when already at the cap
    pub fn gain_life(&mut self) -> bool {
        if self.lives >= self.tuning.max_lives {
            return false;
        }
        self.lives += 1;
        self.events.push(GameEvent::LifeGained);
        true
    }

    /// Take all queued cues
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop dead objects
    pub fn purge(&mut self) {
        self.objects.retain(|o| o.alive);
    }

    /// Ensure objects are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.objects.sort_by_key(|o| o.id);
    }

    /// Verify the state invariants that must hold between ticks
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.lives > self.tuning.max_lives {
            return Err(InvariantViolation::LivesOutOfRange {
                lives: self.lives,
                max: self.tuning.max_lives,
            });
        }
        if self.level == 0 || self.level > self.tuning.level_cap {
            return Err(InvariantViolation::LevelOutOfRange {
                level: self.level,
                cap: self.tuning.level_cap,
            });
        }
        if let Some(dead) = self.objects.iter().find(|o| !o.alive) {
            return Err(InvariantViolation::StaleObject(dead.id));
        }
        // One egg at a time outside the boss encounter
        if self.boss.is_none() && self.objects.len() > 1 {
            return Err(InvariantViolation::GateBreached {
                active: self.objects.len(),
                limit: 1,
            });
        }
        if self.phase == GamePhase::BossEncounter && self.boss.is_none() {
            return Err(InvariantViolation::BossPhaseMismatch(self.phase.as_str()));
        }
        if self.phase == GamePhase::Playing && self.boss.is_some() {
            return Err(InvariantViolation::BossPhaseMismatch(self.phase.as_str()));
        }
        Ok(())
    }
}
