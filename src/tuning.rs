//! Game balance tables
//!
//! Every constant the simulation consults lives here so a variant can be
//! described entirely in data (and loaded from JSON).

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Endless hen-coop play, one egg at a time
    #[default]
    Classic,
    /// Classic play that turns into a boss encounter at a score threshold
    BossRush,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::BossRush => "Boss Rush",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "boss" | "bossrush" | "boss-rush" | "boss rush" => Some(Variant::BossRush),
            _ => None,
        }
    }
}

/// Weighted payload draw. Whatever is left over after the two explicit
/// weights goes to bonus-score objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadWeights {
    pub harmful: f32,
    pub bonus_life: f32,
}

impl PayloadWeights {
    /// Cumulative thresholds (harmful, harmful + bonus life)
    pub fn thresholds(&self) -> (f32, f32) {
        (self.harmful, self.harmful + self.bonus_life)
    }
}

/// Boss encounter balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossTuning {
    /// Score at which the encounter starts (checked with `>=`, fires once)
    pub score_threshold: u32,
    pub max_health: u32,
    /// Horizontal patrol speed (px/frame)
    pub speed: f32,
    /// Seconds between drops
    pub spawn_interval: f32,
    /// Initial downward speed of a drop (px/frame)
    pub drop_speed: f32,
    /// Payload mix for boss drops
    pub weights: PayloadWeights,
    /// Seconds the hit/gloat animation stays visible
    pub hit_animation: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            score_threshold: 30,
            max_health: 10,
            speed: 2.0,
            spawn_interval: 1.0,
            drop_speed: 2.0,
            weights: PayloadWeights {
                harmful: 0.3,
                bonus_life: 0.05,
            },
            hit_animation: 0.3,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub variant: Variant,

    // === Progression ===
    /// Highest reachable level
    pub level_cap: u32,
    /// Level advances once `score > level_step * level`
    pub level_step: u32,
    pub max_lives: u8,

    // === Catcher ===
    /// Horizontal speed (px/frame)
    pub catcher_speed: f32,

    // === Trajectory ===
    /// Launch speed at level 1 (px/frame, split over both axes)
    pub launch_speed: f32,
    /// Extra launch speed per level above 1
    pub launch_speed_per_level: f32,
    /// Slide acceleration is `slide_accel + slide_accel_per_level * level`
    pub slide_accel: f32,
    pub slide_accel_per_level: f32,
    /// Free-fall acceleration (px/frame²)
    pub gravity: f32,
    /// Horizontal length of an emitter chute
    pub chute_length: f32,
    /// Scale applied to leftward drift while falling (1.0 = symmetric)
    pub leftward_fall_factor: f32,

    // === Spawning ===
    pub weights: PayloadWeights,

    /// Boss encounter; `None` disables it
    pub boss: Option<BossTuning>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,

            level_cap: 20,
            level_step: 10,
            max_lives: crate::consts::MAX_LIVES,

            catcher_speed: 5.0,

            launch_speed: 1.0,
            launch_speed_per_level: 1.0,
            slide_accel: 0.03,
            slide_accel_per_level: 0.03,
            gravity: 0.1,
            chute_length: 67.5,
            leftward_fall_factor: 1.0,

            weights: PayloadWeights {
                harmful: 0.10,
                bonus_life: 0.05,
            },

            boss: None,
        }
    }
}

impl Tuning {
    /// Create a tuning table from a variant preset
    pub fn from_variant(variant: Variant) -> Self {
        let mut tuning = Self::default();
        tuning.apply_variant(variant);
        tuning
    }

    /// Apply a variant preset (updates variant-dependent values)
    pub fn apply_variant(&mut self, variant: Variant) {
        self.variant = variant;
        match variant {
            Variant::Classic => {
                self.boss = None;
                self.leftward_fall_factor = 1.0;
            }
            Variant::BossRush => {
                self.boss = Some(BossTuning::default());
                // Leftward drift is deliberately damped in this variant
                self.leftward_fall_factor = 0.75;
            }
        }
    }

    /// Boss threshold override (keeps the other boss values)
    pub fn with_boss_threshold(mut self, threshold: u32) -> Self {
        let mut boss = self.boss.unwrap_or_default();
        boss.score_threshold = threshold;
        self.boss = Some(boss);
        self
    }

    /// Launch speed for a level (px/frame along the chute diagonal)
    pub fn launch_speed_at(&self, level: u32) -> f32 {
        self.launch_speed + self.launch_speed_per_level * level.saturating_sub(1) as f32
    }

    /// Slide acceleration magnitude for a level
    pub fn slide_accel_at(&self, level: u32) -> f32 {
        self.slide_accel + self.slide_accel_per_level * level as f32
    }

    /// Parse and validate a JSON tuning table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.level_cap == 0 {
            return Err(TuningError::Invalid("level_cap must be at least 1"));
        }
        if self.max_lives == 0 {
            return Err(TuningError::Invalid("max_lives must be at least 1"));
        }
        if self.gravity <= 0.0 {
            return Err(TuningError::Invalid("gravity must be positive"));
        }
        if !(0.0..=1.0).contains(&self.leftward_fall_factor) {
            return Err(TuningError::Invalid("leftward_fall_factor must be in 0..=1"));
        }
        check_weights(&self.weights)?;
        if let Some(boss) = &self.boss {
            if boss.max_health == 0 {
                return Err(TuningError::Invalid("boss max_health must be at least 1"));
            }
            if boss.spawn_interval <= 0.0 {
                return Err(TuningError::Invalid("boss spawn_interval must be positive"));
            }
            check_weights(&boss.weights)?;
        }
        Ok(())
    }
}

fn check_weights(weights: &PayloadWeights) -> Result<(), TuningError> {
    let (_, total) = weights.thresholds();
    if weights.harmful < 0.0 || weights.bonus_life < 0.0 || total > 1.0 {
        return Err(TuningError::Invalid("payload weights must be non-negative and sum to <= 1"));
    }
    Ok(())
}
