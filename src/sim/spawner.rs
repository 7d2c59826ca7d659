//! Object spawning
//!
//! Two policies share one pipeline:
//! - hen coop: admission gated, at most one egg in flight, random hen
//! - boss: fixed interval, dropped straight down from the boss
//!
//! `EncounterProfile` bundles the policy with the payload mix and the scoring
//! polarity so the tick never branches on "which game" it is running.

use rand::Rng;

use super::state::{FallingObject, GamePhase, GameState, HEN_EMITTERS, Payload};
use super::trajectory::{self, Launch};
use crate::error::InvariantViolation;
use crate::tuning::{PayloadWeights, Tuning};

/// How new objects are admitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPolicy {
    /// Spawn whenever fewer than `limit` objects are in flight
    Admission { limit: usize },
    /// Spawn every `seconds`, regardless of what is in flight
    Interval { seconds: f32 },
}

/// Rules for the current stage of the round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterProfile {
    pub spawn: SpawnPolicy,
    pub weights: PayloadWeights,
    /// Letting a non-harmful object hit the floor costs a life
    pub miss_penalty: bool,
    /// Non-harmful catches damage the boss
    pub damages_boss: bool,
}

impl EncounterProfile {
    /// Hen coop rules
    pub fn coop(tuning: &Tuning) -> Self {
        Self {
            spawn: SpawnPolicy::Admission { limit: 1 },
            weights: tuning.weights,
            miss_penalty: true,
            damages_boss: false,
        }
    }

    /// Boss rules; falls back to coop rules if the boss is disabled
    pub fn boss(tuning: &Tuning) -> Self {
        match &tuning.boss {
            Some(boss) => Self {
                spawn: SpawnPolicy::Interval {
                    seconds: boss.spawn_interval,
                },
                weights: boss.weights,
                miss_penalty: false,
                damages_boss: true,
            },
            None => Self::coop(tuning),
        }
    }

    /// Profile for the current phase; `None` when the simulation is frozen
    pub fn for_phase(phase: GamePhase, tuning: &Tuning) -> Option<Self> {
        match phase {
            GamePhase::Playing => Some(Self::coop(tuning)),
            GamePhase::BossEncounter => Some(Self::boss(tuning)),
            GamePhase::Paused | GamePhase::GameOver | GamePhase::Won => None,
        }
    }
}

/// Weighted payload draw against cumulative thresholds
pub fn draw_payload<R: Rng>(rng: &mut R, weights: &PayloadWeights) -> Payload {
    payload_for_roll(rng.random::<f32>(), weights)
}

/// Map a roll in [0, 1) to a payload
pub fn payload_for_roll(roll: f32, weights: &PayloadWeights) -> Payload {
    let (harmful, bonus_life) = weights.thresholds();
    if roll < harmful {
        Payload::Harmful
    } else if roll < bonus_life {
        Payload::BonusLife
    } else {
        Payload::BonusScore
    }
}

/// Whether the admission gate is open
#[inline]
pub fn admits(active: usize, limit: usize) -> bool {
    active < limit
}

fn push_object(state: &mut GameState, launch: Launch, payload: Payload) -> u32 {
    let id = state.next_entity_id();
    state.objects.push(FallingObject {
        id,
        pos: launch.pos,
        vel: launch.vel,
        phase: launch.phase,
        transition_x: launch.transition_x,
        payload,
        alive: true,
    });
    id
}

/// Lay an egg from a random hen. Calling this with the gate closed is a bug.
pub fn spawn_from_hens(
    state: &mut GameState,
    profile: &EncounterProfile,
) -> Result<u32, InvariantViolation> {
    if let SpawnPolicy::Admission { limit } = profile.spawn {
        let active = state.active_count();
        if !admits(active, limit) {
            return Err(InvariantViolation::GateBreached { active, limit });
        }
    }

    let hen = state.rng.random_range(0..HEN_EMITTERS.len());
    let payload = draw_payload(&mut state.rng, &profile.weights);
    let launch = trajectory::launch_from(&HEN_EMITTERS[hen], state.level, &state.tuning);
    let id = push_object(state, launch, payload);
    log::debug!("Egg {} from hen {}: {:?}", id, hen, payload);
    Ok(id)
}

/// Drop an object from the boss's current position (no-op without a boss)
pub fn spawn_from_boss(state: &mut GameState, profile: &EncounterProfile) -> Option<u32> {
    let origin = state.boss.as_ref()?.drop_point();
    let drop_speed = state.tuning.boss.as_ref()?.drop_speed;
    let payload = draw_payload(&mut state.rng, &profile.weights);
    let id = push_object(state, trajectory::drop_from(origin, drop_speed), payload);
    log::debug!("Boss drop {}: {:?}", id, payload);
    Some(id)
}
