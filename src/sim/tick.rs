//! Simulation tick
//!
//! Advances a round by one step. Within a tick the order is fixed:
//! movement, spawning, trajectory integration, catch resolution, then
//! level-up and phase transitions.

use super::boss::Boss;
use super::catch::is_caught_along;
use super::spawner::{self, EncounterProfile, SpawnPolicy};
use super::state::{GameEvent, GamePhase, GameState, Payload};
use super::trajectory::{self, Motion};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move catcher left (held)
    pub move_left: bool,
    /// Move catcher right (held)
    pub move_right: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Horizontal direction; opposing intents cancel out
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// How an object left play this tick
#[derive(Debug, Clone, Copy)]
enum Resolution {
    Caught(Payload),
    Missed(Payload),
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::BossEncounter => {
                state.set_phase(GamePhase::Paused);
                return;
            }
            GamePhase::Paused => {
                let resume = if state.boss.is_some() {
                    GamePhase::BossEncounter
                } else {
                    GamePhase::Playing
                };
                state.set_phase(resume);
            }
            _ => {}
        }
    }

    // Frozen while paused or finished
    let Some(profile) = EncounterProfile::for_phase(state.phase, &state.tuning) else {
        return;
    };

    let frames = crate::frames(dt);
    let dt = frames * FRAME_DT;
    if frames > 0.0 {
        state.time_ticks += 1;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    // 1. Movement
    let speed = state.tuning.catcher_speed;
    state.catcher.step(input.direction(), speed, frames);

    // 2. Spawning
    match profile.spawn {
        SpawnPolicy::Admission { limit } => {
            if spawner::admits(state.active_count(), limit) {
                if let Err(violation) = spawner::spawn_from_hens(state, &profile) {
                    log::error!("Spawn rejected: {}", violation);
                    debug_assert!(false, "{}", violation);
                }
            }
        }
        SpawnPolicy::Interval { seconds } => {
            let due = match state.boss.as_mut() {
                Some(boss) => {
                    boss.patrol(frames);
                    boss.tick_animation(dt);
                    boss.drop_due(dt, seconds)
                }
                None => false,
            };
            if due {
                spawner::spawn_from_boss(state, &profile);
            }
        }
    }

    // 3 + 4. Trajectories, then catch against this tick's catcher position
    let catcher = state.catcher;
    let level = state.level;
    let mut resolved = Vec::new();
    for obj in state.objects.iter_mut().filter(|o| o.alive) {
        let from = obj.pos;
        let motion = trajectory::advance(obj, level, &state.tuning, frames);
        // A catch anywhere along the step wins over landing at its end
        if is_caught_along(from, obj.pos, &catcher) {
            obj.alive = false;
            resolved.push(Resolution::Caught(obj.payload));
        } else if motion == Motion::Landed {
            resolved.push(Resolution::Missed(obj.payload));
        }
    }
    for resolution in resolved {
        apply_resolution(state, &profile, resolution);
    }
    state.purge();

    // 5. Level up, then phase transitions
    let step = state.tuning.level_step;
    if state.score > step.saturating_mul(state.level) && state.level < state.tuning.level_cap {
        state.level += 1;
        log::info!("Level up: {}", state.level);
        state.events.push(GameEvent::LevelUp(state.level));
    }

    if state.lives == 0 {
        state.set_phase(GamePhase::GameOver);
    } else if state.boss.as_ref().is_some_and(Boss::is_defeated) {
        log::info!("Boss defeated at score {}", state.score);
        state.events.push(GameEvent::BossDefeated);
        state.set_phase(GamePhase::Won);
    } else if state.phase == GamePhase::Playing && !state.boss_triggered {
        let threshold = state.tuning.boss.as_ref().map(|b| b.score_threshold);
        if let Some(threshold) = threshold {
            if state.score >= threshold {
                start_boss_encounter(state);
            }
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();

    if cfg!(debug_assertions) {
        if let Err(violation) = state.check_invariants() {
            log::error!("Invariant violated: {}", violation);
            debug_assert!(false, "{}", violation);
        }
    }
}

/// Apply scoring and life polarity for one resolved object
fn apply_resolution(state: &mut GameState, profile: &EncounterProfile, resolution: Resolution) {
    let animation = state.tuning.boss.as_ref().map_or(0.0, |b| b.hit_animation);
    match resolution {
        Resolution::Caught(payload) => {
            state.events.push(GameEvent::ObjectCaught(payload));
            if payload.is_harmful() {
                state.lose_life();
                if let Some(boss) = state.boss.as_mut() {
                    boss.gloat(animation);
                }
                return;
            }

            state.add_score(1);
            if payload == Payload::BonusLife {
                state.gain_life();
            }
            if profile.damages_boss {
                if let Some(boss) = state.boss.as_mut() {
                    let health = boss.hit(animation);
                    state.events.push(GameEvent::BossHit { health });
                }
            }
        }
        Resolution::Missed(payload) => {
            // Letting a bad egg drop is safe; dropping a good one costs a life
            if profile.miss_penalty && !payload.is_harmful() {
                state.lose_life();
            }
        }
    }
}

/// Bring the boss on and clear the coop
fn start_boss_encounter(state: &mut GameState) {
    let Some(tuning) = state.tuning.boss else {
        return;
    };
    log::info!("Boss encounter at score {}", state.score);
    state.boss_triggered = true;
    state.objects.clear();
    state.boss = Some(Boss::new(&tuning));
    state.set_phase(GamePhase::BossEncounter);
}

/// Steer toward the lowest catchable object, away from harmful ones
fn autopilot(state: &GameState, input: &mut TickInput) {
    let centre = |x: f32| x + EGG_SIZE / 2.0;

    let target = state
        .objects
        .iter()
        .filter(|o| o.alive && !o.payload.is_harmful())
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|o| centre(o.pos.x));

    let threat = state
        .objects
        .iter()
        .filter(|o| o.alive && o.payload.is_harmful() && o.pos.y > BASKET_Y - 120.0)
        .map(|o| centre(o.pos.x))
        .find(|x| (x - state.catcher.x).abs() < BASKET_WIDTH);

    let goal = match (threat, target) {
        // Dodge to whichever side has more room
        (Some(x), _) => {
            if x > state.catcher.x || state.catcher.x > FIELD_WIDTH - BASKET_WIDTH {
                x - BASKET_WIDTH * 1.5
            } else {
                x + BASKET_WIDTH * 1.5
            }
        }
        (None, Some(x)) => x,
        (None, None) => state.boss.as_ref().map_or(FIELD_WIDTH / 2.0, |b| b.pos.x),
    };

    let dx = goal - state.catcher.x;
    let dead_zone = state.tuning.catcher_speed;
    input.move_left = dx < -dead_zone;
    input.move_right = dx > dead_zone;
}
