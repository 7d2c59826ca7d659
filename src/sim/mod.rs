//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio, storage or platform dependencies

pub mod boss;
pub mod catch;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use boss::{Boss, BossAnimation};
pub use catch::{CatchZone, is_caught, is_caught_along};
pub use snapshot::{BossView, ObjectView, Snapshot};
pub use spawner::{EncounterProfile, SpawnPolicy};
pub use state::{
    Catcher, Emitter, FallingObject, GameEvent, GamePhase, GameState, HEN_EMITTERS, MotionPhase,
    Payload,
};
pub use tick::{TickInput, tick};
pub use trajectory::{Launch, Motion};
