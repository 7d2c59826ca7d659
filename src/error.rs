//! Simulation and configuration error types
//!
//! Service-facing errors live next to their traits (`auth::AuthError`,
//! `persistence::PersistenceError`).

use thiserror::Error;

/// A broken simulation invariant. Always a programming error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// More objects in flight than the admission gate allows
    #[error("admission gate breached: {active} objects in flight, limit {limit}")]
    GateBreached { active: usize, limit: usize },

    /// Lives outside `0..=max`
    #[error("lives out of range: {lives} (max {max})")]
    LivesOutOfRange { lives: u8, max: u8 },

    /// Level outside `1..=cap`
    #[error("level out of range: {level} (cap {cap})")]
    LevelOutOfRange { level: u32, cap: u32 },

    /// A dead object survived the purge
    #[error("object {0} is inactive but still tracked")]
    StaleObject(u32),

    /// Boss present outside the boss encounter (or missing inside it)
    #[error("boss state does not match phase {0}")]
    BossPhaseMismatch(&'static str),
}

/// Errors raised while loading a tuning table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    /// The JSON document could not be parsed
    #[error("tuning parse error: {0}")]
    Parse(String),

    /// A value is outside its usable range
    #[error("invalid tuning value: {0}")]
    Invalid(&'static str),
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err.to_string())
    }
}
