//! Egg Catcher - simulation core for an arcade catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, trajectories, catches, boss)
//! - `session`: Session state machine (login, play, terminal screens)
//! - `auth`: Authentication service seam and login form
//! - `persistence`: Player records, session results, leaderboard queries
//! - `tuning`: Data-driven game balance

pub mod auth;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod session;
pub mod sim;
pub mod tuning;

pub use auth::{AuthError, AuthMode, AuthService, LoginForm};
pub use error::{InvariantViolation, TuningError};
pub use leaderboard::Leaderboard;
pub use persistence::{PersistenceError, PersistenceService, PlayerId, PlayerRecord, SessionSummary};
pub use session::{Session, SessionInput, SessionPhase};
pub use tuning::{Tuning, Variant};

/// Game configuration constants
pub mod consts {
    /// Reference frame duration. Velocities are expressed in pixels per frame.
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest timestep a single tick will integrate
    pub const MAX_DT: f32 = 0.1;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Catcher (wolf) body width; movement is clamped so the body stays on the field
    pub const CATCHER_WIDTH: f32 = 50.0;
    /// Basket width, centred on the catcher body
    pub const BASKET_WIDTH: f32 = 80.0;
    /// Top of the capture band
    pub const BASKET_Y: f32 = 460.0;
    /// Height of the capture band (upper part of the basket only)
    pub const BASKET_HEIGHT: f32 = 60.0;

    /// Emitter (hen) sprite size
    pub const HEN_SIZE: f32 = 38.0;
    /// Falling object sprite size
    pub const EGG_SIZE: f32 = 14.0;

    /// Boss sprite width and resting height
    pub const BOSS_WIDTH: f32 = 96.0;
    pub const BOSS_Y: f32 = 70.0;

    /// Lives at session start and the cap for bonus lives
    pub const MAX_LIVES: u8 = 3;
    /// Leaderboard rows shown on the terminal screen
    pub const LEADERBOARD_ROWS: usize = 5;
}

/// Conversion factor from a timestep in seconds to reference frames.
/// Negative or non-finite timesteps advance nothing.
#[inline]
pub fn frames(dt: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, consts::MAX_DT) / consts::FRAME_DT
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_clamps_timestep() {
        assert!((frames(consts::FRAME_DT) - 1.0).abs() < 1e-6);
        assert!((frames(1.0) - consts::MAX_DT / consts::FRAME_DT).abs() < 1e-4);
        assert_eq!(frames(-0.5), 0.0);
    }

    #[test]
    fn test_frames_ignores_non_finite() {
        assert_eq!(frames(f32::NAN), 0.0);
        assert_eq!(frames(f32::INFINITY), 0.0);
        assert_eq!(frames(f32::NEG_INFINITY), 0.0);
    }
}
