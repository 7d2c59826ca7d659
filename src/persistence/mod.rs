//! Player records and session results
//!
//! The simulation never touches storage directly. A `PersistenceService` is
//! handed to the session at construction; failures are reported and retried,
//! never allowed to disturb in-memory scores.

pub mod local;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local::LocalStore;

/// Opaque player identifier issued by the account service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stored player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub high_score: u32,
}

/// Final result of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub player: PlayerId,
    /// Unique id issued when the round ends. Saving the same summary twice is
    /// a no-op, so a retried save never duplicates history.
    pub round: u64,
    pub score: u32,
    pub lives: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("player {0} not found")]
    NotFound(PlayerId),

    #[error("storage I/O failed: {0}")]
    Io(String),

    #[error("stored data is corrupt: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

/// Storage for player records, round history and the leaderboard
pub trait PersistenceService {
    fn load_player_record(&self, player: PlayerId) -> Result<PlayerRecord, PersistenceError>;

    /// Record a finished round; raises the player's high score on a new high
    fn save_session_result(&self, summary: &SessionSummary) -> Result<(), PersistenceError>;

    /// Best players, highest score first
    fn top_players(&self, limit: usize) -> Result<Vec<PlayerRecord>, PersistenceError>;
}
