//! Local account and score store
//!
//! Implements both `AuthService` and `PersistenceService` over an in-memory
//! table, optionally mirrored to a JSON file. File writes go to a temporary
//! file first and are renamed into place.
//!
//! Passwords are kept as salted BLAKE3 digests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PersistenceError, PersistenceService, PlayerId, PlayerRecord, SessionSummary};
use crate::auth::{AuthError, AuthMode, AuthService};
use crate::leaderboard::Leaderboard;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    record: PlayerRecord,
    salt: u64,
    /// Hex BLAKE3 digest of salt + password
    digest: String,
}

/// One saved round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub player: PlayerId,
    pub round: u64,
    pub score: u32,
    pub lives: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    accounts: Vec<Account>,
    rounds: Vec<RoundRecord>,
    next_id: u32,
}

/// In-memory store with optional JSON file backing
#[derive(Debug, Default)]
pub struct LocalStore {
    data: RefCell<StoreData>,
    path: Option<PathBuf>,
}

fn digest(salt: u64, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&salt.to_le_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize()
}

impl LocalStore {
    /// Empty store, memory only
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (or create) a store mirrored to `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let data: StoreData = serde_json::from_str(&json)?;
            log::info!(
                "Loaded {} players, {} rounds from {}",
                data.accounts.len(),
                data.rounds.len(),
                path.display()
            );
            data
        } else {
            log::info!("No store at {}, starting fresh", path.display());
            StoreData::default()
        };
        Ok(Self {
            data: RefCell::new(data),
            path: Some(path),
        })
    }

    /// Write the store to its file (no-op when memory only)
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&*self.data.borrow())?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Saved rounds for a player, oldest first
    pub fn rounds_for(&self, player: PlayerId) -> Vec<RoundRecord> {
        self.data
            .borrow()
            .rounds
            .iter()
            .filter(|r| r.player == player)
            .copied()
            .collect()
    }

    fn register(&self, username: &str, password: &str) -> Result<PlayerId, AuthError> {
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let mut data = self.data.borrow_mut();
        if data.accounts.iter().any(|a| a.record.name == username) {
            return Err(AuthError::UserExists);
        }
        data.next_id += 1;
        let id = PlayerId(data.next_id);
        let salt = rand::random::<u64>();
        data.accounts.push(Account {
            record: PlayerRecord {
                id,
                name: username.to_string(),
                high_score: 0,
            },
            salt,
            digest: digest(salt, password).to_hex().to_string(),
        });
        log::info!("Registered player '{}' as {}", username, id);
        Ok(id)
    }

    fn login(&self, username: &str, password: &str) -> Result<PlayerId, AuthError> {
        let data = self.data.borrow();
        let account = data
            .accounts
            .iter()
            .find(|a| a.record.name == username)
            .ok_or(AuthError::UserNotFound)?;
        let stored = blake3::Hash::from_hex(&account.digest).map_err(|_| AuthError::BadPassword)?;
        // blake3::Hash equality is constant time
        if stored != digest(account.salt, password) {
            return Err(AuthError::BadPassword);
        }
        Ok(account.record.id)
    }
}

impl AuthService for LocalStore {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
        mode: AuthMode,
    ) -> Result<PlayerId, AuthError> {
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        match mode {
            AuthMode::Login => self.login(username, password),
            AuthMode::Register => {
                let id = self.register(username, password)?;
                // The account exists in memory; a failed write is retried on the next save
                if let Err(err) = self.flush() {
                    log::warn!("Could not persist new account '{}': {}", username, err);
                }
                Ok(id)
            }
        }
    }

    fn account_exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self
            .data
            .borrow()
            .accounts
            .iter()
            .any(|a| a.record.name == username))
    }
}

impl PersistenceService for LocalStore {
    fn load_player_record(&self, player: PlayerId) -> Result<PlayerRecord, PersistenceError> {
        self.data
            .borrow()
            .accounts
            .iter()
            .find(|a| a.record.id == player)
            .map(|a| a.record.clone())
            .ok_or(PersistenceError::NotFound(player))
    }

    fn save_session_result(&self, summary: &SessionSummary) -> Result<(), PersistenceError> {
        {
            let mut data = self.data.borrow_mut();
            let account = data
                .accounts
                .iter_mut()
                .find(|a| a.record.id == summary.player)
                .ok_or(PersistenceError::NotFound(summary.player))?;
            if summary.score > account.record.high_score {
                account.record.high_score = summary.score;
                log::info!("New high score {} for {}", summary.score, summary.player);
            }

            let seen = data
                .rounds
                .iter()
                .any(|r| r.player == summary.player && r.round == summary.round);
            if !seen {
                data.rounds.push(RoundRecord {
                    player: summary.player,
                    round: summary.round,
                    score: summary.score,
                    lives: summary.lives,
                });
            }
        }
        self.flush()
    }

    fn top_players(&self, limit: usize) -> Result<Vec<PlayerRecord>, PersistenceError> {
        let data = self.data.borrow();
        let board = Leaderboard::from_records(data.accounts.iter().map(|a| &a.record), limit);
        // Map rows back to full records, preserving board order
        let mut used = vec![false; data.accounts.len()];
        let mut top = Vec::with_capacity(board.entries.len());
        for entry in &board.entries {
            let found = data.accounts.iter().enumerate().find(|(i, a)| {
                !used[*i] && a.record.name == entry.name && a.record.high_score == entry.high_score
            });
            if let Some((i, account)) = found {
                used[i] = true;
                top.push(account.record.clone());
            }
        }
        Ok(top)
    }
}
