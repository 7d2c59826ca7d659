//! High score leaderboard
//!
//! Ordered best-first, capped at a fixed number of rows.

use serde::{Deserialize, Serialize};

use crate::consts::LEADERBOARD_ROWS;
use crate::persistence::PlayerRecord;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub high_score: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(LEADERBOARD_ROWS)
    }
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build from player records (ties keep record order)
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a PlayerRecord>,
        capacity: usize,
    ) -> Self {
        let mut board = Self::new(capacity);
        for record in records {
            board.add(&record.name, record.high_score);
        }
        board
    }

    /// Whether a player with this best score would get a row. Ties with the
    /// last row lose to the player already listed.
    pub fn qualifies(&self, high_score: u32) -> bool {
        self.capacity > 0
            && (self.entries.len() < self.capacity
                || self.entries.last().is_some_and(|e| high_score > e.high_score))
    }

    /// 1-based row a player with this best score would take, placed after
    /// every player with an equal or better score
    pub fn potential_rank(&self, high_score: u32) -> Option<usize> {
        self.qualifies(high_score).then(|| {
            let ahead = self.entries.iter().take_while(|e| e.high_score >= high_score).count();
            ahead + 1
        })
    }

    /// Insert a player's row if it makes the board; returns its rank
    pub fn add(&mut self, name: &str, high_score: u32) -> Option<usize> {
        let rank = self.potential_rank(high_score)?;
        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                name: name.to_string(),
                high_score,
            },
        );
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.high_score)
    }

    /// Display rows: "1. name - score"
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} - {}", i + 1, e.name, e.high_score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PlayerId;

    #[test]
    fn test_ordering_and_capacity() {
        let mut board = Leaderboard::new(3);
        assert_eq!(board.add("a", 10), Some(1));
        assert_eq!(board.add("b", 30), Some(1));
        assert_eq!(board.add("c", 20), Some(2));
        assert_eq!(board.add("d", 5), None);
        assert_eq!(board.add("e", 25), Some(2));
        assert_eq!(board.entries.len(), 3);
        assert_eq!(board.top_score(), Some(30));
        assert_eq!(board.lines(), vec!["1. b - 30", "2. e - 25", "3. c - 20"]);
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let records = [
            PlayerRecord {
                id: PlayerId(1),
                name: "first".into(),
                high_score: 7,
            },
            PlayerRecord {
                id: PlayerId(2),
                name: "second".into(),
                high_score: 7,
            },
        ];
        let board = Leaderboard::from_records(&records, 5);
        assert_eq!(board.entries[0].name, "first");
        assert_eq!(board.entries[1].name, "second");
    }

    #[test]
    fn test_rank_for_full_board() {
        let mut board = Leaderboard::new(2);
        board.add("a", 10);
        board.add("b", 8);
        assert_eq!(board.potential_rank(9), Some(2));
        assert_eq!(board.potential_rank(10), Some(2));
        assert_eq!(board.potential_rank(8), None);
        assert_eq!(board.potential_rank(11), Some(1));
    }

    #[test]
    fn test_zero_capacity() {
        let mut board = Leaderboard::new(0);
        assert!(!board.qualifies(100));
        assert_eq!(board.add("x", 100), None);
        assert!(board.is_empty());
    }
}
