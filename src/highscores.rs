//! High score leaderboard system
//!
//! Tracks the top 10 finished sessions. Missing or corrupt storage loads as an
//! empty board; a failed save is reported to the caller and nothing else changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{PersistenceError, Storage};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name (trimmed, never empty)
    pub name: String,
    pub score: u64,
    /// Display date stamped by the host when the score was saved
    pub date: String,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("could not save high scores: {0}")]
    Storage(#[from] PersistenceError),
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "highScores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Ties lose to the entry already on the board
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Merge an entry into the board, keeping it sorted and capped.
    /// Returns the rank achieved (1-indexed) or None if it didn't make the cut.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the board. Unreadable data counts as an empty board.
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    // Stored data may come from an older build; restore the invariants
                    scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("High score data is corrupt ({e}), starting fresh"),
            },
            Ok(None) => log::info!("No high scores found, starting fresh"),
            Err(e) => log::warn!("High score storage unavailable ({e}), starting fresh"),
        }
        Self::new()
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Record a finished session: reload the stored board, merge the entry
    /// and persist the result.
    ///
    /// Returns the rank achieved, or None if the score didn't make the top 10.
    pub fn submit(
        storage: &mut dyn Storage,
        name: &str,
        score: u64,
        date: &str,
    ) -> Result<Option<usize>, LeaderboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::EmptyName);
        }

        let mut board = Self::load(storage);
        let rank = board.add_score(HighScoreEntry {
            name: name.to_string(),
            score,
            date: date.to_string(),
        });
        board.save(storage)?;
        Ok(rank)
    }
}
