//! High score leaderboard
//!
//! Top 5 initials + score, persisted as a whole after every change.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::persistence::{KeyValueStore, StorageError};

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Three characters from `A-Z` and space
    pub name: String,
    pub score: u64,
}

/// High score leaderboard, sorted descending by score
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
    store: Box<dyn KeyValueStore>,
    /// Last save failed; scores only live for this session
    degraded: bool,
}

impl std::fmt::Debug for HighScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScores")
            .field("entries", &self.entries)
            .field("degraded", &self.degraded)
            .finish()
    }
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "spaceInvadersHighScores";

    /// Load from the store; any failure starts an empty table
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match Self::read(store.as_ref()) {
            Ok(Some(entries)) => {
                log::info!("Loaded {} high scores", entries.len());
                entries
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Vec::new()
            }
            Err(err) => {
                log::warn!("High scores unavailable ({err}), starting fresh");
                Vec::new()
            }
        };

        let mut scores = Self {
            entries,
            store,
            degraded: false,
        };
        scores.normalize();
        scores
    }

    /// Re-read from the store, keeping the in-memory table if reading fails
    pub fn refresh(&mut self) {
        if self.degraded {
            return;
        }
        if let Ok(Some(entries)) = Self::read(self.store.as_ref()) {
            self.entries = entries;
            self.normalize();
        }
    }

    fn read(store: &dyn KeyValueStore) -> Result<Option<Vec<HighScoreEntry>>, StorageError> {
        match store.load(Self::STORAGE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Entries, best first
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scores are only kept for this session
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Would `score` make the table
    pub fn is_high_score(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert, keep the best five, persist.
    /// Returns the 1-indexed rank achieved, if the entry survived the cut.
    pub fn add_high_score(&mut self, name: &str, score: u64) -> Option<usize> {
        self.entries.push(HighScoreEntry {
            name: name.to_string(),
            score,
        });
        // Stable sort: equal scores keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        let rank = self
            .entries
            .iter()
            .rposition(|e| e.name == name && e.score == score)
            .map(|i| i + 1);
        self.entries.truncate(MAX_HIGH_SCORES);
        self.save();
        rank.filter(|&r| r <= MAX_HIGH_SCORES)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    fn save(&mut self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(StorageError::from)
            .and_then(|json| self.store.save(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(err) => {
                if !self.degraded {
                    log::warn!("Could not save high scores ({err}); keeping them for this session");
                }
                self.degraded = true;
            }
        }
    }
}
