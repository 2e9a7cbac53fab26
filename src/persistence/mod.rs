//! Progress persistence
//!
//! The simulation never talks to storage. The session calls a
//! `ProgressStore` at level boundaries only, and treats every failure as
//! non-fatal.
//!
//! Implementations:
//! - `MemoryStore`: in-process maps, also the data model of the file store
//! - `JsonFileStore`: JSON file with atomic replace (tmp → save, old save → backup)

pub mod file;
pub mod memory;
pub mod score;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use score::{ScoreBreakdown, calculate_score};

pub type UserId = u64;

/// One finished (or abandoned) level run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub user_id: UserId,
    pub level: u32,
    pub score: u64,
    /// Whole seconds spent in the level
    pub time_spent: u32,
    pub enemies_killed: u32,
    pub completed: bool,
}

/// Best results a user has on one level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub best_score: u64,
    pub best_time: Option<u32>,
    pub last_time: u32,
    pub attempts: u32,
    pub completed: bool,
}

/// Aggregate numbers for a summary screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_score: u64,
    pub current_level: u32,
    pub levels_completed: u32,
    pub achievements_count: u32,
    pub total_time_played: u64,
}

/// Storage collaborator for scores and achievements
pub trait ProgressStore {
    /// Record a level run; completing a level unlocks the next one
    fn save_level_progress(&mut self, progress: &LevelProgress) -> Result<(), PersistenceError>;

    /// Ids of every achievement `user` holds
    fn user_achievements(&self, user: UserId) -> Result<BTreeSet<u32>, PersistenceError>;

    /// Grant an achievement; returns whether it was newly unlocked
    fn unlock_achievement(&mut self, user: UserId, achievement_id: u32) -> Result<bool, PersistenceError>;

    fn user_stats(&self, user: UserId) -> Result<UserStats, PersistenceError>;
}
