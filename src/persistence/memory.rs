//! In-memory progress store

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{LevelProgress, LevelRecord, ProgressStore, UserId, UserStats};
use crate::error::PersistenceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Highest level the user may start from
    pub current_level: u32,
    #[serde(default)]
    pub levels: BTreeMap<u32, LevelRecord>,
    #[serde(default)]
    pub achievements: BTreeSet<u32>,
}

impl UserRecord {
    fn new() -> Self {
        Self {
            current_level: 1,
            ..Default::default()
        }
    }

    /// Sum of the best score on every level
    pub fn total_score(&self) -> u64 {
        self.levels.values().map(|l| l.best_score).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    pub users: BTreeMap<UserId, UserRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `user` exists, starting at level 1
    pub fn register_user(&mut self, user: UserId) {
        self.users.entry(user).or_insert_with(UserRecord::new);
    }

    pub fn user(&self, user: UserId) -> Option<&UserRecord> {
        self.users.get(&user)
    }

    fn user_mut(&mut self, user: UserId) -> Result<&mut UserRecord, PersistenceError> {
        self.users.get_mut(&user).ok_or(PersistenceError::UnknownUser(user))
    }
}

impl ProgressStore for MemoryStore {
    fn save_level_progress(&mut self, progress: &LevelProgress) -> Result<(), PersistenceError> {
        if progress.level == 0 {
            return Err(PersistenceError::Rejected("level numbers start at 1".to_string()));
        }
        let user = self.user_mut(progress.user_id)?;
        let record = user.levels.entry(progress.level).or_default();

        // Keep the best results, count every attempt
        record.best_score = record.best_score.max(progress.score);
        record.best_time = Some(match record.best_time {
            Some(best) => best.min(progress.time_spent),
            None => progress.time_spent,
        });
        record.last_time = progress.time_spent;
        record.attempts += 1;
        record.completed |= progress.completed;

        if progress.completed {
            user.current_level = user.current_level.max(progress.level + 1);
        }
        Ok(())
    }

    fn user_achievements(&self, user: UserId) -> Result<BTreeSet<u32>, PersistenceError> {
        self.users
            .get(&user)
            .map(|u| u.achievements.clone())
            .ok_or(PersistenceError::UnknownUser(user))
    }

    fn unlock_achievement(&mut self, user: UserId, achievement_id: u32) -> Result<bool, PersistenceError> {
        Ok(self.user_mut(user)?.achievements.insert(achievement_id))
    }

    fn user_stats(&self, user: UserId) -> Result<UserStats, PersistenceError> {
        let record = self.users.get(&user).ok_or(PersistenceError::UnknownUser(user))?;
        Ok(UserStats {
            total_score: record.total_score(),
            current_level: record.current_level,
            levels_completed: record.levels.values().filter(|l| l.completed).count() as u32,
            achievements_count: record.achievements.len() as u32,
            total_time_played: record.levels.values().map(|l| l.last_time as u64).sum(),
        })
    }
}
