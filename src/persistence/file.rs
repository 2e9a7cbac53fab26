//! JSON file progress store
//!
//! Every write replaces the whole file: data goes to `<save>.tmp`, the
//! previous save is kept as `<save>.bak`, then the temp file is renamed
//! over the save.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::memory::MemoryStore;
use super::{LevelProgress, ProgressStore, UserId, UserStats};
use crate::error::PersistenceError;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(json) => {
                let data: MemoryStore = serde_json::from_str(&json)?;
                log::info!("Loaded progress for {} users from {}", data.users.len(), path.display());
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No save at {}, starting fresh", path.display());
                MemoryStore::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &MemoryStore {
        &self.data
    }

    /// Register `user` and write the file if it was new
    pub fn register_user(&mut self, user: UserId) -> Result<(), PersistenceError> {
        if self.data.user(user).is_none() {
            self.data.register_user(user);
            self.flush()?;
        }
        Ok(())
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.sibling("tmp");
        fs::write(&tmp, json)?;
        if self.path.exists() {
            fs::copy(&self.path, self.sibling("bak"))?;
        }
        fs::rename(&tmp, &self.path)?;
        log::debug!("Progress written to {}", self.path.display());
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn save_level_progress(&mut self, progress: &LevelProgress) -> Result<(), PersistenceError> {
        self.data.save_level_progress(progress)?;
        self.flush()
    }

    fn user_achievements(&self, user: UserId) -> Result<BTreeSet<u32>, PersistenceError> {
        self.data.user_achievements(user)
    }

    fn unlock_achievement(&mut self, user: UserId, achievement_id: u32) -> Result<bool, PersistenceError> {
        let added = self.data.unlock_achievement(user, achievement_id)?;
        if added {
            self.flush()?;
        }
        Ok(added)
    }

    fn user_stats(&self, user: UserId) -> Result<UserStats, PersistenceError> {
        self.data.user_stats(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Save path inside a fresh directory; the directory goes away with the guard
    fn scratch() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        (dir, path)
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let (_dir, path) = scratch();
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.data().users.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_progress_survives_reopen() {
        let (_dir, path) = scratch();
        let mut store = JsonFileStore::open(&path).unwrap();
        store.register_user(7).unwrap();
        store
            .save_level_progress(&LevelProgress {
                user_id: 7,
                level: 1,
                score: 942,
                time_spent: 95,
                enemies_killed: 3,
                completed: true,
            })
            .unwrap();
        assert!(store.unlock_achievement(7, 1).unwrap());

        let reopened = JsonFileStore::open(&path).unwrap();
        let stats = reopened.user_stats(7).unwrap();
        assert_eq!(stats.total_score, 942);
        assert_eq!(stats.current_level, 2);
        assert_eq!(reopened.user_achievements(7).unwrap(), BTreeSet::from([1]));
        // Previous save rotated to the backup, temp file consumed
        assert!(store.sibling("bak").exists());
        assert!(!store.sibling("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let (_dir, path) = scratch();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(PersistenceError::Serde(_))));
    }
}
