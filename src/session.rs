//! Level/session controller
//!
//! Owns the simulation state, a progress store and the user profile. The
//! store is only touched when a level completes, when the game ends, or
//! when the session is closed; never inside a tick.

use serde::{Deserialize, Serialize};

use crate::persistence::{LevelProgress, ProgressStore, ScoreBreakdown, UserId, UserStats, calculate_score};
use crate::settings::Settings;
use crate::sim::{
    Achievement, AchievementTracker, GameEvent, GamePhase, GameState, LevelSet, TickInput, acknowledge_game_over,
    advance_level, tick,
};

/// Bootstrap record for a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Guests have no id and nothing is saved for them
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default = "default_level")]
    pub current_level: u32,
    #[serde(default)]
    pub total_score: u64,
}

fn default_level() -> u32 {
    1
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::guest()
    }
}

impl UserProfile {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            current_level: 1,
            total_score: 0,
        }
    }

    pub fn user(user_id: UserId, current_level: u32, total_score: u64) -> Self {
        Self {
            user_id: Some(user_id),
            current_level,
            total_score,
        }
    }
}

pub struct Session<S: ProgressStore> {
    state: GameState,
    store: S,
    profile: UserProfile,
    max_time_secs: u32,
    last_score: Option<ScoreBreakdown>,
}

impl<S: ProgressStore> Session<S> {
    /// Start a session at the profile's level
    pub fn new(settings: &Settings, mut levels: LevelSet, store: S, profile: UserProfile) -> Self {
        levels.levels.retain(|l| l.number <= settings.max_level);
        let mut state = GameState::with_levels(levels, settings.seed, profile.current_level, settings.starting_lives);
        state.prior_total_score = profile.total_score;

        if let Some(user) = profile.user_id {
            match store.user_achievements(user) {
                Ok(ids) => {
                    state.achievements = AchievementTracker::with_unlocked(ids.into_iter().filter_map(Achievement::from_id));
                }
                Err(e) => log::warn!("could not load achievements for user {}: {}", user, e),
            }
        }

        log::info!(
            "session started for {} at level {} of {}",
            profile.user_id.map_or_else(|| "guest".to_string(), |id| format!("user {}", id)),
            state.level,
            state.max_level
        );

        Self {
            state,
            store,
            profile,
            max_time_secs: settings.score_max_time_secs,
            last_score: None,
        }
    }

    /// Run one tick and report what happened
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input);
        match self.state.phase {
            GamePhase::Completing => self.finish_level(),
            GamePhase::GameOver => self.flush_achievements(),
            _ => {}
        }
        self.state.drain_events()
    }

    /// Restart at level 1 after a game over
    pub fn acknowledge_game_over(&mut self) -> Vec<GameEvent> {
        acknowledge_game_over(&mut self.state);
        self.state.drain_events()
    }

    fn finish_level(&mut self) {
        let level = self.state.level;
        let counters = self.state.counters.clone();
        let time_spent = counters.elapsed_secs();
        let score = calculate_score(
            counters.turtles_killed,
            counters.spike_turtles_killed,
            time_spent,
            self.max_time_secs,
        );

        if let Some(user_id) = self.profile.user_id {
            let progress = LevelProgress {
                user_id,
                level,
                score: score.total,
                time_spent,
                enemies_killed: counters.total_kills(),
                completed: true,
            };
            match self.store.save_level_progress(&progress) {
                Ok(()) => log::info!("saved level {} for user {}: {} points in {}s", level, user_id, score.total, time_spent),
                Err(e) => log::warn!("failed to save level {} for user {}: {}", level, user_id, e),
            }
        }

        self.profile.total_score += score.total;
        self.state.prior_total_score = self.profile.total_score;
        self.last_score = Some(score);
        self.flush_achievements();

        advance_level(&mut self.state);
        let next = (level + 1).min(self.state.max_level);
        self.profile.current_level = self.profile.current_level.max(next);
    }

    fn flush_achievements(&mut self) {
        let pending = self.state.achievements.take_pending();
        let Some(user) = self.profile.user_id else {
            return;
        };
        for achievement in pending {
            match self.store.unlock_achievement(user, achievement.id()) {
                Ok(true) => log::info!("stored achievement {} for user {}", achievement.title(), user),
                Ok(false) => log::debug!("user {} already had {}", user, achievement.title()),
                Err(e) => log::warn!("failed to store achievement {}: {}", achievement.title(), e),
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Score of the most recently completed level
    pub fn last_score(&self) -> Option<ScoreBreakdown> {
        self.last_score
    }

    pub fn user_stats(&self) -> Option<UserStats> {
        let user = self.profile.user_id?;
        match self.store.user_stats(user) {
            Ok(stats) => Some(stats),
            Err(e) => {
                log::warn!("failed to read stats for user {}: {}", user, e);
                None
            }
        }
    }

    /// End the session at a tick boundary; level progress in flight is dropped
    pub fn into_parts(mut self) -> (S, UserProfile) {
        self.flush_achievements();
        log::info!("session closed on level {}", self.state.level);
        (self.store, self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::persistence::MemoryStore;
    use crate::sim::{Enemy, EnemyKind, Layer};
    use std::collections::BTreeSet;

    fn settings() -> Settings {
        Settings {
            seed: 8,
            ..Default::default()
        }
    }

    fn session_for(user: UserId) -> Session<MemoryStore> {
        let mut store = MemoryStore::new();
        store.register_user(user);
        Session::new(&settings(), LevelSet::builtin(), store, UserProfile::user(user, 1, 0))
    }

    /// Clear the level and stand the player inside the exit
    fn clear_and_stand_on_exit<S: ProgressStore>(session: &mut Session<S>) {
        let state = session.state_mut();
        state.enemies.clear();
        state.player.body.bounds.set_center_x(417.0);
        state.player.body.bounds.set_bottom(600.0);
    }

    struct BrokenStore;

    impl ProgressStore for BrokenStore {
        fn save_level_progress(&mut self, _: &LevelProgress) -> Result<(), PersistenceError> {
            Err(PersistenceError::Rejected("offline".to_string()))
        }

        fn user_achievements(&self, user: UserId) -> Result<BTreeSet<u32>, PersistenceError> {
            Err(PersistenceError::UnknownUser(user))
        }

        fn unlock_achievement(&mut self, _: UserId, _: u32) -> Result<bool, PersistenceError> {
            Err(PersistenceError::Rejected("offline".to_string()))
        }

        fn user_stats(&self, user: UserId) -> Result<UserStats, PersistenceError> {
            Err(PersistenceError::UnknownUser(user))
        }
    }

    #[test]
    fn test_completion_saves_and_advances() {
        let mut session = session_for(4);
        clear_and_stand_on_exit(&mut session);

        let events = session.step(&TickInput::default());
        assert!(events.iter().any(|e| matches!(e, GameEvent::LevelCompleted { level: 1, .. })));
        assert!(events.contains(&GameEvent::LevelStarted { level: 2 }));
        assert_eq!(session.state().level, 2);
        assert_eq!(session.state().phase, GamePhase::Running);

        // Finished instantly: full time bonus, no kills
        let score = session.last_score().unwrap();
        assert_eq!(score.total, 500);
        assert_eq!(session.profile().total_score, 500);
        assert_eq!(session.profile().current_level, 2);

        let stats = session.user_stats().unwrap();
        assert_eq!(stats.total_score, 500);
        assert_eq!(stats.current_level, 2);
        let stored = session.store().user_achievements(4).unwrap();
        assert!(stored.contains(&Achievement::FirstSteps.id()));
        assert!(stored.contains(&Achievement::SpeedRunner.id()));
    }

    #[test]
    fn test_stored_achievements_are_not_announced_again() {
        let mut store = MemoryStore::new();
        store.register_user(4);
        store.unlock_achievement(4, Achievement::FirstSteps.id()).unwrap();
        let mut session = Session::new(&settings(), LevelSet::builtin(), store, UserProfile::user(4, 1, 0));
        assert!(session.state().achievements.is_unlocked(Achievement::FirstSteps));

        clear_and_stand_on_exit(&mut session);
        let events = session.step(&TickInput::default());
        assert!(!events.contains(&GameEvent::AchievementUnlocked(Achievement::FirstSteps)));
        assert!(events.contains(&GameEvent::AchievementUnlocked(Achievement::SpeedRunner)));
    }

    #[test]
    fn test_store_failures_are_not_fatal() {
        let profile = UserProfile::user(9, 2, 100);
        let mut session = Session::new(&settings(), LevelSet::builtin(), BrokenStore, profile);
        assert_eq!(session.state().level, 2);
        assert_eq!(session.state().prior_total_score, 100);

        clear_and_stand_on_exit(&mut session);
        session.step(&TickInput::default());
        assert_eq!(session.state().level, 3);
        assert_eq!(session.profile().total_score, 600);
        assert!(session.user_stats().is_none());
    }

    #[test]
    fn test_guest_saves_nothing() {
        let mut session = Session::new(&settings(), LevelSet::builtin(), MemoryStore::new(), UserProfile::guest());
        clear_and_stand_on_exit(&mut session);
        session.step(&TickInput::default());
        assert_eq!(session.state().level, 2);
        let (store, profile) = session.into_parts();
        assert!(store.users.is_empty());
        assert_eq!(profile.total_score, 500);
    }

    #[test]
    fn test_max_level_setting_caps_levels() {
        let capped = Settings {
            max_level: 2,
            ..settings()
        };
        let mut session = Session::new(&capped, LevelSet::builtin(), MemoryStore::new(), UserProfile::guest());
        assert_eq!(session.state().max_level, 2);

        clear_and_stand_on_exit(&mut session);
        session.step(&TickInput::default());
        clear_and_stand_on_exit(&mut session);
        let events = session.step(&TickInput::default());
        assert!(events.contains(&GameEvent::GameCompleted));
        assert_eq!(session.state().level, 1);
    }

    #[test]
    fn test_game_over_waits_for_acknowledgement() {
        let mut session = session_for(4);
        {
            let state = session.state_mut();
            state.enemies.clear();
            state.player.lives = 1;
            let id = state.next_entity_id();
            let mut spike = Enemy::new(id, EnemyKind::SpikeTurtle, 0.0, 0.0, Layer::Front, true);
            spike.body.bounds.set_center(state.player.body.bounds.center());
            state.enemies.push(spike);
        }
        let events = session.step(&TickInput::default());
        assert!(events.contains(&GameEvent::GameOver { level: 1 }));

        assert!(session.step(&TickInput::default()).is_empty());
        assert_eq!(session.state().phase, GamePhase::GameOver);

        let events = session.acknowledge_game_over();
        assert!(events.contains(&GameEvent::LevelStarted { level: 1 }));
        assert_eq!(session.state().player.lives, 3);
        // Nothing saved for a lost level
        assert!(session.store().user(4).unwrap().levels.is_empty());
    }
}
