//! Achievement thresholds
//!
//! Rules are evaluated inside the simulation; newly unlocked ids queue up
//! until the session flushes them to the progress store at a level boundary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, SessionCounters};
use crate::consts::TICKS_PER_SECOND;

/// Kills in a single level for Turtle Slayer
pub const TURTLE_SLAYER_KILLS: u32 = 50;
/// Spike turtle kills in a single level for Spike Master
pub const SPIKE_MASTER_KILLS: u32 = 20;
/// Completion time limit for Speed Runner
pub const SPEED_RUNNER_SECS: u64 = 60;
/// Score threshold for Perfect Score
pub const PERFECT_SCORE: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstSteps,
    TurtleSlayer,
    SpikeMaster,
    SpeedRunner,
    GhostHunter,
    PerfectScore,
    Completionist,
}

impl Achievement {
    pub const ALL: [Achievement; 7] = [
        Achievement::FirstSteps,
        Achievement::TurtleSlayer,
        Achievement::SpikeMaster,
        Achievement::SpeedRunner,
        Achievement::GhostHunter,
        Achievement::PerfectScore,
        Achievement::Completionist,
    ];

    /// Stable id used by the progress store
    pub fn id(self) -> u32 {
        match self {
            Achievement::FirstSteps => 1,
            Achievement::TurtleSlayer => 2,
            Achievement::SpikeMaster => 3,
            Achievement::SpeedRunner => 4,
            Achievement::GhostHunter => 5,
            Achievement::PerfectScore => 6,
            Achievement::Completionist => 7,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstSteps => "First Steps",
            Achievement::TurtleSlayer => "Turtle Slayer",
            Achievement::SpikeMaster => "Spike Master",
            Achievement::SpeedRunner => "Speed Runner",
            Achievement::GhostHunter => "Ghost Hunter",
            Achievement::PerfectScore => "Perfect Score",
            Achievement::Completionist => "Completionist",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::FirstSteps => "Complete Level 1",
            Achievement::TurtleSlayer => "Kill 50 turtles",
            Achievement::SpikeMaster => "Kill 20 spike turtles",
            Achievement::SpeedRunner => "Complete level in under 60 seconds",
            Achievement::GhostHunter => "Complete Level 3",
            Achievement::PerfectScore => "Get max score on any level",
            Achievement::Completionist => "Complete all levels",
        }
    }
}

/// Unlocked set plus the unlocks not yet handed to the store
#[derive(Debug, Clone, Default)]
pub struct AchievementTracker {
    unlocked: BTreeSet<Achievement>,
    pending: Vec<Achievement>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker seeded with achievements the store already knows about
    pub fn with_unlocked(unlocked: impl IntoIterator<Item = Achievement>) -> Self {
        Self {
            unlocked: unlocked.into_iter().collect(),
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = Achievement> + '_ {
        self.unlocked.iter().copied()
    }

    /// Unlock `achievement`, emitting one notification the first time only
    ///
    /// Returns whether it was newly unlocked.
    pub fn unlock(&mut self, achievement: Achievement, events: &mut Vec<GameEvent>) -> bool {
        if !self.unlocked.insert(achievement) {
            return false;
        }
        log::info!("achievement unlocked: {} ({})", achievement.title(), achievement.id());
        self.pending.push(achievement);
        events.push(GameEvent::AchievementUnlocked(achievement));
        true
    }

    /// Unlocks waiting to be written to the store
    pub fn take_pending(&mut self) -> Vec<Achievement> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Thresholds that can trip at any point during play
pub fn check_running(
    counters: &SessionCounters,
    prior_total_score: u64,
    tracker: &mut AchievementTracker,
    events: &mut Vec<GameEvent>,
) {
    if counters.total_kills() >= TURTLE_SLAYER_KILLS {
        tracker.unlock(Achievement::TurtleSlayer, events);
    }
    if counters.spike_turtles_killed >= SPIKE_MASTER_KILLS {
        tracker.unlock(Achievement::SpikeMaster, events);
    }
    if counters.score >= PERFECT_SCORE || prior_total_score >= PERFECT_SCORE {
        tracker.unlock(Achievement::PerfectScore, events);
    }
}

/// Thresholds evaluated when `level` has just been completed
pub fn check_completion(
    level: u32,
    max_level: u32,
    counters: &SessionCounters,
    tracker: &mut AchievementTracker,
    events: &mut Vec<GameEvent>,
) {
    if level >= 1 {
        tracker.unlock(Achievement::FirstSteps, events);
    }
    if counters.elapsed_ticks < SPEED_RUNNER_SECS * TICKS_PER_SECOND as u64 {
        tracker.unlock(Achievement::SpeedRunner, events);
    }
    if level >= 3 {
        tracker.unlock(Achievement::GhostHunter, events);
    }
    if level >= max_level {
        tracker.unlock(Achievement::Completionist, events);
    }
}
