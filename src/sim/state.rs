//! Game state and core simulation types
//!
//! Everything one level instance needs lives in `GameState`: the static
//! geometry, every live actor, the per-level counters and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::achievements::{Achievement, AchievementTracker};
use super::enemy::{Enemy, EnemyKind};
use super::layer::Layer;
use super::level::{EnemySpawn, LevelSet};
use super::player::Player;
use super::projectile::{Projectile, ProjectileKind};
use super::shell::Shell;
use super::world::{PipeId, WorldGeometry};
use crate::consts::*;
use crate::ticks_to_secs;

/// Current phase of the level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level chosen, geometry and roster not yet built
    Setup,
    /// Active gameplay
    Running,
    /// Exit portal reached; waiting for the session to report and advance
    Completing,
    /// Out of lives; nothing ticks until acknowledged
    GameOver,
}

/// Per-level tallies read by scoring and achievements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub turtles_killed: u32,
    pub spike_turtles_killed: u32,
    pub ghosts_killed: u32,
    pub elapsed_ticks: u64,
    /// Stomp points earned this level
    pub score: u64,
    /// Player pipe trips
    pub portals_used: u32,
}

impl SessionCounters {
    pub fn record_kill(&mut self, kind: EnemyKind) {
        match kind {
            EnemyKind::Turtle => self.turtles_killed += 1,
            EnemyKind::SpikeTurtle => self.spike_turtles_killed += 1,
            EnemyKind::Ghost => self.ghosts_killed += 1,
        }
    }

    /// Kills that count toward the level tally (ghosts excluded)
    #[inline]
    pub fn total_kills(&self) -> u32 {
        self.turtles_killed + self.spike_turtles_killed
    }

    #[inline]
    pub fn elapsed_secs(&self) -> u32 {
        ticks_to_secs(self.elapsed_ticks)
    }
}

/// Level exit, reachable from either layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPortal {
    pub bounds: Aabb,
}

impl ExitPortal {
    pub fn new() -> Self {
        Self {
            bounds: Aabb::anchored(
                super::aabb::Anchor::Center,
                Vec2::new(EXIT_PORTAL_X, EXIT_PORTAL_Y),
                Vec2::splat(EXIT_PORTAL_SIZE),
            ),
        }
    }
}

impl Default for ExitPortal {
    fn default() -> Self {
        Self::new()
    }
}

/// Which actor an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRef {
    Player,
    Enemy(u32),
    Shell(u32),
    Projectile(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillCause {
    Stomp,
    Shell,
}

/// Game events (for observers: presentation, audio, logging, persistence)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted {
        level: u32,
    },
    /// Setup could not build the level's geometry and used the fallback floor
    LevelFallback {
        level: u32,
    },
    /// `pipe` is the entry pipe the actor went through
    Teleported {
        actor: ActorRef,
        pipe: PipeId,
        from: Layer,
        to: Layer,
        patrol: bool,
    },
    ProjectileFired {
        id: u32,
        kind: ProjectileKind,
    },
    EnemyKilled {
        id: u32,
        kind: EnemyKind,
        cause: KillCause,
    },
    ShellSpawned {
        id: u32,
    },
    ShellPickedUp {
        id: u32,
    },
    ShellThrown {
        id: u32,
    },
    PlayerDamaged {
        lives_left: u8,
    },
    ExitPortalOpened,
    LevelCompleted {
        level: u32,
        counters: SessionCounters,
    },
    /// Last level finished; play wraps around to level 1
    GameCompleted,
    GameOver {
        level: u32,
    },
    AchievementUnlocked(Achievement),
}

/// Complete state of one session's current level (deterministic given the seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Patrol decisions draw from here only
    pub rng: Pcg32,
    pub levels: LevelSet,
    /// Current level number (1-based)
    pub level: u32,
    pub max_level: u32,
    pub starting_lives: u8,
    pub phase: GamePhase,
    pub world: WorldGeometry,
    pub player: Player,
    /// Active actors (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub shells: Vec<Shell>,
    pub projectiles: Vec<Projectile>,
    pub exit_portal: Option<ExitPortal>,
    pub counters: SessionCounters,
    pub achievements: AchievementTracker,
    /// Total score carried in from the user profile and earlier levels
    pub prior_total_score: u64,
    /// Simulation tick counter across the whole session
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Session on the built-in levels, starting at level 1
    pub fn new(seed: u64) -> Self {
        Self::with_levels(LevelSet::builtin(), seed, 1, STARTING_LIVES)
    }

    /// Session on `levels`, set up at `start_level`
    pub fn with_levels(levels: LevelSet, seed: u64, start_level: u32, starting_lives: u8) -> Self {
        let max_level = levels.max_level().max(1);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            levels,
            level: start_level.clamp(1, max_level),
            max_level,
            starting_lives,
            phase: GamePhase::Setup,
            world: WorldGeometry::new(),
            player: Player::new(starting_lives),
            enemies: Vec::new(),
            shells: Vec::new(),
            projectiles: Vec::new(),
            exit_portal: None,
            counters: SessionCounters::default(),
            achievements: AchievementTracker::new(),
            prior_total_score: 0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        let level = state.level;
        state.setup_level(level);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build geometry and roster for `level`, reset counters and actors
    ///
    /// A level that fails to build falls back to a single front floor with
    /// its roster intact; a level missing from the set gets no enemies.
    pub fn setup_level(&mut self, level: u32) {
        self.phase = GamePhase::Setup;
        self.level = level;
        self.enemies.clear();
        self.shells.clear();
        self.projectiles.clear();
        self.exit_portal = None;
        self.counters = SessionCounters::default();
        self.player = Player::new(self.starting_lives);

        let (world, roster) = match self.levels.get(level) {
            Ok(spec) => match spec.build_geometry() {
                Ok(world) => (world, spec.roster.clone()),
                Err(e) => {
                    log::warn!("level {} geometry invalid ({}), using fallback", level, e);
                    self.events.push(GameEvent::LevelFallback { level });
                    (WorldGeometry::fallback(), spec.roster.clone())
                }
            },
            Err(e) => {
                log::warn!("{}, using fallback geometry", e);
                self.events.push(GameEvent::LevelFallback { level });
                (WorldGeometry::fallback(), Vec::new())
            }
        };
        self.world = world;
        for spawn in &roster {
            self.spawn_enemy(spawn);
        }

        log::info!(
            "level {} set up: {} platforms, {} pipes, {} enemies",
            level,
            self.world.platforms.len(),
            self.world.pipes.len(),
            self.enemies.len()
        );
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::LevelStarted { level });
    }

    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(
            id,
            spawn.kind,
            spawn.x,
            spawn.y,
            spawn.layer,
            spawn.stay_on_platform,
        ));
        id
    }

    /// Idle shell standing at `feet` (bottom-center)
    pub fn spawn_shell(&mut self, feet: Vec2, layer: Layer) -> u32 {
        let id = self.next_entity_id();
        self.shells.push(Shell::new(id, feet, layer));
        self.events.push(GameEvent::ShellSpawned { id });
        id
    }

    pub fn spawn_projectile(&mut self, mut projectile: Projectile) -> u32 {
        let id = self.next_entity_id();
        projectile.id = id;
        self.events.push(GameEvent::ProjectileFired {
            id,
            kind: projectile.kind,
        });
        self.projectiles.push(projectile);
        id
    }

    /// Enemies that still block the exit portal
    pub fn remaining_enemies(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.body.alive && e.kind.counts_for_clear())
            .count()
    }

    /// Shell the player is carrying, if any
    pub fn held_shell_mut(&mut self) -> Option<&mut Shell> {
        let id = self.player.held_shell?;
        self.shells.iter_mut().find(|s| s.id == id)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop dead actors and keep iteration order stable
    pub fn normalize_order(&mut self) {
        self.enemies.retain(|e| e.body.alive);
        self.shells.retain(|s| s.body.alive);
        self.projectiles.retain(|p| p.body.alive);
        if let Some(id) = self.player.held_shell
            && !self.shells.iter().any(|s| s.id == id)
        {
            self.player.held_shell = None;
        }
        self.enemies.sort_by_key(|e| e.id);
        self.shells.sort_by_key(|s| s.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
