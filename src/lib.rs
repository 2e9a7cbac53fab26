//! Depth Clash - a two-layer platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, collisions, level state machine)
//! - `session`: Level/session controller wiring the simulation to its collaborators
//! - `persistence`: Progress store contract and scoring
//! - `platform`: Input snapshot from pressed keys
//! - `settings`: Data-driven configuration

pub mod error;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, PersistenceError};
pub use session::{Session, UserProfile};
pub use settings::Settings;

/// Game configuration constants
///
/// All speeds are in pixels per tick; screen y grows downward.
pub mod consts {
    /// Simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const SCREEN_WIDTH: f32 = 835.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;

    /// Downward acceleration for ground actors
    pub const GRAVITY: f32 = 0.8;
    /// Upward impulse applied on jump
    pub const JUMP_POWER: f32 = -15.0;
    /// Upward velocity after stomping an enemy
    pub const STOMP_BOUNCE: f32 = -8.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Player spawn (top-left corner)
    pub const PLAYER_START_X: f32 = 417.0;
    pub const PLAYER_START_Y: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 37.0;
    pub const PLAYER_HEIGHT: f32 = 59.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Frames an actor must wait after a teleport (0.5s)
    pub const TELEPORT_COOLDOWN_TICKS: u32 = 30;

    /// Shell tuning
    pub const SHELL_WIDTH: f32 = 30.0;
    pub const SHELL_HEIGHT: f32 = 20.0;
    pub const SHELL_THROW_SPEED: f32 = 8.0;
    pub const SHELL_LIFETIME_TICKS: u32 = 3 * TICKS_PER_SECOND;
    pub const HELD_SHELL_OFFSET: f32 = 20.0;
    /// Thrown shells vanish this far past either horizontal screen edge
    pub const SHELL_BOUNDS_PADDING: f32 = 500.0;

    /// Projectile tuning
    pub const PROJECTILE_SIZE: f32 = 12.0;
    pub const TURRET_PROJECTILE_SPEED: f32 = 6.0;
    pub const GHOST_PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_BOUNDS_PADDING: f32 = 50.0;
    /// Projectiles exit a pipe this far above its anchor
    pub const PROJECTILE_EXIT_LIFT: f32 = 50.0;

    /// Enemy tuning
    pub const ENEMY_SPEED: f32 = 1.0;
    pub const GHOST_SPEED_X: f32 = 2.0;
    pub const GHOST_SPEED_Y: f32 = 2.5;
    pub const GHOST_FLOAT_RANGE: f32 = 150.0;
    pub const GHOST_SCREEN_MARGIN: f32 = 50.0;
    pub const PLATFORM_EDGE_MARGIN: f32 = 5.0;
    pub const SPIKE_SHOOT_TICKS: u32 = 4 * TICKS_PER_SECOND;
    pub const GHOST_SHOOT_TICKS: u32 = 5 * TICKS_PER_SECOND;

    /// Patrol pipe use
    pub const PATROL_CHECK_TICKS: u32 = 3 * TICKS_PER_SECOND;
    pub const PATROL_CHANCE: f64 = 0.3;
    pub const PATROL_RADIUS: f32 = 80.0;
    pub const PATROL_COOLDOWN_TICKS: u32 = 120;

    /// Player may land on or bump into a platform only within this many pixels of its face
    pub const LANDING_TOLERANCE: f32 = 20.0;

    /// Exit portal (center) shown once every non-ghost enemy is gone
    pub const EXIT_PORTAL_X: f32 = 417.0;
    pub const EXIT_PORTAL_Y: f32 = 550.0;
    pub const EXIT_PORTAL_SIZE: f32 = 60.0;

    /// Points for a stomp kill
    pub const STOMP_POINTS: u64 = 100;
}

/// Convert a tick count to whole seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> u32 {
    (ticks / consts::TICKS_PER_SECOND as u64) as u32
}
