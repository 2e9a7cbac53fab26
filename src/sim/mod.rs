//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod aabb;
pub mod achievements;
pub mod body;
pub mod collision;
pub mod enemy;
pub mod interact;
pub mod layer;
pub mod level;
pub mod player;
pub mod projectile;
pub mod shell;
pub mod state;
pub mod tick;
pub mod view;
pub mod world;

pub use aabb::{Aabb, Anchor};
pub use achievements::{Achievement, AchievementTracker};
pub use enemy::{Enemy, EnemyKind};
pub use layer::Layer;
pub use level::{LevelSet, LevelSpec};
pub use player::{Facing, Player};
pub use projectile::{Projectile, ProjectileKind};
pub use shell::{Shell, ShellState};
pub use state::{ActorRef, ExitPortal, GameEvent, GamePhase, GameState, KillCause, SessionCounters};
pub use tick::{TickInput, acknowledge_game_over, advance_level, tick};
pub use view::{ActorView, VisualState, actor_views};
pub use world::{PipeId, WorldGeometry};
