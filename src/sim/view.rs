//! Read-only presentation snapshot
//!
//! A renderer gets boxes, layers and a visual tag per actor and picks art
//! through a `SpriteSource` it owns. Nothing here touches assets.

use serde::Serialize;

use super::aabb::Aabb;
use super::enemy::EnemyKind;
use super::layer::Layer;
use super::player::Facing;
use super::projectile::ProjectileKind;
use super::shell::ShellState;
use super::state::GameState;
use super::world::WorldGeometry;

/// What an actor looks like right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualState {
    Player { grounded: bool, facing: Facing },
    Enemy { kind: EnemyKind, facing: Facing },
    Shell { state: ShellState },
    Projectile { kind: ProjectileKind },
    ExitPortal,
}

impl VisualState {
    /// Asset key for this state, e.g. `jump_left` or `spike_turtle_right`
    pub fn sprite_key(&self) -> String {
        match self {
            VisualState::Player { grounded, facing } => {
                let pose = if *grounded { "static" } else { "jump" };
                format!("{}_{}", pose, facing_str(*facing))
            }
            VisualState::Enemy { kind, facing } => {
                format!("{}_{}", kind.as_str(), facing_str(*facing))
            }
            VisualState::Shell { .. } => "shell".to_string(),
            VisualState::Projectile { kind } => match kind {
                ProjectileKind::Ghost => "ghost_projectile".to_string(),
                ProjectileKind::Turret => "turret_projectile".to_string(),
            },
            VisualState::ExitPortal => "exit_portal".to_string(),
        }
    }

    /// Flat colour drawn when no sprite is available
    pub fn fallback_color(&self) -> [u8; 3] {
        match self {
            VisualState::Player { .. } => [255, 255, 0],
            VisualState::Enemy { kind, .. } => match kind {
                EnemyKind::Turtle => [50, 200, 50],
                EnemyKind::SpikeTurtle => [138, 43, 226],
                EnemyKind::Ghost => [200, 200, 200],
            },
            VisualState::Shell { .. } => [101, 67, 33],
            VisualState::Projectile { .. } => [220, 50, 50],
            VisualState::ExitPortal => [255, 215, 0],
        }
    }
}

fn facing_str(facing: Facing) -> &'static str {
    match facing {
        Facing::Left => "left",
        Facing::Right => "right",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorView {
    pub bounds: Aabb,
    pub layer: Layer,
    pub visual: VisualState,
}

/// Static scenery piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneryView {
    pub bounds: Aabb,
    pub layer: Layer,
    pub pipe: bool,
    pub color: [u8; 3],
}

/// Asset lookup owned by the renderer
pub trait SpriteSource {
    type Sprite;

    fn sprite(&self, key: &str) -> Option<&Self::Sprite>;
}

/// Resolved art for one actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Appearance<'a, S> {
    Sprite(&'a S),
    /// Missing asset: draw a flat box in this colour
    Fallback([u8; 3]),
}

/// Pick the sprite for `view`, falling back to its flat colour
pub fn appearance<'a, S: SpriteSource>(source: &'a S, view: &ActorView) -> Appearance<'a, S::Sprite> {
    match source.sprite(&view.visual.sprite_key()) {
        Some(sprite) => Appearance::Sprite(sprite),
        None => Appearance::Fallback(view.visual.fallback_color()),
    }
}

fn draw_order(layer: Layer) -> u8 {
    match layer {
        Layer::Back => 0,
        Layer::Front => 1,
    }
}

/// Every actor in draw order: back layer first, the player last within its layer
pub fn actor_views(state: &GameState) -> Vec<ActorView> {
    let mut views = Vec::with_capacity(
        state.enemies.len() + state.shells.len() + state.projectiles.len() + 2,
    );

    for enemy in &state.enemies {
        views.push(ActorView {
            bounds: enemy.body.bounds,
            layer: enemy.body.layer,
            visual: VisualState::Enemy {
                kind: enemy.kind,
                facing: Facing::from_sign(enemy.direction),
            },
        });
    }
    for shell in &state.shells {
        views.push(ActorView {
            bounds: shell.body.bounds,
            layer: shell.body.layer,
            visual: VisualState::Shell { state: shell.state },
        });
    }
    for projectile in &state.projectiles {
        views.push(ActorView {
            bounds: projectile.body.bounds,
            layer: projectile.body.layer,
            visual: VisualState::Projectile {
                kind: projectile.kind,
            },
        });
    }
    if let Some(portal) = state.exit_portal {
        views.push(ActorView {
            bounds: portal.bounds,
            layer: Layer::Front,
            visual: VisualState::ExitPortal,
        });
    }
    views.push(ActorView {
        bounds: state.player.body.bounds,
        layer: state.player.body.layer,
        visual: VisualState::Player {
            grounded: state.player.on_ground,
            facing: state.player.facing,
        },
    });

    // Stable sort keeps insertion order within a layer
    views.sort_by_key(|v| draw_order(v.layer));
    views
}

/// Platforms and pipes in draw order, back layer first
pub fn scenery_views(world: &WorldGeometry) -> Vec<SceneryView> {
    let platforms = world.platforms.iter().map(|p| SceneryView {
        bounds: p.bounds,
        layer: p.layer,
        pipe: false,
        color: match p.layer {
            Layer::Front => [50, 100, 220],
            Layer::Back => [220, 50, 50],
        },
    });
    let pipes = world.pipes.iter().map(|p| SceneryView {
        bounds: p.bounds,
        layer: p.layer,
        pipe: true,
        color: [50, 200, 50],
    });
    let mut views: Vec<SceneryView> = platforms.chain(pipes).collect();
    views.sort_by_key(|v| draw_order(v.layer));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Atlas(HashMap<String, u32>);

    impl SpriteSource for Atlas {
        type Sprite = u32;

        fn sprite(&self, key: &str) -> Option<&u32> {
            self.0.get(key)
        }
    }

    #[test]
    fn test_sprite_keys() {
        let airborne = VisualState::Player {
            grounded: false,
            facing: Facing::Left,
        };
        assert_eq!(airborne.sprite_key(), "jump_left");
        let spike = VisualState::Enemy {
            kind: EnemyKind::SpikeTurtle,
            facing: Facing::Right,
        };
        assert_eq!(spike.sprite_key(), "spike_turtle_right");
        assert_eq!(VisualState::ExitPortal.sprite_key(), "exit_portal");
    }

    #[test]
    fn test_back_layer_draws_first() {
        let state = GameState::new(1);
        let views = actor_views(&state);
        assert_eq!(views.len(), 5);
        let first_front = views.iter().position(|v| v.layer == Layer::Front).unwrap();
        assert!(views[..first_front].iter().all(|v| v.layer == Layer::Back));
        assert!(views[first_front..].iter().all(|v| v.layer == Layer::Front));
        assert!(matches!(views.last().unwrap().visual, VisualState::Player { .. }));

        let scenery = scenery_views(&state.world);
        assert_eq!(scenery.len(), 16);
        assert_eq!(scenery[0].layer, Layer::Back);
    }

    #[test]
    fn test_missing_sprite_falls_back_to_colour() {
        let state = GameState::new(1);
        let views = actor_views(&state);
        let player = views.last().unwrap();

        let empty = Atlas(HashMap::new());
        assert_eq!(appearance(&empty, player), Appearance::Fallback([255, 255, 0]));

        let atlas = Atlas(HashMap::from([(player.visual.sprite_key(), 7)]));
        assert_eq!(appearance(&atlas, player), Appearance::Sprite(&7));
    }
}
