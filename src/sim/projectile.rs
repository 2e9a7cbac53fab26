//! Enemy projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Anchor;
use super::body::{ActorEvent, Body, ExitPlacement};
use super::collision::{LandingRule, out_of_bounds, resolve_platforms};
use super::layer::{Layer, rescale_speed};
use super::world::WorldGeometry;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Dropped by ghosts: falls straight down at constant speed, hits on either layer
    Ghost,
    /// Fired sideways by spike turtles: gravity, platforms and pipes apply
    Turret,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub body: Body,
}

impl Projectile {
    fn new(kind: ProjectileKind, center: Vec2, layer: Layer, vel: Vec2) -> Self {
        let mut body = Body::anchored_at(
            center,
            Vec2::splat(PROJECTILE_SIZE),
            layer,
            Anchor::Center,
        );
        body.vel = vel;
        Self { id: 0, kind, body }
    }

    /// Straight-down ghost shot
    pub fn ghost(center: Vec2, layer: Layer) -> Self {
        let vel = Vec2::new(0.0, GHOST_PROJECTILE_SPEED * layer.speed_multiplier());
        Self::new(ProjectileKind::Ghost, center, layer, vel)
    }

    /// Horizontal shot travelling toward `direction` (sign only)
    pub fn turret(center: Vec2, layer: Layer, direction: f32) -> Self {
        let speed = TURRET_PROJECTILE_SPEED * layer.speed_multiplier();
        let vel = Vec2::new(speed * direction.signum(), 0.0);
        Self::new(ProjectileKind::Turret, center, layer, vel)
    }

    /// Whether this shot can hit a player standing on `layer`
    #[inline]
    pub fn hits_layer(&self, layer: Layer) -> bool {
        self.kind == ProjectileKind::Ghost || self.body.layer == layer
    }

    pub fn tick(&mut self, world: &WorldGeometry, events: &mut Vec<ActorEvent>) {
        self.body.tick_cooldown();

        match self.kind {
            ProjectileKind::Ghost => {
                self.body.integrate();
            }
            ProjectileKind::Turret => {
                self.body.apply_gravity();
                self.body.integrate();
                resolve_platforms(
                    &mut self.body.bounds,
                    &mut self.body.vel,
                    self.body.layer,
                    world,
                    LandingRule::FirstContact,
                );

                if let Some((pipe, from)) = self.body.enter_pipe(world, ExitPlacement::Lifted) {
                    let to = self.body.layer;
                    self.body.vel.x = -rescale_speed(self.body.vel.x, from, to);
                    events.push(ActorEvent::Teleported {
                        pipe,
                        from,
                        to,
                        patrol: false,
                    });
                }
            }
        }

        if out_of_bounds(
            &self.body.bounds,
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            PROJECTILE_BOUNDS_PADDING,
        ) {
            self.body.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Platform;

    #[test]
    fn test_ghost_shot_falls_straight() {
        let world = WorldGeometry::new();
        let mut p = Projectile::ghost(Vec2::new(200.0, 100.0), Layer::Front);
        let mut events = Vec::new();
        for _ in 0..10 {
            p.tick(&world, &mut events);
        }
        assert_eq!(p.body.bounds.center(), Vec2::new(200.0, 150.0));
        assert!(p.body.alive);

        let back = Projectile::ghost(Vec2::new(0.0, 0.0), Layer::Back);
        assert!((back.body.vel.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_ghost_shot_ignores_platforms() {
        let mut world = WorldGeometry::new();
        world.add_platform(Platform::new(0.0, 110.0, 800.0, 40.0, Layer::Front));
        let mut p = Projectile::ghost(Vec2::new(200.0, 100.0), Layer::Front);
        let mut events = Vec::new();
        for _ in 0..20 {
            p.tick(&world, &mut events);
        }
        assert!(p.body.bounds.top() > 150.0);
    }

    #[test]
    fn test_ghost_shot_hits_any_layer() {
        let p = Projectile::ghost(Vec2::ZERO, Layer::Front);
        assert!(p.hits_layer(Layer::Back));
        let t = Projectile::turret(Vec2::ZERO, Layer::Front, 1.0);
        assert!(t.hits_layer(Layer::Front));
        assert!(!t.hits_layer(Layer::Back));
    }

    #[test]
    fn test_turret_shot_lands_and_slides() {
        let mut world = WorldGeometry::new();
        world.add_platform(Platform::new(0.0, 600.0, 800.0, 40.0, Layer::Front));
        let mut p = Projectile::turret(Vec2::new(100.0, 590.0), Layer::Front, -1.0);
        let mut events = Vec::new();
        for _ in 0..5 {
            p.tick(&world, &mut events);
        }
        assert_eq!(p.body.bounds.bottom(), 600.0);
        assert_eq!(p.body.vel.x, -TURRET_PROJECTILE_SPEED);
    }

    #[test]
    fn test_turret_shot_pipe_reverses_and_rescales() {
        let mut world = WorldGeometry::new();
        let a = world.add_pipe(300.0, 100.0, Layer::Front, Vec2::new(700.0, 563.0), false);
        let b = world.add_pipe(0.0, 400.0, Layer::Back, Vec2::new(555.0, 483.0), false);
        world.link(a, b).unwrap();

        let mut p = Projectile::turret(Vec2::new(295.0, 130.0), Layer::Front, 1.0);
        let mut events = Vec::new();
        p.tick(&world, &mut events);

        assert_eq!(p.body.layer, Layer::Back);
        assert!((p.body.vel.x - (-3.6)).abs() < 1e-4);
        assert!((p.body.bounds.w - 7.2).abs() < 1e-4);
        assert!((p.body.bounds.center_y() - 433.0).abs() < 1e-4);
        assert_eq!(p.body.teleport_cooldown, TELEPORT_COOLDOWN_TICKS);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_expires_past_padding() {
        let world = WorldGeometry::new();
        let mut p = Projectile::turret(Vec2::new(-55.0, 300.0), Layer::Front, -1.0);
        let mut events = Vec::new();
        p.tick(&world, &mut events);
        assert!(!p.body.alive);
    }
}
