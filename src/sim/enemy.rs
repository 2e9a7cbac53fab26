//! Enemy actors: walking turtles, spike turtles that shoot, and flying ghosts

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Anchor;
use super::body::{ActorEvent, Body, ExitPlacement};
use super::collision::{LandingRule, pipe_nearby, resolve_platforms};
use super::layer::Layer;
use super::projectile::Projectile;
use super::world::WorldGeometry;
use crate::consts::*;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Turtle,
    SpikeTurtle,
    Ghost,
}

impl EnemyKind {
    /// Front-layer size
    pub fn base_size(self) -> Vec2 {
        match self {
            EnemyKind::Turtle => Vec2::new(44.0, 25.0),
            EnemyKind::SpikeTurtle => Vec2::new(44.0, 39.0),
            EnemyKind::Ghost => Vec2::new(27.0, 30.0),
        }
    }

    /// Ticks between shots, for ranged variants
    pub fn shoot_interval(self) -> Option<u32> {
        match self {
            EnemyKind::Turtle => None,
            EnemyKind::SpikeTurtle => Some(SPIKE_SHOOT_TICKS),
            EnemyKind::Ghost => Some(GHOST_SHOOT_TICKS),
        }
    }

    /// Ghosts don't count toward clearing a level
    #[inline]
    pub fn counts_for_clear(self) -> bool {
        self != EnemyKind::Ghost
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Turtle => "turtle",
            EnemyKind::SpikeTurtle => "spike_turtle",
            EnemyKind::Ghost => "ghost",
        }
    }
}

/// What an enemy can see of the rest of the level during its tick
pub struct EnemyContext<'a> {
    pub world: &'a WorldGeometry,
    pub player_layer: Layer,
    pub player_center_x: f32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    /// +1 right, -1 left
    pub direction: f32,
    /// Horizontal speed on the current layer
    pub speed: f32,
    /// Pinned enemies never use pipes
    pub stay_on_platform: bool,
    pub shoot_timer: u32,
    patrol_timer: u32,
    patrol_cooldown: u32,
    /// Ghost hover: spawn height and oscillation phase
    base_y: f32,
    float_phase: f32,
}

impl Enemy {
    /// Enemy with its top-left corner at (`x`, `y`)
    pub fn new(id: u32, kind: EnemyKind, x: f32, y: f32, layer: Layer, stay_on_platform: bool) -> Self {
        let body = Body::new(x, y, kind.base_size(), layer, Anchor::Center);
        Self {
            id,
            kind,
            base_y: body.bounds.y,
            body,
            direction: 1.0,
            speed: ENEMY_SPEED * layer.speed_multiplier(),
            stay_on_platform,
            shoot_timer: 0,
            patrol_timer: 0,
            patrol_cooldown: 0,
            float_phase: 0.0,
        }
    }

    /// Recompute layer-dependent speed after the body changed layer
    fn sync_speed(&mut self) {
        self.speed = ENEMY_SPEED * self.body.layer.speed_multiplier();
    }

    /// Whether this enemy takes voluntary pipe hops
    #[inline]
    pub fn patrols(&self) -> bool {
        !self.stay_on_platform && self.kind != EnemyKind::Ghost
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        ctx: &EnemyContext,
        rng: &mut R,
        events: &mut Vec<ActorEvent>,
    ) {
        self.body.tick_cooldown();
        if self.patrol_cooldown > 0 {
            self.patrol_cooldown -= 1;
        }

        match self.kind {
            EnemyKind::Ghost => self.hover(events),
            EnemyKind::Turtle | EnemyKind::SpikeTurtle => self.walk(ctx, rng, events),
        }

        if self.body.below_world() {
            log::debug!("{} {} fell out of the world", self.kind.as_str(), self.id);
            self.body.alive = false;
        }
    }

    /// Ghost flight: sinusoidal bob around the spawn height, bounce off screen margins
    fn hover(&mut self, events: &mut Vec<ActorEvent>) {
        // Peak vertical speed equals GHOST_SPEED_Y
        self.float_phase += GHOST_SPEED_Y / GHOST_FLOAT_RANGE;
        let target_y = self.base_y + GHOST_FLOAT_RANGE * self.float_phase.sin();
        let mult = self.body.layer.speed_multiplier();
        self.body.vel = Vec2::new(GHOST_SPEED_X * mult * self.direction, target_y - self.body.bounds.y);
        self.body.integrate();

        if self.body.bounds.left() < GHOST_SCREEN_MARGIN {
            self.direction = 1.0;
        } else if self.body.bounds.right() > SCREEN_WIDTH - GHOST_SCREEN_MARGIN {
            self.direction = -1.0;
        }

        self.shoot_timer += 1;
        if self.shoot_timer >= GHOST_SHOOT_TICKS {
            self.shoot_timer = 0;
            events.push(ActorEvent::Fired(Projectile::ghost(
                self.body.bounds.center(),
                self.body.layer,
            )));
        }
    }

    fn walk<R: Rng + ?Sized>(&mut self, ctx: &EnemyContext, rng: &mut R, events: &mut Vec<ActorEvent>) {
        self.body.apply_gravity();
        self.body.vel.x = self.speed * self.direction;
        self.body.integrate();

        let contact = resolve_platforms(
            &mut self.body.bounds,
            &mut self.body.vel,
            self.body.layer,
            ctx.world,
            LandingRule::FirstContact,
        );

        // Turn around just before walking off the platform
        if let Some(plat) = contact.platform.and_then(|i| ctx.world.platforms.get(i)) {
            let plat = plat.bounds;
            if self.body.bounds.left() <= plat.left() + PLATFORM_EDGE_MARGIN {
                self.body.bounds.set_left(plat.left() + PLATFORM_EDGE_MARGIN);
                self.direction = 1.0;
            } else if self.body.bounds.right() >= plat.right() - PLATFORM_EDGE_MARGIN {
                self.body.bounds.set_right(plat.right() - PLATFORM_EDGE_MARGIN);
                self.direction = -1.0;
            }
        }

        let mut teleported = false;
        if !self.stay_on_platform {
            if let Some((pipe, from)) = self.body.enter_pipe(ctx.world, ExitPlacement::Feet) {
                self.body.vel.y = 0.0;
                self.direction = -self.direction;
                self.sync_speed();
                teleported = true;
                log::debug!(
                    "{} {} teleported via pipe {:?} {:?} -> {:?}",
                    self.kind.as_str(),
                    self.id,
                    pipe,
                    from,
                    self.body.layer
                );
                events.push(ActorEvent::Teleported {
                    pipe,
                    from,
                    to: self.body.layer,
                    patrol: false,
                });
            }
        }

        if self.kind == EnemyKind::SpikeTurtle {
            self.aim(ctx, events);
        }

        if !teleported {
            self.patrol(ctx.world, rng, events);
        }
    }

    /// Spike turtles shoot toward the player while sharing its layer
    fn aim(&mut self, ctx: &EnemyContext, events: &mut Vec<ActorEvent>) {
        if ctx.player_layer != self.body.layer {
            self.shoot_timer = 0;
            return;
        }
        self.shoot_timer += 1;
        if self.shoot_timer >= SPIKE_SHOOT_TICKS {
            self.shoot_timer = 0;
            let center = self.body.bounds.center();
            let direction = if ctx.player_center_x > center.x { 1.0 } else { -1.0 };
            events.push(ActorEvent::Fired(Projectile::turret(center, self.body.layer, direction)));
        }
    }

    /// Every few seconds, maybe hop through a nearby pipe for variety
    fn patrol<R: Rng + ?Sized>(&mut self, world: &WorldGeometry, rng: &mut R, events: &mut Vec<ActorEvent>) {
        if !self.patrols() || self.patrol_cooldown > 0 {
            return;
        }
        self.patrol_timer += 1;
        if self.patrol_timer < PATROL_CHECK_TICKS {
            return;
        }
        self.patrol_timer = 0;

        if !self.body.can_teleport() {
            return;
        }
        let Some(pipe) = pipe_nearby(self.body.bounds.center(), self.body.layer, world, PATROL_RADIUS)
        else {
            return;
        };
        if !rng.random_bool(PATROL_CHANCE) {
            return;
        }
        let Some(dest) = world.destination(pipe) else {
            return;
        };

        let from = self.body.layer;
        self.body.teleport(dest, ExitPlacement::Feet);
        self.body.vel.y = 0.0;
        self.direction = -self.direction;
        self.sync_speed();
        self.patrol_cooldown = PATROL_COOLDOWN_TICKS;
        log::debug!("{} {} patrol hop via pipe {:?}", self.kind.as_str(), self.id, pipe);
        events.push(ActorEvent::Teleported {
            pipe,
            from,
            to: self.body.layer,
            patrol: true,
        });
    }
}
