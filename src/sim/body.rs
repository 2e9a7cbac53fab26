//! Physical state shared by every actor
//!
//! A `Body` owns the actor's box, layer, velocity and teleport cooldown.
//! Layer switches and pipe teleports go through here so that every actor
//! rescales and re-arms its cooldown the same way.

use glam::Vec2;

use super::aabb::{Aabb, Anchor};
use super::collision::pipe_contact;
use super::layer::Layer;
use super::projectile::Projectile;
use super::world::{Destination, PipeId, WorldGeometry};
use crate::consts::*;

/// How a traveller is placed at a pipe's exit point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPlacement {
    /// Horizontal center on the exit x, bottom on the exit y
    Feet,
    /// Center on the exit x, `PROJECTILE_EXIT_LIFT` above the exit y
    Lifted,
}

/// Something an actor did during its own tick that the level must know about
#[derive(Debug, Clone)]
pub enum ActorEvent {
    Teleported {
        pipe: PipeId,
        from: Layer,
        to: Layer,
        /// Voluntary patrol hop rather than walking into the pipe
        patrol: bool,
    },
    /// A ranged enemy fired
    Fired(Projectile),
    FellOutOfWorld,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub bounds: Aabb,
    pub layer: Layer,
    pub vel: Vec2,
    /// Front-layer size
    pub base_size: Vec2,
    /// Point kept fixed when the box is rescaled
    pub anchor: Anchor,
    /// Ticks until the next teleport is allowed
    pub teleport_cooldown: u32,
    pub alive: bool,
}

impl Body {
    /// Body with its top-left corner at (`x`, `y`), sized for `layer`
    pub fn new(x: f32, y: f32, base_size: Vec2, layer: Layer, anchor: Anchor) -> Self {
        let size = layer.scaled(base_size);
        Self {
            bounds: Aabb::new(x, y, size.x, size.y),
            layer,
            vel: Vec2::ZERO,
            base_size,
            anchor,
            teleport_cooldown: 0,
            alive: true,
        }
    }

    /// Body with its anchor at `point`, sized for `layer`
    pub fn anchored_at(point: Vec2, base_size: Vec2, layer: Layer, anchor: Anchor) -> Self {
        let mut body = Self::new(0.0, 0.0, base_size, layer, anchor);
        body.bounds = Aabb::anchored(anchor, point, body.bounds.size());
        body
    }

    /// Move to `layer`, replacing the box with one scaled for it about the anchor
    pub fn switch_layer(&mut self, layer: Layer) {
        self.layer = layer;
        self.bounds = self.bounds.resized(self.anchor, layer.scaled(self.base_size));
    }

    #[inline]
    pub fn tick_cooldown(&mut self) {
        if self.teleport_cooldown > 0 {
            self.teleport_cooldown -= 1;
        }
    }

    #[inline]
    pub fn can_teleport(&self) -> bool {
        self.teleport_cooldown == 0
    }

    #[inline]
    pub fn apply_gravity(&mut self) {
        self.vel.y += GRAVITY;
    }

    #[inline]
    pub fn integrate(&mut self) {
        self.bounds.translate(self.vel);
    }

    /// Fell past the bottom of the world
    #[inline]
    pub fn below_world(&self) -> bool {
        self.bounds.top() > SCREEN_HEIGHT
    }

    /// Move through a pipe to `dest`: place at the fixed exit, switch layer, arm cooldown
    pub fn teleport(&mut self, dest: Destination, placement: ExitPlacement) {
        match placement {
            ExitPlacement::Feet => {
                self.bounds.set_center_x(dest.point.x);
                self.bounds.set_bottom(dest.point.y);
            }
            ExitPlacement::Lifted => {
                self.bounds
                    .set_center(Vec2::new(dest.point.x, dest.point.y - PROJECTILE_EXIT_LIFT));
            }
        }
        self.switch_layer(dest.layer);
        self.teleport_cooldown = TELEPORT_COOLDOWN_TICKS;
    }

    /// Teleport through an overlapping same-layer pipe, if the cooldown allows
    ///
    /// Returns the pipe entered and the layer left behind.
    pub fn enter_pipe(
        &mut self,
        world: &WorldGeometry,
        placement: ExitPlacement,
    ) -> Option<(PipeId, Layer)> {
        if !self.can_teleport() {
            return None;
        }
        let pipe = pipe_contact(&self.bounds, self.layer, world)?;
        let dest = world.destination(pipe)?;
        let from = self.layer;
        self.teleport(dest, placement);
        Some((pipe, from))
    }
}
