//! The player actor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Anchor;
use super::body::{ActorEvent, Body, ExitPlacement};
use super::collision::{LandingRule, resolve_platforms};
use super::layer::Layer;
use super::tick::TickInput;
use super::world::WorldGeometry;
use crate::consts::*;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Facing::Left } else { Facing::Right }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub lives: u8,
    pub on_ground: bool,
    pub facing: Facing,
    /// Id of the shell being carried (owned by the shell list)
    pub held_shell: Option<u32>,
}

impl Player {
    pub fn new(lives: u8) -> Self {
        Self {
            body: Body::new(
                PLAYER_START_X,
                PLAYER_START_Y,
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                Layer::Front,
                Anchor::BottomCenter,
            ),
            lives,
            on_ground: false,
            facing: Facing::Right,
            held_shell: None,
        }
    }

    /// Set horizontal velocity and facing from the input snapshot, and jump if grounded
    pub fn apply_input(&mut self, input: &TickInput) {
        self.body.vel.x = 0.0;
        if input.left {
            self.body.vel.x = -PLAYER_SPEED;
            self.facing = Facing::Left;
        }
        if input.right {
            self.body.vel.x = PLAYER_SPEED;
            self.facing = Facing::Right;
        }

        if input.jump && self.on_ground {
            self.body.vel.y = JUMP_POWER;
            self.on_ground = false;
        }
    }

    /// Advance one tick of movement and geometry collision
    pub fn tick(&mut self, world: &WorldGeometry, events: &mut Vec<ActorEvent>) {
        self.body.tick_cooldown();
        self.body.apply_gravity();
        self.body.integrate();

        // Only the player is held inside the screen
        if self.body.bounds.left() < 0.0 {
            self.body.bounds.set_left(0.0);
        }
        if self.body.bounds.right() > SCREEN_WIDTH {
            self.body.bounds.set_right(SCREEN_WIDTH);
        }

        let contact = resolve_platforms(
            &mut self.body.bounds,
            &mut self.body.vel,
            self.body.layer,
            world,
            LandingRule::Tolerant,
        );
        self.on_ground = contact.grounded;

        // Direction is input driven, so no reversal on teleport
        if let Some((pipe, from)) = self.body.enter_pipe(world, ExitPlacement::Feet) {
            log::debug!("player teleported via pipe {:?} {:?} -> {:?}", pipe, from, self.body.layer);
            events.push(ActorEvent::Teleported {
                pipe,
                from,
                to: self.body.layer,
                patrol: false,
            });
        }

        if self.body.below_world() {
            events.push(ActorEvent::FellOutOfWorld);
        }
    }

    /// Lose one life; respawn if any remain. Returns the remaining lives.
    pub fn take_damage(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.respawn();
        }
        self.lives
    }

    /// Back to the spawn point on the front layer, vertical motion cleared
    pub fn respawn(&mut self) {
        self.body.switch_layer(Layer::Front);
        self.body.bounds.x = PLAYER_START_X;
        self.body.bounds.y = PLAYER_START_Y;
        self.body.vel.y = 0.0;
        self.on_ground = false;
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.body.vel.y > 0.0
    }
}
