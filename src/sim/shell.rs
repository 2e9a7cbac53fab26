//! Shells: dropped by slain turtles, carried and thrown by the player

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Anchor;
use super::body::{ActorEvent, Body, ExitPlacement};
use super::collision::{LandingRule, resolve_platforms};
use super::layer::{Layer, rescale_speed};
use super::player::{Facing, Player};
use super::world::WorldGeometry;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellState {
    /// Resting where it spawned, waiting to be picked up
    Idle,
    /// Carried next to the player
    Held,
    /// In flight after a throw
    Thrown,
}

#[derive(Debug, Clone)]
pub struct Shell {
    pub id: u32,
    pub body: Body,
    pub state: ShellState,
    /// Ticks spent in flight
    pub lifetime: u32,
}

impl Shell {
    /// Idle shell with its bottom-center at `feet`
    pub fn new(id: u32, feet: Vec2, layer: Layer) -> Self {
        Self {
            id,
            body: Body::anchored_at(
                feet,
                Vec2::new(SHELL_WIDTH, SHELL_HEIGHT),
                layer,
                Anchor::BottomCenter,
            ),
            state: ShellState::Idle,
            lifetime: 0,
        }
    }

    #[inline]
    pub fn is_thrown(&self) -> bool {
        self.state == ShellState::Thrown
    }

    pub fn pick_up(&mut self) {
        self.state = ShellState::Held;
        self.body.vel = Vec2::ZERO;
    }

    /// Track the carrier: same layer, offset toward its facing side
    pub fn follow(&mut self, player: &Player) {
        if self.body.layer != player.body.layer {
            self.body.switch_layer(player.body.layer);
        }
        let offset = HELD_SHELL_OFFSET * player.facing.sign();
        self.body.bounds.set_center(Vec2::new(
            player.body.bounds.center_x() + offset,
            player.body.bounds.center_y(),
        ));
    }

    /// Release at the fixed throw speed in the facing direction
    pub fn throw(&mut self, facing: Facing) {
        self.state = ShellState::Thrown;
        self.lifetime = 0;
        self.body.vel = Vec2::new(SHELL_THROW_SPEED * facing.sign(), 0.0);
    }

    pub fn tick(&mut self, world: &WorldGeometry, events: &mut Vec<ActorEvent>) {
        self.body.tick_cooldown();
        if self.state != ShellState::Thrown {
            return;
        }

        self.body.apply_gravity();
        self.body.integrate();
        resolve_platforms(
            &mut self.body.bounds,
            &mut self.body.vel,
            self.body.layer,
            world,
            LandingRule::FirstContact,
        );

        if let Some((pipe, from)) = self.body.enter_pipe(world, ExitPlacement::Feet) {
            let to = self.body.layer;
            self.body.vel.x = -rescale_speed(self.body.vel.x, from, to);
            events.push(ActorEvent::Teleported {
                pipe,
                from,
                to,
                patrol: false,
            });
        }

        self.lifetime += 1;
        let b = &self.body.bounds;
        let gone = b.left() > SCREEN_WIDTH + SHELL_BOUNDS_PADDING
            || b.right() < -SHELL_BOUNDS_PADDING
            || b.top() > SCREEN_HEIGHT;
        if self.lifetime >= SHELL_LIFETIME_TICKS || gone {
            self.body.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Platform;

    #[test]
    fn test_idle_shell_stays_put() {
        let world = WorldGeometry::new();
        let mut shell = Shell::new(1, Vec2::new(200.0, 600.0), Layer::Front);
        let mut events = Vec::new();
        for _ in 0..100 {
            shell.tick(&world, &mut events);
        }
        assert_eq!(shell.body.bounds.bottom(), 600.0);
        assert!(shell.body.alive);
    }

    #[test]
    fn test_spawn_anchor_and_back_size() {
        let shell = Shell::new(1, Vec2::new(200.0, 483.0), Layer::Back);
        assert!((shell.body.bounds.w - 18.0).abs() < 1e-4);
        assert!((shell.body.bounds.bottom() - 483.0).abs() < 1e-4);
        assert!((shell.body.bounds.center_x() - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_held_shell_follows_facing_and_layer() {
        let mut player = Player::new(3);
        let mut shell = Shell::new(1, Vec2::ZERO, Layer::Front);
        shell.pick_up();
        shell.follow(&player);
        assert!((shell.body.bounds.center_x() - (player.body.bounds.center_x() + HELD_SHELL_OFFSET)).abs() < 1e-4);

        player.facing = Facing::Left;
        player.body.switch_layer(Layer::Back);
        shell.follow(&player);
        assert_eq!(shell.body.layer, Layer::Back);
        assert!((shell.body.bounds.center_x() - (player.body.bounds.center_x() - HELD_SHELL_OFFSET)).abs() < 1e-4);
    }

    #[test]
    fn test_thrown_shell_flies_lands_and_expires() {
        let mut world = WorldGeometry::new();
        world.add_platform(Platform::new(0.0, 600.0, 835.0, 40.0, Layer::Front));
        let mut shell = Shell::new(1, Vec2::new(100.0, 590.0), Layer::Front);
        shell.pick_up();
        shell.throw(Facing::Left);
        assert_eq!(shell.body.vel.x, -SHELL_THROW_SPEED);

        let mut events = Vec::new();
        for _ in 0..5 {
            shell.tick(&world, &mut events);
        }
        assert_eq!(shell.body.bounds.bottom(), 600.0);
        assert!(shell.body.alive);

        // Slow it down so only the lifetime can end it
        shell.body.vel.x = 0.5;
        for _ in 5..SHELL_LIFETIME_TICKS - 1 {
            shell.tick(&world, &mut events);
        }
        assert!(shell.body.alive);
        shell.tick(&world, &mut events);
        assert!(!shell.body.alive);
    }

    #[test]
    fn test_thrown_shell_dies_past_side_padding() {
        let world = WorldGeometry::new();
        let mut shell = Shell::new(1, Vec2::new(-SHELL_BOUNDS_PADDING - 10.0, 100.0), Layer::Front);
        shell.throw(Facing::Left);
        let mut events = Vec::new();
        shell.tick(&world, &mut events);
        assert!(!shell.body.alive);
    }

    #[test]
    fn test_thrown_shell_dies_below_screen() {
        let world = WorldGeometry::new();
        let mut shell = Shell::new(1, Vec2::new(100.0, SCREEN_HEIGHT + 20.0), Layer::Front);
        shell.throw(Facing::Right);
        let mut events = Vec::new();
        shell.tick(&world, &mut events);
        assert!(!shell.body.alive);
    }

    #[test]
    fn test_thrown_shell_pipe_reverses_and_slows() {
        let mut world = WorldGeometry::new();
        let a = world.add_pipe(120.0, 560.0, Layer::Front, Vec2::new(750.0, 563.0), false);
        let b = world.add_pipe(-1000.0, 0.0, Layer::Back, Vec2::new(555.0, 483.0), false);
        world.link(a, b).unwrap();

        let mut shell = Shell::new(1, Vec2::new(100.0, 600.0), Layer::Front);
        shell.throw(Facing::Right);
        let mut events = Vec::new();
        shell.tick(&world, &mut events);

        assert_eq!(shell.body.layer, Layer::Back);
        assert!((shell.body.vel.x - (-SHELL_THROW_SPEED * 0.6)).abs() < 1e-4);
        assert!((shell.body.bounds.bottom() - 483.0).abs() < 1e-4);
        assert_eq!(events.len(), 1);
    }
}
