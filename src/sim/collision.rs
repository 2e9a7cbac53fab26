//! Collision detection and response against static geometry
//!
//! Only vertical resolution happens here: actors land on platform tops and
//! bump their heads on undersides. Horizontal edges are handled by the
//! actors themselves (patrol reversal, screen clamp).

use glam::Vec2;

use super::aabb::Aabb;
use super::layer::Layer;
use super::world::{PipeId, WorldGeometry};
use crate::consts::LANDING_TOLERANCE;

/// How strictly a falling actor snaps onto platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingRule {
    /// Land only when the feet are within `LANDING_TOLERANCE` of the top.
    /// Also stops upward motion against undersides. Checks every platform.
    Tolerant,
    /// Land on the first overlapping platform while falling
    FirstContact,
}

/// Result of resolving an actor against platforms
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlatformContact {
    /// Actor is standing on a platform
    pub grounded: bool,
    /// Index of the platform landed on
    pub platform: Option<usize>,
    /// Actor hit a platform underside
    pub ceiling: bool,
}

/// Resolve `bounds` against same-layer platforms, zeroing vertical velocity on contact
pub fn resolve_platforms(
    bounds: &mut Aabb,
    vel: &mut Vec2,
    layer: Layer,
    world: &WorldGeometry,
    rule: LandingRule,
) -> PlatformContact {
    let mut contact = PlatformContact::default();

    for (index, platform) in world.platforms_on(layer) {
        let plat = &platform.bounds;
        if !bounds.overlaps(plat) {
            continue;
        }

        match rule {
            LandingRule::Tolerant => {
                if vel.y > 0.0 && bounds.bottom() <= plat.top() + LANDING_TOLERANCE {
                    bounds.set_bottom(plat.top());
                    vel.y = 0.0;
                    contact.grounded = true;
                    contact.platform = Some(index);
                } else if vel.y < 0.0 && bounds.top() >= plat.bottom() - LANDING_TOLERANCE {
                    bounds.set_top(plat.bottom());
                    vel.y = 0.0;
                    contact.ceiling = true;
                }
            }
            LandingRule::FirstContact => {
                if vel.y > 0.0 {
                    bounds.set_bottom(plat.top());
                    vel.y = 0.0;
                    contact.grounded = true;
                    contact.platform = Some(index);
                    break;
                }
            }
        }
    }

    contact
}

/// First linked pipe on `layer` that `bounds` overlaps
pub fn pipe_contact(bounds: &Aabb, layer: Layer, world: &WorldGeometry) -> Option<PipeId> {
    world
        .pipes_on(layer)
        .find(|(_, pipe)| bounds.overlaps(&pipe.bounds))
        .map(|(id, _)| id)
}

/// First linked pipe on `layer` whose center lies within `radius` on both axes
pub fn pipe_nearby(center: Vec2, layer: Layer, world: &WorldGeometry, radius: f32) -> Option<PipeId> {
    world
        .pipes_on(layer)
        .find(|(_, pipe)| {
            let d = (pipe.bounds.center() - center).abs();
            d.x < radius && d.y < radius
        })
        .map(|(id, _)| id)
}

/// Whether `bounds` has left the screen plus `padding` on any side
pub fn out_of_bounds(bounds: &Aabb, width: f32, height: f32, padding: f32) -> bool {
    bounds.right() < -padding
        || bounds.left() > width + padding
        || bounds.top() > height + padding
        || bounds.bottom() < -padding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Platform;

    fn floor_world() -> WorldGeometry {
        let mut world = WorldGeometry::new();
        world.add_platform(Platform::new(0.0, 600.0, 800.0, 40.0, Layer::Front));
        world.add_platform(Platform::new(0.0, 300.0, 800.0, 20.0, Layer::Back));
        world
    }

    #[test]
    fn test_landing_snaps_to_top() {
        let world = floor_world();
        let mut b = Aabb::new(100.0, 550.0, 37.0, 59.0); // bottom 609
        let mut vel = Vec2::new(0.0, 9.0);
        let c = resolve_platforms(&mut b, &mut vel, Layer::Front, &world, LandingRule::Tolerant);
        assert!(c.grounded);
        assert_eq!(c.platform, Some(0));
        assert_eq!(b.bottom(), 600.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_tolerant_rule_ignores_deep_overlap() {
        let world = floor_world();
        let mut b = Aabb::new(100.0, 580.0, 37.0, 59.0); // bottom 639, 39px deep
        let mut vel = Vec2::new(0.0, 2.0);
        let c = resolve_platforms(&mut b, &mut vel, Layer::Front, &world, LandingRule::Tolerant);
        assert!(!c.grounded);
        assert_eq!(vel.y, 2.0);
    }

    #[test]
    fn test_head_bump_stops_upward_motion() {
        let world = floor_world();
        let mut b = Aabb::new(100.0, 630.0, 37.0, 59.0); // top 630, platform bottom 640
        let mut vel = Vec2::new(0.0, -10.0);
        let c = resolve_platforms(&mut b, &mut vel, Layer::Front, &world, LandingRule::Tolerant);
        assert!(c.ceiling);
        assert_eq!(b.top(), 640.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_other_layer_platforms_are_ignored() {
        let world = floor_world();
        let mut b = Aabb::new(100.0, 290.0, 20.0, 20.0);
        let mut vel = Vec2::new(0.0, 3.0);
        let c = resolve_platforms(&mut b, &mut vel, Layer::Front, &world, LandingRule::FirstContact);
        assert!(!c.grounded);
        let c = resolve_platforms(&mut b, &mut vel, Layer::Back, &world, LandingRule::FirstContact);
        assert!(c.grounded);
        assert_eq!(b.bottom(), 300.0);
    }

    #[test]
    fn test_pipe_queries() {
        let mut world = WorldGeometry::new();
        let a = world.add_pipe(500.0, 500.0, Layer::Front, Vec2::new(10.0, 10.0), false);
        let b = world.add_pipe(0.0, 0.0, Layer::Back, Vec2::new(20.0, 20.0), true);
        let probe = Aabb::new(510.0, 510.0, 10.0, 10.0);
        // Unlinked pipes are inert
        assert_eq!(pipe_contact(&probe, Layer::Front, &world), None);
        world.link(a, b).unwrap();
        assert_eq!(pipe_contact(&probe, Layer::Front, &world), Some(a));
        assert_eq!(pipe_contact(&probe, Layer::Back, &world), None);

        let center = world.pipes[a.0].bounds.center() + Vec2::new(79.0, -79.0);
        assert_eq!(pipe_nearby(center, Layer::Front, &world, 80.0), Some(a));
        let far = center + Vec2::new(2.0, 0.0);
        assert_eq!(pipe_nearby(far, Layer::Front, &world, 80.0), None);
    }

    #[test]
    fn test_out_of_bounds_padding() {
        let inside = Aabb::new(-40.0, 10.0, 12.0, 12.0);
        assert!(!out_of_bounds(&inside, 835.0, 700.0, 50.0));
        let outside = Aabb::new(-70.0, 10.0, 12.0, 12.0);
        assert!(out_of_bounds(&outside, 835.0, 700.0, 50.0));
    }
}
