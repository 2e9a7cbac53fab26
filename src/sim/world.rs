//! Static level geometry: platforms and paired pipe portals
//!
//! Geometry is immutable once a level is set up. Pipes refer to their
//! partner through a `PipeId` into the level's pipe table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::layer::Layer;
use crate::consts::*;
use crate::error::ConfigError;

/// Index of a pipe in `WorldGeometry::pipes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipeId(pub usize);

/// A solid platform on one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Aabb,
    pub layer: Layer,
}

impl Platform {
    /// `w`/`h` are front-layer sizes; back platforms shrink about their top-left corner
    pub fn new(x: f32, y: f32, w: f32, h: f32, layer: Layer) -> Self {
        let size = layer.scaled(Vec2::new(w, h));
        Self {
            bounds: Aabb::new(x, y, size.x, size.y),
            layer,
        }
    }
}

/// Where a traveller lands when coming out of a pipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    /// Fixed exit point: horizontal center and bottom of the traveller
    pub point: Vec2,
    pub layer: Layer,
}

/// One end of a pipe pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub bounds: Aabb,
    pub layer: Layer,
    /// Fixed teleport coordinates used when arriving at this pipe
    pub exit: Vec2,
    /// Art hint: which screen side the pipe opening faces
    pub left_side: bool,
    pub target: Option<PipeId>,
}

/// Front-layer pipe sprite size
pub const PIPE_WIDTH: f32 = 900.0;
pub const PIPE_HEIGHT: f32 = 77.0;

/// Platforms and pipes of one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldGeometry {
    pub platforms: Vec<Platform>,
    pub pipes: Vec<Pipe>,
}

impl WorldGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_platform(&mut self, platform: Platform) {
        self.platforms.push(platform);
    }

    /// Add a pipe with no partner (inert until linked)
    pub fn add_pipe(&mut self, x: f32, y: f32, layer: Layer, exit: Vec2, left_side: bool) -> PipeId {
        let size = layer.scaled(Vec2::new(PIPE_WIDTH, PIPE_HEIGHT));
        let id = PipeId(self.pipes.len());
        self.pipes.push(Pipe {
            bounds: Aabb::new(x, y, size.x, size.y),
            layer,
            exit,
            left_side,
            target: None,
        });
        id
    }

    /// Make `a` and `b` point at each other
    pub fn link(&mut self, a: PipeId, b: PipeId) -> Result<(), ConfigError> {
        let len = self.pipes.len();
        for id in [a, b] {
            if id.0 >= len {
                return Err(ConfigError::PipeOutOfRange { index: id.0, len });
            }
        }
        if a == b {
            return Err(ConfigError::UnpairedPipe { index: a.0 });
        }
        self.pipes[a.0].target = Some(b);
        self.pipes[b.0].target = Some(a);
        Ok(())
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(id.0)
    }

    /// Exit point and layer for a traveller entering `id`
    ///
    /// Uses the partner's stored exit point, never its current bounds.
    pub fn destination(&self, id: PipeId) -> Option<Destination> {
        let target = self.pipe(id)?.target?;
        let out = self.pipe(target)?;
        Some(Destination {
            point: out.exit,
            layer: out.layer,
        })
    }

    pub fn platforms_on(&self, layer: Layer) -> impl Iterator<Item = (usize, &Platform)> {
        self.platforms
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.layer == layer)
    }

    /// Linked pipes on `layer`
    pub fn pipes_on(&self, layer: Layer) -> impl Iterator<Item = (PipeId, &Pipe)> {
        self.pipes
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.layer == layer && p.target.is_some())
            .map(|(i, p)| (PipeId(i), p))
    }

    /// Check that every linked pipe is part of a mutual pair
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, pipe) in self.pipes.iter().enumerate() {
            if let Some(target) = pipe.target {
                let back = self
                    .pipe(target)
                    .ok_or(ConfigError::PipeOutOfRange {
                        index: target.0,
                        len: self.pipes.len(),
                    })?
                    .target;
                if target.0 == i || back != Some(PipeId(i)) {
                    return Err(ConfigError::UnpairedPipe { index: i });
                }
            }
        }
        Ok(())
    }

    /// Minimal geometry used when a level fails to load: one front floor, no pipes
    pub fn fallback() -> Self {
        let mut world = Self::new();
        world.add_platform(Platform::new(0.0, 600.0, SCREEN_WIDTH, 40.0, Layer::Front));
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_world() -> (WorldGeometry, PipeId, PipeId) {
        let mut world = WorldGeometry::new();
        let a = world.add_pipe(0.0, 0.0, Layer::Front, Vec2::new(80.0, 368.0), true);
        let b = world.add_pipe(0.0, 200.0, Layer::Back, Vec2::new(173.0, 358.0), true);
        world.link(a, b).unwrap();
        (world, a, b)
    }

    #[test]
    fn test_back_platform_is_scaled() {
        let p = Platform::new(235.0, 480.0, 600.0, 30.0, Layer::Back);
        assert_eq!(p.bounds.x, 235.0);
        assert!((p.bounds.w - 360.0).abs() < 1e-4);
        assert!((p.bounds.h - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_destination_is_symmetric() {
        let (world, a, b) = pair_world();
        let into_a = world.destination(a).unwrap();
        assert_eq!(into_a.point, Vec2::new(173.0, 358.0));
        assert_eq!(into_a.layer, Layer::Back);
        let into_b = world.destination(b).unwrap();
        assert_eq!(into_b.point, Vec2::new(80.0, 368.0));
        assert_eq!(into_b.layer, Layer::Front);
    }

    #[test]
    fn test_unlinked_pipe_is_inert() {
        let mut world = WorldGeometry::new();
        let a = world.add_pipe(0.0, 0.0, Layer::Front, Vec2::ZERO, true);
        assert!(world.destination(a).is_none());
        assert_eq!(world.pipes_on(Layer::Front).count(), 0);
        assert!(world.validate().is_ok());
    }

    #[test]
    fn test_link_rejects_bad_pairs() {
        let (mut world, a, _) = pair_world();
        assert!(matches!(world.link(a, a), Err(ConfigError::UnpairedPipe { .. })));
        assert!(matches!(
            world.link(a, PipeId(9)),
            Err(ConfigError::PipeOutOfRange { index: 9, len: 2 })
        ));
    }

    #[test]
    fn test_validate_catches_one_way_link() {
        let (mut world, a, _) = pair_world();
        let c = world.add_pipe(0.0, 400.0, Layer::Front, Vec2::ZERO, false);
        world.pipes[c.0].target = Some(a);
        assert!(matches!(world.validate(), Err(ConfigError::UnpairedPipe { index: 2 })));
    }

    #[test]
    fn test_fallback_has_floor() {
        let world = WorldGeometry::fallback();
        assert_eq!(world.platforms.len(), 1);
        assert!(world.pipes.is_empty());
        assert_eq!(world.platforms_on(Layer::Front).count(), 1);
    }
}
