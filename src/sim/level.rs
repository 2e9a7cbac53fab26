//! Level definitions
//!
//! A level is pure data: platform and pipe placement plus the enemy roster.
//! The three built-in levels share one arena; custom sets load from JSON.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::layer::Layer;
use super::world::{Platform, WorldGeometry};
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub layer: Layer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeSpec {
    pub x: f32,
    pub y: f32,
    pub layer: Layer,
    pub exit_x: f32,
    pub exit_y: f32,
    #[serde(default)]
    pub left_side: bool,
}

/// Two pipes that lead into each other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipePairSpec {
    pub a: PipeSpec,
    pub b: PipeSpec,
}

/// An enemy placed at level setup (top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub layer: Layer,
    pub kind: EnemyKind,
    #[serde(default)]
    pub stay_on_platform: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSpec {
    pub number: u32,
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub pipes: Vec<PipePairSpec>,
    pub roster: Vec<EnemySpawn>,
}

impl LevelSpec {
    /// Build the static geometry for this level
    pub fn build_geometry(&self) -> Result<WorldGeometry, ConfigError> {
        if self.platforms.is_empty() {
            return Err(ConfigError::EmptyGeometry { level: self.number });
        }

        let mut world = WorldGeometry::new();
        for p in &self.platforms {
            world.add_platform(Platform::new(p.x, p.y, p.w, p.h, p.layer));
        }
        for pair in &self.pipes {
            let a = add_pipe(&mut world, &pair.a);
            let b = add_pipe(&mut world, &pair.b);
            world.link(a, b)?;
        }
        world.validate()?;
        Ok(world)
    }
}

fn add_pipe(world: &mut WorldGeometry, spec: &PipeSpec) -> super::world::PipeId {
    world.add_pipe(
        spec.x,
        spec.y,
        spec.layer,
        Vec2::new(spec.exit_x, spec.exit_y),
        spec.left_side,
    )
}

/// The set of levels a session plays through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<LevelSpec>,
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelSet {
    /// The three reference levels
    pub fn builtin() -> Self {
        Self {
            levels: (1..=3).filter_map(builtin_level).collect(),
        }
    }

    /// Parse a level set from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a level set from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, number: u32) -> Result<&LevelSpec, ConfigError> {
        self.levels
            .iter()
            .find(|l| l.number == number)
            .ok_or(ConfigError::MissingLevel(number))
    }

    /// Highest level number in the set
    pub fn max_level(&self) -> u32 {
        self.levels.iter().map(|l| l.number).max().unwrap_or(0)
    }
}

fn plat(x: f32, y: f32, w: f32, h: f32, layer: Layer) -> PlatformSpec {
    PlatformSpec { x, y, w, h, layer }
}

fn pipe(x: f32, y: f32, layer: Layer, exit_x: f32, exit_y: f32, left_side: bool) -> PipeSpec {
    PipeSpec {
        x,
        y,
        layer,
        exit_x,
        exit_y,
        left_side,
    }
}

fn spawn(x: f32, y: f32, layer: Layer, kind: EnemyKind, stay_on_platform: bool) -> EnemySpawn {
    EnemySpawn {
        x,
        y,
        layer,
        kind,
        stay_on_platform,
    }
}

/// The shared reference arena: 8 platforms and 4 cross-layer pipe pairs
fn arena_platforms() -> Vec<PlatformSpec> {
    use Layer::*;
    vec![
        // Front: floor, two side ledges, small middle step
        plat(15.0, 600.0, 800.0, 40.0, Front),
        plat(35.0, 420.0, 200.0, 30.0, Front),
        plat(595.0, 420.0, 200.0, 30.0, Front),
        plat(375.0, 520.0, 80.0, 20.0, Front),
        // Back: wide middle, small center, two upper ledges
        plat(235.0, 480.0, 600.0, 30.0, Back),
        plat(385.0, 420.0, 100.0, 20.0, Back),
        plat(155.0, 360.0, 150.0, 25.0, Back),
        plat(585.0, 360.0, 150.0, 25.0, Back),
    ]
}

fn arena_pipes() -> Vec<PipePairSpec> {
    use Layer::*;
    vec![
        // Upper left ledges
        PipePairSpec {
            a: pipe(-845.0, 340.0, Front, 80.0, 368.0, true),
            b: pipe(-380.0, 310.0, Back, 173.0, 358.0, true),
        },
        // Upper right ledges
        PipePairSpec {
            a: pipe(775.0, 340.0, Front, 748.0, 368.0, false),
            b: pipe(670.0, 310.0, Back, 655.0, 358.0, false),
        },
        // Floor right edge <-> back middle right edge
        PipePairSpec {
            a: pipe(785.0, 520.0, Front, 750.0, 563.0, false),
            b: pipe(580.0, 430.0, Back, 555.0, 483.0, false),
        },
        // Floor left edge <-> back middle left edge
        PipePairSpec {
            a: pipe(-850.0, 520.0, Front, 70.0, 563.0, true),
            b: pipe(-290.0, 430.0, Back, 270.0, 483.0, true),
        },
    ]
}

/// Reference level data
pub fn builtin_level(number: u32) -> Option<LevelSpec> {
    use EnemyKind::*;
    use Layer::*;

    let roster = match number {
        1 => vec![
            spawn(115.0, 380.0, Front, Turtle, true),
            spawn(715.0, 380.0, Front, Turtle, true),
            spawn(365.0, 440.0, Back, Turtle, false),
            spawn(415.0, 290.0, Back, Turtle, true),
        ],
        2 => vec![
            spawn(115.0, 380.0, Front, Turtle, true),
            spawn(715.0, 380.0, Front, Turtle, true),
            spawn(315.0, 440.0, Back, SpikeTurtle, false),
            spawn(515.0, 440.0, Back, SpikeTurtle, false),
            spawn(115.0, 290.0, Back, SpikeTurtle, false),
            spawn(715.0, 290.0, Back, SpikeTurtle, false),
        ],
        3 => vec![
            spawn(115.0, 380.0, Front, Turtle, true),
            spawn(365.0, 440.0, Back, SpikeTurtle, false),
            spawn(215.0, 150.0, Front, Ghost, false),
            spawn(615.0, 150.0, Front, Ghost, false),
            spawn(415.0, 380.0, Back, Turtle, true),
            spawn(715.0, 380.0, Back, Turtle, true),
            spawn(115.0, 290.0, Back, SpikeTurtle, true),
            spawn(715.0, 290.0, Back, SpikeTurtle, true),
            spawn(415.0, 290.0, Back, SpikeTurtle, true),
        ],
        _ => return None,
    };

    Some(LevelSpec {
        number,
        platforms: arena_platforms(),
        pipes: arena_pipes(),
        roster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels() {
        let set = LevelSet::builtin();
        assert_eq!(set.levels.len(), 3);
        assert_eq!(set.max_level(), 3);
        assert_eq!(set.get(1).unwrap().roster.len(), 4);
        assert_eq!(set.get(2).unwrap().roster.len(), 6);
        assert_eq!(set.get(3).unwrap().roster.len(), 9);
        assert!(matches!(set.get(4), Err(ConfigError::MissingLevel(4))));
    }

    #[test]
    fn test_builtin_geometry_is_paired() {
        let world = builtin_level(1).unwrap().build_geometry().unwrap();
        assert_eq!(world.platforms.len(), 8);
        assert_eq!(world.pipes.len(), 8);
        assert!(world.pipes.iter().all(|p| p.target.is_some()));
    }

    #[test]
    fn test_empty_level_is_config_error() {
        let spec = LevelSpec {
            number: 9,
            platforms: Vec::new(),
            pipes: Vec::new(),
            roster: Vec::new(),
        };
        assert!(matches!(
            spec.build_geometry(),
            Err(ConfigError::EmptyGeometry { level: 9 })
        ));
    }

    #[test]
    fn test_level_set_from_json() {
        let json = r#"{
            "levels": [{
                "number": 1,
                "platforms": [{"x": 0, "y": 600, "w": 835, "h": 40, "layer": "front"}],
                "roster": [{"x": 100, "y": 560, "layer": "front", "kind": "turtle"}]
            }]
        }"#;
        let set = LevelSet::from_json(json).unwrap();
        let level = set.get(1).unwrap();
        assert!(level.pipes.is_empty());
        assert!(!level.roster[0].stay_on_platform);
        assert_eq!(level.roster[0].kind, EnemyKind::Turtle);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(LevelSet::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
