//! Depth layers
//!
//! Every positioned entity lives on exactly one of two parallel planes.
//! The back plane draws everything at 60% scale and slows movement by the
//! same factor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Scale (and speed) factor of the back plane
pub const BACK_SCALE: f32 = 0.6;

/// One of the two simulation planes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Front,
    Back,
}

impl Layer {
    /// Visual scale of entities on this layer
    #[inline]
    pub fn scale(self) -> f32 {
        match self {
            Layer::Front => 1.0,
            Layer::Back => BACK_SCALE,
        }
    }

    /// Multiplier applied to layer-dependent movement speeds
    #[inline]
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Layer::Front => 1.0,
            Layer::Back => BACK_SCALE,
        }
    }

    #[inline]
    pub fn other(self) -> Layer {
        match self {
            Layer::Front => Layer::Back,
            Layer::Back => Layer::Front,
        }
    }

    /// Size of a `base` sized entity on this layer
    #[inline]
    pub fn scaled(self, base: Vec2) -> Vec2 {
        base * self.scale()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Front => "front",
            Layer::Back => "back",
        }
    }
}

/// Re-express a speed measured on `from` in the units of `to`
#[inline]
pub fn rescale_speed(speed: f32, from: Layer, to: Layer) -> f32 {
    speed / from.speed_multiplier() * to.speed_multiplier()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_values() {
        assert_eq!(Layer::Front.scale(), 1.0);
        assert_eq!(Layer::Back.scale(), 0.6);
        assert_eq!(Layer::Back.speed_multiplier(), 0.6);
    }

    #[test]
    fn test_rescale_speed_round_trip() {
        let back = rescale_speed(8.0, Layer::Front, Layer::Back);
        assert!((back - 4.8).abs() < 1e-5);
        let front = rescale_speed(back, Layer::Back, Layer::Front);
        assert!((front - 8.0).abs() < 1e-5);
        assert_eq!(rescale_speed(3.0, Layer::Back, Layer::Back), 3.0);
    }

    #[test]
    fn test_layer_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Layer::Back).unwrap(), "\"back\"");
        let l: Layer = serde_json::from_str("\"front\"").unwrap();
        assert_eq!(l, Layer::Front);
    }
}
