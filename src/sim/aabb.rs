//! Axis-aligned bounding boxes
//!
//! Screen space: x grows right, y grows down. A box is stored as its
//! top-left corner plus size, like a sprite rect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The point of a box that stays fixed when the box is resized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Center,
    BottomCenter,
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Box of the given size whose anchor sits at `point`
    pub fn anchored(anchor: Anchor, point: Vec2, size: Vec2) -> Self {
        match anchor {
            Anchor::Center => Self::new(point.x - size.x / 2.0, point.y - size.y / 2.0, size.x, size.y),
            Anchor::BottomCenter => Self::new(point.x - size.x / 2.0, point.y - size.y, size.x, size.y),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Current position of the given anchor
    pub fn anchor_point(&self, anchor: Anchor) -> Vec2 {
        match anchor {
            Anchor::Center => self.center(),
            Anchor::BottomCenter => Vec2::new(self.center_x(), self.bottom()),
        }
    }

    /// A new box of `size` sharing this box's anchor point
    pub fn resized(&self, anchor: Anchor, size: Vec2) -> Self {
        Self::anchored(anchor, self.anchor_point(anchor), size)
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    pub fn set_center_y(&mut self, cy: f32) {
        self.y = cy - self.h / 2.0;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.set_center_x(center.x);
        self.set_center_y(center.y);
    }
}
