//! Arena geometry
//!
//! Targets are axis-aligned boxes anchored at their top-left corner, in
//! arena pixels with y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH};

/// Playfield bounds reported by the host layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Largest top-left corner that keeps a box of `size` inside the arena.
    /// `None` when the box cannot fit at all.
    pub fn max_origin(&self, size: Vec2) -> Option<Vec2> {
        let max = self.size() - size;
        (max.x >= 0.0 && max.y >= 0.0).then_some(max)
    }

    /// Clamp a top-left corner so the box stays inside the arena
    pub fn clamp_origin(&self, origin: Vec2, size: Vec2) -> Vec2 {
        let max = (self.size() - size).max(Vec2::ZERO);
        origin.clamp(Vec2::ZERO, max)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Overlap test. Touching edges count as intersecting.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }

    /// Check if the rectangle lies entirely within the arena
    pub fn within(&self, arena: &Arena) -> bool {
        self.min.x >= 0.0 && self.min.y >= 0.0 && self.max.x <= arena.width && self.max.y <= arena.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersects() {
        let a = Rect::from_origin_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::from_origin_size(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = Rect::from_origin_size(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_touching_edges_intersect() {
        let a = Rect::from_origin_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::from_origin_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_expand_creates_overlap() {
        let a = Rect::from_origin_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::from_origin_size(Vec2::new(15.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(a.expand(3.0).intersects(&b.expand(3.0)));
    }

    #[test]
    fn test_arena_max_origin() {
        let arena = Arena::new(100.0, 50.0);
        assert_eq!(arena.max_origin(Vec2::new(40.0, 20.0)), Some(Vec2::new(60.0, 30.0)));
        assert_eq!(arena.max_origin(Vec2::new(120.0, 20.0)), None);
    }

    #[test]
    fn test_arena_clamp_origin() {
        let arena = Arena::new(100.0, 50.0);
        let size = Vec2::new(40.0, 20.0);
        assert_eq!(arena.clamp_origin(Vec2::new(-5.0, 45.0), size), Vec2::new(0.0, 30.0));
        assert!(Rect::from_origin_size(arena.clamp_origin(Vec2::new(90.0, 10.0), size), size).within(&arena));
    }
}
