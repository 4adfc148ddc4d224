//! Axis-aligned rectangles for obstacles, adversaries and agent footprints
//!
//! Rectangles are stored as top-left corner plus size, in world pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of half-size `half_extent` centred on `center`
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        Self {
            x: center.x - half_extent,
            y: center.y - half_extent,
            w: half_extent * 2.0,
            h: half_extent * 2.0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Strict overlap test
    ///
    /// Rectangles that only share an edge do not intersect, and a rectangle
    /// with no area intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Index of the first rectangle in `others` that overlaps this one
    pub fn first_hit(&self, others: &[Rect]) -> Option<usize> {
        others.iter().position(|other| self.intersects(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_empty_rect_never_hits() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 0.0, 4.0);
        assert!(!a.intersects(&empty));
    }

    #[test]
    fn test_centered_and_first_hit() {
        let footprint = Rect::centered(Vec2::new(50.0, 50.0), 10.0);
        assert_eq!(footprint, Rect::new(40.0, 40.0, 20.0, 20.0));
        assert_eq!(footprint.center(), Vec2::new(50.0, 50.0));

        let obstacles = [
            Rect::new(0.0, 0.0, 5.0, 5.0),
            Rect::new(55.0, 55.0, 5.0, 5.0),
            Rect::new(45.0, 45.0, 2.0, 2.0),
        ];
        assert_eq!(footprint.first_hit(&obstacles), Some(1));
        assert_eq!(footprint.first_hit(&obstacles[..1]), None);
    }
}
